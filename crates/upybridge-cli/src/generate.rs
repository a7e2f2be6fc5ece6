//! The generation run: read, parse, build, render, write.

use anyhow::{anyhow, bail, Context};
use std::fs;
use std::path::Path;
use upybridge_engine::model::ModuleModel;
use upybridge_engine::parser::Parser;
use upybridge_engine::{render_header, render_source};

use crate::output::StyledOutput;
use crate::picker::OutputPicker;

/// Run one generation pass over a Python source file.
///
/// Fatal conditions: missing input, a syntax error, or a cancelled
/// directory selection. Existing output files are overwritten.
pub fn execute(
    file: &Path,
    module_name: Option<&str>,
    dump_model: bool,
    picker: &mut dyn OutputPicker,
    out: &mut StyledOutput,
) -> anyhow::Result<()> {
    if !file.exists() {
        bail!("input file not found: {}", file.display());
    }

    let raw = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    // Tolerate a UTF-8 BOM from Windows editors
    let source = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

    let module = match module_name {
        Some(name) => name.to_string(),
        None => file
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow!("cannot derive a module name from {}", file.display()))?,
    };

    let defs = Parser::new(source)
        .and_then(|parser| parser.parse_module())
        .map_err(|err| anyhow!("{}", err.format_with_source(source)))?;
    let model = ModuleModel::build(&module, &defs);

    if dump_model {
        out.plain(&serde_json::to_string_pretty(&model)?);
        out.plain("\n");
        return Ok(());
    }

    let header = render_header(&model);
    let cpp = render_source(&model);

    let Some(dir) = picker.pick_output_dir()? else {
        bail!("no output directory selected");
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let header_path = dir.join(format!("{}.h", module));
    let cpp_path = dir.join(format!("{}.cpp", module));
    fs::write(&header_path, header)
        .with_context(|| format!("failed to write {}", header_path.display()))?;
    fs::write(&cpp_path, cpp)
        .with_context(|| format!("failed to write {}", cpp_path.display()))?;

    out.success("Generated: ");
    out.plain(&format!(
        "{}, {}\n",
        header_path.display(),
        cpp_path.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;
    use termcolor::ColorChoice;

    /// Scripted picker standing in for the interactive collaborator.
    struct FakePicker {
        reply: Option<PathBuf>,
    }

    impl OutputPicker for FakePicker {
        fn pick_output_dir(&mut self) -> io::Result<Option<PathBuf>> {
            Ok(self.reply.clone())
        }
    }

    fn quiet() -> StyledOutput {
        StyledOutput::new(ColorChoice::Never)
    }

    const SAMPLE: &str = "\
def ping():
    pass

@unreal.uclass()
class Bridge:
    @unreal.ufunction(override=True)
    def on_update(self, delta: float):
        pass
";

    #[test]
    fn test_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("game_api.py");
        fs::write(&input, SAMPLE).unwrap();
        let out_dir = dir.path().join("generated");

        let mut picker = FakePicker {
            reply: Some(out_dir.clone()),
        };
        execute(&input, None, false, &mut picker, &mut quiet()).unwrap();

        let header = fs::read_to_string(out_dir.join("game_api.h")).unwrap();
        let cpp = fs::read_to_string(out_dir.join("game_api.cpp")).unwrap();
        assert!(header.contains("static UGame_api* Get();"));
        assert!(header.contains("static FString Ping();"));
        assert!(cpp.contains("import game_api; game_api.ping()"));
    }

    #[test]
    fn test_module_name_override() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("whatever.py");
        fs::write(&input, "def ping():\n    pass\n").unwrap();

        let mut picker = FakePicker {
            reply: Some(dir.path().to_path_buf()),
        };
        execute(&input, Some("bridge"), false, &mut picker, &mut quiet()).unwrap();
        assert!(dir.path().join("bridge.h").exists());
        assert!(dir.path().join("bridge.cpp").exists());
    }

    #[test]
    fn test_overwrites_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("mod.py");
        fs::write(&input, "def ping():\n    pass\n").unwrap();
        fs::write(dir.path().join("mod.h"), "stale").unwrap();

        let mut picker = FakePicker {
            reply: Some(dir.path().to_path_buf()),
        };
        execute(&input, None, false, &mut picker, &mut quiet()).unwrap();
        let header = fs::read_to_string(dir.path().join("mod.h")).unwrap();
        assert!(!header.contains("stale"));
        assert!(header.starts_with("#pragma once"));
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut picker = FakePicker { reply: None };
        let err = execute(
            &dir.path().join("absent.py"),
            None,
            false,
            &mut picker,
            &mut quiet(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_syntax_error_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.py");
        fs::write(&input, "def (:\n").unwrap();

        let mut picker = FakePicker {
            reply: Some(dir.path().to_path_buf()),
        };
        let err = execute(&input, None, false, &mut picker, &mut quiet()).unwrap_err();
        assert!(err.to_string().contains("Error at"));
        assert!(!dir.path().join("bad.h").exists());
    }

    #[test]
    fn test_cancelled_picker_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("mod.py");
        fs::write(&input, "def ping():\n    pass\n").unwrap();

        let mut picker = FakePicker { reply: None };
        let err = execute(&input, None, false, &mut picker, &mut quiet()).unwrap_err();
        assert!(err.to_string().contains("no output directory"));
        assert!(!dir.path().join("mod.h").exists());
    }

    #[test]
    fn test_bom_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("mod.py");
        fs::write(&input, "\u{feff}def ping():\n    pass\n").unwrap();

        let mut picker = FakePicker {
            reply: Some(dir.path().to_path_buf()),
        };
        execute(&input, None, false, &mut picker, &mut quiet()).unwrap();
        assert!(dir.path().join("mod.h").exists());
    }

    #[test]
    fn test_dump_model_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("mod.py");
        fs::write(&input, "def ping():\n    pass\n").unwrap();

        // picker must never be consulted in dump mode
        struct PanicPicker;
        impl OutputPicker for PanicPicker {
            fn pick_output_dir(&mut self) -> io::Result<Option<PathBuf>> {
                panic!("picker should not be used with --dump-model");
            }
        }
        execute(&input, None, true, &mut PanicPicker, &mut quiet()).unwrap();
        assert!(!dir.path().join("mod.h").exists());
    }
}

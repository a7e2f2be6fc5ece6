//! UPyBridge command-line generator.
//!
//! Translates a restricted Python module into Unreal Engine C++ binding
//! files. The source file is the sole required argument; the output
//! directory is chosen interactively.

use clap::Parser;
use std::path::PathBuf;

mod generate;
mod output;
mod picker;

use output::{resolve_color_choice, StyledOutput};
use picker::PromptPicker;

#[derive(Parser)]
#[command(name = "upybridge")]
#[command(about = "Generate Unreal Engine C++ bindings from a Python module", long_about = None)]
#[command(version)]
struct Cli {
    /// Python source file to translate
    file: PathBuf,

    /// Module name used in the generated code (defaults to the file stem)
    #[arg(long)]
    module_name: Option<String>,

    /// Print the built module model as JSON and exit without writing files
    #[arg(long)]
    dump_model: bool,

    /// Color output: auto, always, never
    #[arg(long)]
    color: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    let choice = resolve_color_choice(cli.color.as_deref());
    let mut out = StyledOutput::new(choice);
    let mut picker = PromptPicker::new();

    if let Err(err) = generate::execute(
        &cli.file,
        cli.module_name.as_deref(),
        cli.dump_model,
        &mut picker,
        &mut out,
    ) {
        out.error("error: ");
        out.plain_err(&format!("{:#}\n", err));
        std::process::exit(1);
    }
}

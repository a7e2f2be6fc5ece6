//! Interactive output-directory selection.
//!
//! The generator does not take the output directory as an argument; it is
//! supplied interactively by the operating environment. [`OutputPicker`]
//! models that collaborator: a directory path, or `None` when the user
//! cancels.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io;
use std::path::PathBuf;

/// External collaborator supplying the output directory.
pub trait OutputPicker {
    /// Ask for a directory. `Ok(None)` means the selection was cancelled.
    fn pick_output_dir(&mut self) -> io::Result<Option<PathBuf>>;
}

/// Terminal prompt implementation. An empty line, EOF, or an interrupt
/// counts as cancelled.
pub struct PromptPicker;

impl PromptPicker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PromptPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPicker for PromptPicker {
    fn pick_output_dir(&mut self) -> io::Result<Option<PathBuf>> {
        let mut editor = DefaultEditor::new()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        match editor.readline("Output directory: ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(PathBuf::from(trimmed)))
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(io::Error::new(io::ErrorKind::Other, e.to_string())),
        }
    }
}

//! Per-submission temporary files.
//!
//! A [`Scratch`] owns at most one staged input and one output path. [`Scratch::cleanup`] removes
//! the output first, then the input, and runs again from `Drop` so a panic in between still
//! leaves the scratch directory empty.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tracing::{debug, warn};

use crate::output_format::OutputFormat;
use crate::upload::UploadedFile;

const TEMP_PREFIX: &str = "audiolift-";

#[derive(Debug)]
pub struct Scratch {
    dir: PathBuf,
    input: Option<TempPath>,
    output: Option<PathBuf>,
}

impl Scratch {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            input: None,
            output: None,
        }
    }

    /// Copy the upload into a fresh temp file named `audiolift-XXXX.<ext>`.
    ///
    /// The file handle is closed before returning so an external process can open the path.
    pub fn stage(&mut self, upload: &UploadedFile) -> io::Result<&Path> {
        let suffix = format!(".{}", upload.format().extension());
        let mut file = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(&suffix)
            .tempfile_in(&self.dir)?;

        file.write_all(upload.bytes())?;
        file.flush()?;

        let path = file.into_temp_path();
        debug!(path = %path.display(), bytes = upload.size(), "staged upload");

        Ok(&**self.input.insert(path))
    }

    /// Reserve the output path: the staged input with its extension swapped for `format`.
    ///
    /// Nothing is created here. The path is remembered so cleanup removes whatever the media
    /// backend writes to it.
    pub fn output_path(&mut self, format: OutputFormat) -> io::Result<&Path> {
        let input = self
            .input
            .as_deref()
            .ok_or_else(|| io::Error::other("no staged input to derive an output path from"))?;
        let output = input.with_extension(format.extension());
        Ok(self.output.insert(output).as_path())
    }

    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// Delete the output, then the input. Missing files are not an error.
    ///
    /// Failures are logged and otherwise ignored; each path is forgotten after one attempt.
    pub fn cleanup(&mut self) {
        if let Some(output) = self.output.take() {
            if let Err(err) = remove_if_exists(&output) {
                warn!(path = %output.display(), error = %err, "failed to remove output file");
            }
        }

        if let Some(input) = self.input.take() {
            if input.exists() {
                let shown = input.display().to_string();
                if let Err(err) = input.close() {
                    warn!(path = %shown, error = %err, "failed to remove staged input");
                }
            }
            // A `TempPath` whose file is already gone drops quietly.
        }
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Returns `Ok(true)` when a file was removed.
pub fn remove_if_exists(path: &Path) -> io::Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

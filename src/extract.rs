//! High-level API for pulling the audio track out of an uploaded video.
//!
//! [`Extractor`] wires staging → media backend → read-back → cleanup for one submission:
//!
//! `Idle → FileStaged → AudioChecked → {NoAudio | Extracted} → [Error]? → Cleaned`
//!
//! `Cleaned` is reached on every path. The media handle is closed first, then the output file,
//! then the staged input are removed.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::backend::{MediaBackend, MediaClip};
use crate::error::Result;
use crate::opts::ExtractOpts;
use crate::output_format::OutputFormat;
use crate::probe::{AudioSummary, summarize};
use crate::scratch::Scratch;
use crate::upload::UploadedFile;

/// User-facing message when the video has no audio track.
pub const NO_AUDIO_MESSAGE: &str =
    "Processing failed: the uploaded video does not contain any audio track.";

/// Hint shown under any unexpected failure.
pub const RETRY_HINT: &str = "Please try another video file or check that the file is intact.";

/// Prefix for unexpected failures, followed by the error text.
pub fn failure_message(err: &dyn std::fmt::Display) -> String {
    format!("An error occurred during processing: {err}")
}

/// Where per-submission files are written.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub scratch_dir: PathBuf,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir(),
        }
    }
}

/// The result of a submission that did not fail.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Audio was written and read back.
    Extracted(ExtractedAudio),

    /// The video has no audio stream. Nothing was written.
    NoAudio,
}

/// Audio bytes ready for playback and download.
#[derive(Debug, Clone)]
pub struct ExtractedAudio {
    format: OutputFormat,
    bytes: Vec<u8>,
    output_name: String,
    summary: Option<AudioSummary>,
}

impl ExtractedAudio {
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Base name of the temporary output file (used for the download label).
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    pub fn mime_type(&self) -> String {
        self.format.mime_type()
    }

    pub fn download_filename(&self) -> String {
        self.format.download_filename()
    }

    pub fn summary(&self) -> Option<&AudioSummary> {
        self.summary.as_ref()
    }
}

/// The main extraction entry point.
///
/// Owns a media backend and the scratch directory configuration. Each call to
/// [`Extractor::extract`] is independent: it allocates its own temp files and shares nothing
/// with other calls, so one `Extractor` can serve many submissions.
pub struct Extractor<B: MediaBackend> {
    backend: B,
    config: ExtractorConfig,
}

impl<B: MediaBackend> Extractor<B> {
    pub fn new(backend: B, config: ExtractorConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract the audio track of `upload` as described by `opts`.
    ///
    /// Blocks until the backend finishes. Temp files are gone by the time this returns,
    /// whatever the result.
    pub fn extract(&self, upload: &UploadedFile, opts: &ExtractOpts) -> Result<Outcome> {
        let span = info_span!(
            "extract",
            submission = %Uuid::new_v4(),
            filename = %upload.filename(),
            format = %opts.format(),
            bitrate = opts.bitrate().map(|b| b.as_str()),
        );
        let _enter = span.enter();

        let mut scratch = Scratch::new(&self.config.scratch_dir);
        let result = self.run(&mut scratch, upload, opts);

        match &result {
            Ok(Outcome::Extracted(audio)) => {
                info!(bytes = audio.bytes().len(), "extracted");
            }
            Ok(Outcome::NoAudio) => info!("no audio track"),
            Err(err) => warn!(error = %err, "extraction failed"),
        }

        scratch.cleanup();
        debug!(stage = "cleaned");

        result
    }

    fn run(
        &self,
        scratch: &mut Scratch,
        upload: &UploadedFile,
        opts: &ExtractOpts,
    ) -> Result<Outcome> {
        let input = scratch.stage(upload)?.to_path_buf();
        debug!(stage = "file_staged", input = %input.display());

        let mut clip = self.backend.open(&input)?;
        let result = write_and_read_back(&mut clip, scratch, opts);
        clip.close();

        result
    }
}

fn write_and_read_back<C: MediaClip>(
    clip: &mut C,
    scratch: &mut Scratch,
    opts: &ExtractOpts,
) -> Result<Outcome> {
    let has_audio = clip.has_audio();
    debug!(stage = "audio_checked", has_audio);

    if !has_audio {
        return Ok(Outcome::NoAudio);
    }

    let output = scratch.output_path(opts.format())?.to_path_buf();
    clip.write_audio(&output, opts)?;

    let bytes = fs::read(&output)?;
    let summary = summarize(&output, opts.format().extension());

    Ok(Outcome::Extracted(ExtractedAudio {
        format: opts.format(),
        bytes,
        output_name: file_name(&output),
        summary,
    }))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

//! `audiolift` — pull the audio track out of an uploaded video.
//!
//! This crate provides:
//! - Upload validation against a fixed list of video containers
//! - Output format / bitrate selection (MP3, WAV, AAC, Ogg)
//! - A submission lifecycle that stages the upload, extracts audio through a pluggable media
//!   backend, reads the result back, and always removes its temp files
//! - An ffmpeg-backed media backend
//! - Environment diagnostics for installation problems
//!
//! Media work itself is delegated to ffmpeg; this crate is the glue around it.

// High-level API (most consumers should start here).
pub mod extract;
pub mod opts;

// Upload handling and per-submission temp files.
pub mod input_format;
pub mod scratch;
pub mod upload;

// Output selection.
pub mod output_format;

// Media backends.
pub mod backend;
pub mod backends;
pub mod locate;
pub mod probe;

pub mod diagnostics;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

mod error;

pub use backend::{MediaBackend, MediaClip};
pub use backends::ffmpeg::FfmpegBackend;
pub use error::{Error, Result};
pub use extract::{ExtractedAudio, Extractor, ExtractorConfig, Outcome};
pub use input_format::InputFormat;
pub use opts::ExtractOpts;
pub use output_format::{Bitrate, OutputFormat};
pub use upload::{UploadDetails, UploadedFile};

#[cfg(feature = "logging")]
pub use logging::init as init_logging;

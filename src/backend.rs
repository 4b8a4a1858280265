use std::path::Path;

use crate::Result;
use crate::opts::ExtractOpts;

/// Pluggable media library used by [`crate::Extractor`].
///
/// A backend opens a staged video and hands back a [`MediaClip`] that can answer whether the
/// container carries audio and write that audio to a standalone file.
///
/// Implementations run on a blocking thread; they may spawn processes or block on IO freely.
pub trait MediaBackend: Send + Sync {
    /// An opened media container.
    type Clip: MediaClip;

    /// Open `input` as a media container.
    ///
    /// Fails if the file cannot be read as media at all. A readable video without audio is a
    /// successful open whose [`MediaClip::has_audio`] returns `false`.
    fn open(&self, input: &Path) -> Result<Self::Clip>;
}

/// Handle returned by [`MediaBackend::open`].
pub trait MediaClip {
    /// Whether the container has at least one audio stream.
    fn has_audio(&self) -> bool;

    /// Write the audio track to `output`, encoded as `opts.format()`.
    ///
    /// `opts.bitrate()` is `Some` only for MP3; backends must not invent one otherwise.
    fn write_audio(&mut self, output: &Path, opts: &ExtractOpts) -> Result<()>;

    /// Release whatever the handle holds. Called exactly once, before temp files are removed.
    fn close(self);
}

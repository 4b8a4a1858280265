use crate::error::Result;
use crate::output_format::{Bitrate, OutputFormat};

/// Options that control how audio is extracted.
///
/// This struct represents *library-level configuration*, not form fields directly.
/// Frontends map user input into this type through [`ExtractOpts::from_form`] so that:
/// - a bitrate only ever reaches the media backend for MP3
/// - other frontends (tests, batch jobs) can construct options programmatically
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOpts {
    format: OutputFormat,
    bitrate: Option<Bitrate>,
}

impl ExtractOpts {
    /// Build options for `format`.
    ///
    /// For MP3 a missing bitrate falls back to [`Bitrate::default`]. For every other format the
    /// bitrate is dropped.
    pub fn new(format: OutputFormat, bitrate: Option<Bitrate>) -> Self {
        let bitrate = if format.takes_bitrate() {
            Some(bitrate.unwrap_or_default())
        } else {
            None
        };
        Self { format, bitrate }
    }

    /// Parse raw form values. An absent format means the default (MP3).
    ///
    /// A bitrate submitted alongside a non-MP3 format is ignored without being parsed, matching
    /// a form that never shows the control for those formats.
    pub fn from_form(format: Option<&str>, bitrate: Option<&str>) -> Result<Self> {
        let format = match format.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse::<OutputFormat>()?,
            None => OutputFormat::default(),
        };

        let bitrate = match bitrate.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) if format.takes_bitrate() => Some(raw.parse::<Bitrate>()?),
            _ => None,
        };

        Ok(Self::new(format, bitrate))
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// `Some` iff the format is MP3.
    pub fn bitrate(&self) -> Option<Bitrate> {
        self.bitrate
    }
}

impl Default for ExtractOpts {
    fn default() -> Self {
        Self::new(OutputFormat::default(), None)
    }
}

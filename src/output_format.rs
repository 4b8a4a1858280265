use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

/// The audio formats an extraction can produce.
///
/// Each variant knows its file extension, its media type, and the name the download is offered
/// under, so handlers never build those strings by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossy and small. The only format that takes a bitrate.
    #[default]
    Mp3,

    /// Uncompressed PCM.
    Wav,

    Aac,

    /// Ogg Vorbis.
    Ogg,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Mp3,
        OutputFormat::Wav,
        OutputFormat::Aac,
        OutputFormat::Ogg,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Mp3 => "mp3",
            OutputFormat::Wav => "wav",
            OutputFormat::Aac => "aac",
            OutputFormat::Ogg => "ogg",
        }
    }

    /// Media type used for both inline playback and the download (`audio/<format>`).
    pub fn mime_type(self) -> String {
        format!("audio/{}", self.extension())
    }

    /// Suggested download name. Independent of the uploaded file's name.
    pub fn download_filename(self) -> String {
        format!("extracted_audio.{}", self.extension())
    }

    pub fn takes_bitrate(self) -> bool {
        matches!(self, OutputFormat::Mp3)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownFormat(wanted.to_owned()))
    }
}

/// MP3 bitrates offered to the user, in kbit/s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Bitrate {
    #[serde(rename = "96k")]
    K96,
    #[serde(rename = "128k")]
    K128,
    /// Standard quality.
    #[default]
    #[serde(rename = "192k")]
    K192,
    #[serde(rename = "256k")]
    K256,
    #[serde(rename = "320k")]
    K320,
}

impl Bitrate {
    pub const ALL: [Bitrate; 5] = [
        Bitrate::K96,
        Bitrate::K128,
        Bitrate::K192,
        Bitrate::K256,
        Bitrate::K320,
    ];

    /// The value as ffmpeg's `-b:a` expects it, e.g. `"192k"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Bitrate::K96 => "96k",
            Bitrate::K128 => "128k",
            Bitrate::K192 => "192k",
            Bitrate::K256 => "256k",
            Bitrate::K320 => "320k",
        }
    }
}

impl fmt::Display for Bitrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bitrate {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        Self::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownBitrate(wanted.to_owned()))
    }
}

use serde::Serialize;

use crate::error::{Error, Result};
use crate::input_format::InputFormat;

/// A video received from one form submission.
///
/// Lives only as long as the request that created it.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    filename: String,
    content_type: Option<String>,
    format: InputFormat,
    bytes: Vec<u8>,
}

impl UploadedFile {
    /// Accept an upload, rejecting filenames outside the video allow-list.
    pub fn new(
        filename: impl Into<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Result<Self> {
        let filename = filename.into();
        let format = InputFormat::from_filename(&filename).ok_or_else(|| {
            Error::UnsupportedInput {
                filename: filename.clone(),
            }
        })?;

        Ok(Self {
            filename,
            content_type: content_type.filter(|ct| !ct.trim().is_empty()),
            format,
            bytes,
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn format(&self) -> InputFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn details(&self) -> UploadDetails {
        UploadDetails {
            filename: self.filename.clone(),
            content_type: self
                .content_type
                .clone()
                .unwrap_or_else(|| "unknown".to_owned()),
            size_mb: format_megabytes(self.size()),
        }
    }
}

/// What the result page shows about an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadDetails {
    pub filename: String,
    pub content_type: String,
    pub size_mb: String,
}

/// Size in mebibytes with exactly two decimals (e.g. `"1.50"`).
pub fn format_megabytes(bytes: usize) -> String {
    format!("{:.2}", bytes as f64 / (1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_megabytes_rounds_to_two_decimals() {
        assert_eq!(format_megabytes(0), "0.00");
        assert_eq!(format_megabytes(1024 * 1024), "1.00");
        assert_eq!(format_megabytes(1024 * 1024 * 3 / 2), "1.50");
        assert_eq!(format_megabytes(5_000), "0.00");
        assert_eq!(format_megabytes(10_000), "0.01");
    }

    #[test]
    fn new_rejects_unsupported_extensions() {
        let err = UploadedFile::new("track.mp3", None, vec![1, 2, 3]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedInput { .. }));
    }

    #[test]
    fn details_fall_back_to_unknown_type() -> anyhow::Result<()> {
        let upload = UploadedFile::new("clip.mp4", Some(" ".into()), vec![0; 2048])?;
        assert_eq!(
            upload.details(),
            UploadDetails {
                filename: "clip.mp4".into(),
                content_type: "unknown".into(),
                size_mb: "0.00".into(),
            }
        );
        assert_eq!(upload.format(), InputFormat::Mp4);
        Ok(())
    }
}

use serde::Serialize;

/// Video containers accepted for upload.
///
/// The allow-list is fixed; anything else is rejected before a single byte is staged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Mp4,
    Mov,
    Avi,
    Mkv,
    Wmv,
}

impl InputFormat {
    pub const ALL: [InputFormat; 5] = [
        InputFormat::Mp4,
        InputFormat::Mov,
        InputFormat::Avi,
        InputFormat::Mkv,
        InputFormat::Wmv,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            InputFormat::Mp4 => "mp4",
            InputFormat::Mov => "mov",
            InputFormat::Avi => "avi",
            InputFormat::Mkv => "mkv",
            InputFormat::Wmv => "wmv",
        }
    }

    /// Parse a bare extension (no leading dot), ignoring ASCII case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(ext.trim()))
    }

    /// Pick the format from the text after the last `.` of an uploaded filename.
    ///
    /// A filename without a dot has no extension and is never accepted.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    /// Value for an HTML `accept` attribute, e.g. `.mp4,.mov,...`.
    pub fn accept_attribute() -> String {
        Self::ALL
            .iter()
            .map(|f| format!(".{}", f.extension()))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub(crate) fn extensions_list() -> String {
        Self::ALL
            .iter()
            .map(|f| f.extension())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

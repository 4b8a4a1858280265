//! HTML pages for the upload form and its result.

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use minijinja::{Environment, context};
use serde::Serialize;

use audiolift::extract::{NO_AUDIO_MESSAGE, RETRY_HINT};
use audiolift::probe::AudioSummary;
use audiolift::{Bitrate, ExtractedAudio, InputFormat, OutputFormat, UploadDetails};

const SUCCESS_MESSAGE: &str = "Audio extracted successfully!";

pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("base.html", include_str!("../../../templates/base.html"))
            .context("invalid base template")?;
        env.add_template("index.html", include_str!("../../../templates/index.html"))
            .context("invalid index template")?;
        env.add_template("result.html", include_str!("../../../templates/result.html"))
            .context("invalid result template")?;
        Ok(Self { env })
    }

    pub fn index(&self) -> Result<String> {
        let formats: Vec<&str> = OutputFormat::ALL.iter().map(|f| f.extension()).collect();
        let bitrates: Vec<&str> = Bitrate::ALL.iter().map(|b| b.as_str()).collect();
        let input_extensions: Vec<&str> = InputFormat::ALL.iter().map(|f| f.extension()).collect();

        self.env
            .get_template("index.html")?
            .render(context! {
                accept => InputFormat::accept_attribute(),
                input_extensions,
                formats,
                bitrates,
                default_format => OutputFormat::default().extension(),
                default_bitrate => Bitrate::default().as_str(),
            })
            .context("failed to render index page")
    }

    pub fn result(&self, view: &ResultView) -> Result<String> {
        self.env
            .get_template("result.html")?
            .render(context! {
                details => view.details,
                audio => view.audio,
                errors => view.errors,
                success_message => SUCCESS_MESSAGE,
            })
            .context("failed to render result page")
    }
}

/// Everything the result page can show. At most one of `audio` / `errors` is populated.
#[derive(Debug, Default, Serialize)]
pub struct ResultView {
    pub details: Option<UploadDetails>,
    pub audio: Option<AudioView>,
    pub errors: Vec<String>,
}

impl ResultView {
    pub fn extracted(details: UploadDetails, audio: &ExtractedAudio) -> Self {
        Self {
            details: Some(details),
            audio: Some(AudioView::new(audio)),
            errors: Vec::new(),
        }
    }

    pub fn no_audio(details: UploadDetails) -> Self {
        Self {
            details: Some(details),
            audio: None,
            errors: vec![NO_AUDIO_MESSAGE.to_owned()],
        }
    }

    /// An unexpected failure: the message, then the generic hint.
    pub fn failed(details: UploadDetails, message: String) -> Self {
        Self {
            details: Some(details),
            audio: None,
            errors: vec![message, RETRY_HINT.to_owned()],
        }
    }

    /// The form itself was unusable (no file, unsupported extension, bad option).
    pub fn rejected(message: String) -> Self {
        Self {
            details: None,
            audio: None,
            errors: vec![message],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AudioView {
    pub mime_type: String,
    pub data_uri: String,
    pub download_filename: String,
    pub download_label: String,
    pub summary: Option<AudioSummary>,
}

impl AudioView {
    fn new(audio: &ExtractedAudio) -> Self {
        let mime_type = audio.mime_type();
        Self {
            data_uri: format!("data:{mime_type};base64,{}", STANDARD.encode(audio.bytes())),
            mime_type,
            download_filename: audio.download_filename(),
            download_label: format!("Download {}", audio.output_name()),
            summary: audio.summary().cloned(),
        }
    }
}

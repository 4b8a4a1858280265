//! Media backend that drives the `ffmpeg` executable through `ffmpeg-sidecar`.
//!
//! Opening a clip runs ffmpeg once with a null output to list the input's streams. Writing audio
//! runs it again with the video dropped and the audio re-encoded for the requested format.

use std::path::{Path, PathBuf};

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use tracing::{debug, error, info};

use crate::backend::{MediaBackend, MediaClip};
use crate::error::{Error, Result};
use crate::locate::locate_ffmpeg;
use crate::opts::ExtractOpts;
use crate::output_format::OutputFormat;

/// Sample rate of every extracted file.
pub const OUTPUT_SAMPLE_RATE: u32 = 44_100;

/// The ffmpeg encoder used for each output format.
pub fn audio_encoder(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Mp3 => "libmp3lame",
        OutputFormat::Wav => "pcm_s16le",
        OutputFormat::Aac => "aac",
        OutputFormat::Ogg => "libvorbis",
    }
}

/// Built-in backend powered by an `ffmpeg` binary.
#[derive(Debug, Clone)]
pub struct FfmpegBackend {
    ffmpeg: PathBuf,
}

impl FfmpegBackend {
    pub fn new(ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
        }
    }

    /// Use `AUDIOLIFT_FFMPEG`, a sidecar binary, or `ffmpeg` from `PATH`, in that order.
    ///
    /// Falls back to the bare name `ffmpeg` when nothing is found so the spawn error names the
    /// missing binary.
    pub fn locate() -> Self {
        let ffmpeg = locate_ffmpeg()
            .map(|located| located.path)
            .unwrap_or_else(ffmpeg_sidecar::paths::ffmpeg_path);
        Self::new(ffmpeg)
    }

    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg
    }

    fn command(&self) -> FfmpegCommand {
        FfmpegCommand::new_with_path(&self.ffmpeg)
    }
}

impl MediaBackend for FfmpegBackend {
    type Clip = FfmpegClip;

    fn open(&self, input: &Path) -> Result<FfmpegClip> {
        let input_str = path_str(input)?;

        let mut child = self
            .command()
            .hide_banner()
            .input(input_str)
            .args(["-t", "0", "-f", "null"])
            .output("-")
            .spawn()
            .map_err(|err| spawn_error(&self.ffmpeg, err))?;

        let mut audio_streams = 0usize;
        let mut total_streams = 0usize;
        let mut errors = Vec::new();

        for event in child.iter().map_err(Error::from)? {
            match event {
                FfmpegEvent::ParsedInputStream(stream) => {
                    debug!(audio = stream.is_audio(), "input stream");
                    total_streams += 1;
                    if stream.is_audio() {
                        audio_streams += 1;
                    }
                }
                FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, msg) | FfmpegEvent::Error(msg) => {
                    errors.push(msg);
                }
                _ => {}
            }
        }

        let status = child.wait()?;

        if total_streams == 0 {
            let reason = errors
                .pop()
                .unwrap_or_else(|| format!("ffmpeg exited with {status}"));
            return Err(Error::msg(format!(
                "could not read '{}' as a media file: {reason}",
                input.display()
            )));
        }

        info!(streams = total_streams, audio_streams, "opened clip");

        Ok(FfmpegClip {
            ffmpeg: self.ffmpeg.clone(),
            input: input.to_path_buf(),
            audio_streams,
        })
    }
}

/// A probed input. Holds no process or file handle between calls.
#[derive(Debug)]
pub struct FfmpegClip {
    ffmpeg: PathBuf,
    input: PathBuf,
    audio_streams: usize,
}

impl FfmpegClip {
    pub fn audio_streams(&self) -> usize {
        self.audio_streams
    }
}

impl MediaClip for FfmpegClip {
    fn has_audio(&self) -> bool {
        self.audio_streams > 0
    }

    fn write_audio(&mut self, output: &Path, opts: &ExtractOpts) -> Result<()> {
        let args = encode_args(opts);

        let mut command = FfmpegCommand::new_with_path(&self.ffmpeg);
        command
            .hide_banner()
            .overwrite()
            .input(path_str(&self.input)?)
            .args(&args)
            .output(path_str(output)?);

        let mut child = command
            .spawn()
            .map_err(|err| spawn_error(&self.ffmpeg, err))?;

        let mut last_error = None;
        for event in child.iter().map_err(Error::from)? {
            match event {
                FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, msg) | FfmpegEvent::Error(msg) => {
                    error!(%msg, "ffmpeg");
                    last_error = Some(msg);
                }
                FfmpegEvent::Done => debug!(output = %output.display(), "ffmpeg finished"),
                _ => {}
            }
        }

        let status = child.wait()?;
        if !status.success() {
            let reason = last_error.unwrap_or_else(|| "no error output".to_owned());
            return Err(Error::msg(format!("ffmpeg exited with {status}: {reason}")));
        }

        if !output.is_file() {
            return Err(Error::msg(format!(
                "ffmpeg reported success but wrote no file at '{}'",
                output.display()
            )));
        }

        Ok(())
    }

    fn close(self) {
        debug!(input = %self.input.display(), "closed clip");
    }
}

/// Output arguments for one extraction. `-b:a` appears only when the options carry a bitrate.
fn encode_args(opts: &ExtractOpts) -> Vec<String> {
    let sample_rate = OUTPUT_SAMPLE_RATE.to_string();
    let mut args: Vec<String> = vec![
        "-vn".into(),
        "-c:a".into(),
        audio_encoder(opts.format()).into(),
        "-ar".into(),
        sample_rate,
    ];
    if let Some(bitrate) = opts.bitrate() {
        args.push("-b:a".into());
        args.push(bitrate.as_str().into());
    }
    args
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| Error::msg(format!("path is not valid UTF-8: '{}'", path.display())))
}

fn spawn_error(ffmpeg: &Path, err: std::io::Error) -> Error {
    Error::msg(format!(
        "failed to start ffmpeg at '{}' (is it installed?): {err}",
        ffmpeg.display()
    ))
}

//! Environment report for installation troubleshooting.
//!
//! Collects, in order: the running executable, the `PATH` entries, the `AUDIOLIFT_FFMPEG`
//! variable, and whether ffmpeg can be found and offers the encoders extraction needs.
//! Collection never fails; problems become part of the report.

use std::collections::HashSet;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, ensure};
use serde::Serialize;

use crate::backends::ffmpeg::audio_encoder;
use crate::locate::{FFMPEG_ENV_VAR, FfmpegSource, locate_ffmpeg_with};
use crate::output_format::OutputFormat;

const RULE: &str = "==================================================";

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Path of the running executable, or why it could not be determined.
    pub executable: Result<PathBuf, String>,
    pub search_path: Vec<PathBuf>,
    /// Value of [`FFMPEG_ENV_VAR`], if set.
    pub ffmpeg_env: Option<String>,
    pub media: MediaCheck,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MediaCheck {
    Found {
        location: PathBuf,
        #[serde(serialize_with = "serialize_display")]
        source: FfmpegSource,
        version: String,
        encoders: Vec<EncoderStatus>,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncoderStatus {
    pub format: OutputFormat,
    pub encoder: &'static str,
    pub available: bool,
}

/// Collect a report from the real process environment.
pub fn collect() -> Report {
    collect_with(|key| std::env::var_os(key))
}

/// Collect a report using `env` for every variable lookup.
pub fn collect_with(env: impl Fn(&str) -> Option<OsString>) -> Report {
    let executable = std::env::current_exe().map_err(|err| err.to_string());

    // An empty `PATH` splits into one empty entry.
    let search_path = env("PATH")
        .map(|raw| {
            std::env::split_paths(&raw)
                .filter(|dir| !dir.as_os_str().is_empty())
                .collect()
        })
        .unwrap_or_default();

    let ffmpeg_env = env(FFMPEG_ENV_VAR)
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string_lossy().into_owned());

    let media = check_media(&env);

    Report {
        executable,
        search_path,
        ffmpeg_env,
        media,
    }
}

fn check_media(env: &impl Fn(&str) -> Option<OsString>) -> MediaCheck {
    let Some(located) = locate_ffmpeg_with(env) else {
        return MediaCheck::Failed {
            error: format!(
                "ffmpeg not found (set {FFMPEG_ENV_VAR} or put ffmpeg on PATH)"
            ),
        };
    };

    match probe_ffmpeg(&located.path) {
        Ok((version, encoders)) => MediaCheck::Found {
            location: located.path,
            source: located.source,
            version,
            encoders,
        },
        Err(err) => MediaCheck::Failed {
            error: format!("{err:#}"),
        },
    }
}

fn probe_ffmpeg(ffmpeg: &Path) -> anyhow::Result<(String, Vec<EncoderStatus>)> {
    let version = ffmpeg_sidecar::version::ffmpeg_version_with_path(ffmpeg)
        .with_context(|| format!("failed to run '{}'", ffmpeg.display()))?;

    let output = Command::new(ffmpeg)
        .args(["-hide_banner", "-encoders"])
        .output()
        .with_context(|| format!("failed to list encoders of '{}'", ffmpeg.display()))?;
    ensure!(
        output.status.success(),
        "'{} -encoders' exited with {}",
        ffmpeg.display(),
        output.status
    );

    let listed = parse_encoder_names(&String::from_utf8_lossy(&output.stdout));
    Ok((version, encoder_statuses(&listed)))
}

/// Names from `ffmpeg -encoders` output: the second column of each row after the `------` line.
fn parse_encoder_names(listing: &str) -> HashSet<String> {
    listing
        .lines()
        .skip_while(|line| !line.trim_start().starts_with("------"))
        .skip(1)
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(str::to_owned)
        .collect()
}

fn encoder_statuses(listed: &HashSet<String>) -> Vec<EncoderStatus> {
    OutputFormat::ALL
        .into_iter()
        .map(|format| {
            let encoder = audio_encoder(format);
            EncoderStatus {
                format,
                encoder,
                available: listed.contains(encoder),
            }
        })
        .collect()
}

fn serialize_display<S: serde::Serializer>(
    value: &FfmpegSource,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

impl Report {
    /// Write the human-readable report.
    pub fn render<W: Write>(&self, mut w: W) -> io::Result<()> {
        writeln!(w, "--- 1. Executable path ---")?;
        match &self.executable {
            Ok(path) => writeln!(w, "{}", path.display())?,
            Err(err) => writeln!(w, "could not determine executable path: {err}")?,
        }
        writeln!(w, "\n{RULE}\n")?;

        writeln!(w, "--- 2. Search path (PATH) ---")?;
        if self.search_path.is_empty() {
            writeln!(w, "PATH is not set or empty.")?;
        }
        for (i, dir) in self.search_path.iter().enumerate() {
            writeln!(w, "{i}: {}", dir.display())?;
        }
        writeln!(w, "\n{RULE}\n")?;

        writeln!(w, "--- 3. {FFMPEG_ENV_VAR} environment variable ---")?;
        match &self.ffmpeg_env {
            Some(value) => writeln!(w, "Detected {FFMPEG_ENV_VAR}: {value}")?,
            None => writeln!(
                w,
                "{FFMPEG_ENV_VAR} not detected; ffmpeg is looked up next to the executable and on PATH."
            )?,
        }
        writeln!(w, "\n{RULE}\n")?;

        writeln!(w, "--- 4. Media library (ffmpeg) ---")?;
        match &self.media {
            MediaCheck::Found {
                location,
                source,
                version,
                encoders,
            } => {
                writeln!(w, "Found ffmpeg via {source}: {}", location.display())?;
                writeln!(w, "ffmpeg version: {version}")?;
                writeln!(w, "\nEncoders:")?;
                for status in encoders {
                    let state = if status.available {
                        "available"
                    } else {
                        "MISSING"
                    };
                    writeln!(w, "  {} ({}): {state}", status.encoder, status.format)?;
                }
                if encoders.iter().all(|s| s.available) {
                    writeln!(w, "\nAll encoders available. Everything looks fine!")?;
                } else {
                    writeln!(
                        w,
                        "\nSome output formats will fail; install an ffmpeg build with the missing encoders."
                    )?;
                }
            }
            MediaCheck::Failed { error } => {
                writeln!(w, "Error while checking ffmpeg: {error}")?;
            }
        }

        Ok(())
    }
}

// src/probe.rs

//! Inspect an extracted audio file with Symphonia.
//!
//! This is reporting only: the summary decorates the result page and the API headers. A file
//! Symphonia cannot read is still a valid extraction.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::{FormatOptions, Track};
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

/// Basic facts about an audio file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioSummary {
    pub codec: String,
    pub sample_rate: Option<u32>,
    pub channels: Option<usize>,
    pub duration_seconds: Option<f64>,
}

/// Probe `path`, returning `None` (and logging why) when Symphonia cannot read it.
pub fn summarize(path: &Path, extension: &str) -> Option<AudioSummary> {
    match probe_file(path, extension) {
        Ok(summary) => Some(summary),
        Err(err) => {
            debug!(path = %path.display(), error = %format!("{err:#}"), "could not summarize audio");
            None
        }
    }
}

fn probe_file(path: &Path, extension: &str) -> Result<AudioSummary> {
    let file = File::open(path).with_context(|| format!("failed to open '{}'", path.display()))?;

    let mss_opts = MediaSourceStreamOptions {
        // Symphonia expects a power-of-two buffer > 32KiB for good probing behavior.
        buffer_len: 256 * 1024,
    };
    let mss = MediaSourceStream::new(Box::new(file), mss_opts);

    let mut hint = Hint::new();
    hint.with_extension(extension);

    let format_opts: FormatOptions = Default::default();
    let metadata_opts: MetadataOptions = Default::default();

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &format_opts, &metadata_opts)
        .map_err(|e| anyhow!(e))
        .context("failed to probe audio file")?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| anyhow!("no audio track found"))?;

    Ok(summary_for_track(track))
}

fn summary_for_track(track: &Track) -> AudioSummary {
    let params = &track.codec_params;

    let codec = symphonia::default::get_codecs()
        .get_codec(params.codec)
        .map(|desc| desc.short_name.to_owned())
        .unwrap_or_else(|| "unknown".to_owned());

    let duration_seconds = match (params.n_frames, params.sample_rate) {
        (Some(frames), Some(rate)) if rate > 0 => Some(frames as f64 / f64::from(rate)),
        _ => None,
    };

    AudioSummary {
        codec,
        sample_rate: params.sample_rate,
        channels: params.channels.map(|c| c.count()),
        duration_seconds,
    }
}

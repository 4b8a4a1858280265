//! Finding the ffmpeg binary.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit ffmpeg binary.
pub const FFMPEG_ENV_VAR: &str = "AUDIOLIFT_FFMPEG";

#[cfg(windows)]
const FFMPEG_BINARY: &str = "ffmpeg.exe";
#[cfg(not(windows))]
const FFMPEG_BINARY: &str = "ffmpeg";

/// How a binary was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfmpegSource {
    /// Named by [`FFMPEG_ENV_VAR`].
    Env,
    /// Installed next to the running executable (the `ffmpeg-sidecar` layout).
    Sidecar,
    /// Found in a `PATH` directory.
    SearchPath,
}

impl fmt::Display for FfmpegSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FfmpegSource::Env => FFMPEG_ENV_VAR,
            FfmpegSource::Sidecar => "sidecar",
            FfmpegSource::SearchPath => "PATH",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedFfmpeg {
    pub path: PathBuf,
    pub source: FfmpegSource,
}

/// Locate ffmpeg using the process environment.
pub fn locate_ffmpeg() -> Option<LocatedFfmpeg> {
    locate_ffmpeg_with(|key| std::env::var_os(key))
}

/// Locate ffmpeg using `env` for variable lookups.
///
/// An explicit [`FFMPEG_ENV_VAR`] wins even if the file does not exist, so a typo surfaces as a
/// clear error instead of silently picking another binary.
pub fn locate_ffmpeg_with(env: impl Fn(&str) -> Option<OsString>) -> Option<LocatedFfmpeg> {
    if let Some(explicit) = env(FFMPEG_ENV_VAR).filter(|v| !v.is_empty()) {
        return Some(LocatedFfmpeg {
            path: PathBuf::from(explicit),
            source: FfmpegSource::Env,
        });
    }

    if let Ok(sidecar) = ffmpeg_sidecar::paths::sidecar_path() {
        if sidecar.is_file() {
            return Some(LocatedFfmpeg {
                path: sidecar,
                source: FfmpegSource::Sidecar,
            });
        }
    }

    let path_var = env("PATH")?;
    search_path(&path_var, FFMPEG_BINARY).map(|path| LocatedFfmpeg {
        path,
        source: FfmpegSource::SearchPath,
    })
}

/// First `dir/name` that is a regular file, scanning `path_var` in order.
pub fn search_path(path_var: &OsString, name: &str) -> Option<PathBuf> {
    std::env::split_paths(path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| is_file(candidate))
}

fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}

/// Built-in media backends.
pub mod ffmpeg;

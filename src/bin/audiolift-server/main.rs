use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::from_fn;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tracing::level_filters::LevelFilter;
use tracing::{Level, error, info};

mod metrics;
mod pages;

use audiolift::extract::{NO_AUDIO_MESSAGE, RETRY_HINT, failure_message};
use audiolift::{
    Bitrate, Error, ExtractOpts, Extractor, ExtractorConfig, FfmpegBackend, InputFormat,
    MediaBackend, Outcome, OutputFormat, UploadedFile,
};
use pages::{Pages, ResultView};

#[derive(Parser, Debug)]
#[command(name = "audiolift-server")]
#[command(about = "Web form that extracts the audio track from uploaded videos")]
struct Params {
    /// Host interface to bind to.
    #[arg(long = "host", default_value = "127.0.0.1")]
    host: String,

    /// TCP port to listen on.
    #[arg(long = "port", default_value_t = 8080)]
    port: u16,

    /// Maximum request body size (bytes). 0 disables the limit.
    #[arg(long = "max-bytes", default_value_t = 1024 * 1024 * 1024)]
    max_bytes: usize,

    /// How many extractions may run at once.
    #[arg(long = "max-concurrent", default_value_t = 1)]
    max_concurrent: usize,

    /// Directory for per-submission temp files (defaults to the system temp dir).
    #[arg(long = "scratch-dir")]
    scratch_dir: Option<PathBuf>,

    /// Path to the ffmpeg binary. Defaults to a sidecar binary, then PATH.
    #[arg(long = "ffmpeg", env = audiolift::locate::FFMPEG_ENV_VAR)]
    ffmpeg: Option<PathBuf>,
}

struct AppState<B: MediaBackend> {
    extractor: Arc<Extractor<B>>,
    permits: Arc<Semaphore>,
    pages: Arc<Pages>,
}

impl<B: MediaBackend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            extractor: self.extractor.clone(),
            permits: self.permits.clone(),
            pages: self.pages.clone(),
        }
    }
}

impl<B: MediaBackend> AppState<B> {
    fn new(extractor: Extractor<B>, max_concurrent: usize) -> Result<Self> {
        Ok(Self {
            extractor: Arc::new(extractor),
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            pages: Arc::new(Pages::new()?),
        })
    }
}

#[derive(Debug, Serialize)]
struct FormatsResponse {
    input_extensions: Vec<&'static str>,
    output_formats: Vec<&'static str>,
    bitrates: Vec<&'static str>,
    default_format: &'static str,
    default_bitrate: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

struct AppError {
    status: StatusCode,
    message: String,
    hint: Option<String>,
}

impl AppError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            hint: None,
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn multipart(err: MultipartError) -> Self {
        Self::new(err.status(), err.body_text())
    }

    /// Map a rejected upload or option to a client error.
    fn invalid_input(err: Error) -> Self {
        let status = match err {
            Error::UnsupportedInput { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Error::UnknownFormat(_) | Error::UnknownBitrate(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            hint: self.hint,
        });
        (self.status, body).into_response()
    }
}

#[tokio::main]
async fn main() {
    audiolift::init_logging(LevelFilter::INFO);

    if let Err(err) = run().await {
        error!(error = ?err, "audiolift-server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let params = Params::parse();

    metrics::init();

    let addr: SocketAddr = format!("{}:{}", params.host, params.port)
        .parse()
        .context("invalid host/port bind address")?;

    let backend = match params.ffmpeg {
        Some(path) => FfmpegBackend::new(path),
        None => FfmpegBackend::locate(),
    };
    info!(ffmpeg = %backend.ffmpeg_path().display(), "using ffmpeg");

    let mut config = ExtractorConfig::default();
    if let Some(dir) = params.scratch_dir {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create scratch dir '{}'", dir.display()))?;
        config.scratch_dir = dir;
    }

    let state = AppState::new(Extractor::new(backend, config), params.max_concurrent)?;
    let app = router(state, params.max_bytes);

    let listener = TcpListener::bind(addr).await.context("bind failed")?;
    info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn router<B: MediaBackend + 'static>(state: AppState<B>, max_bytes: usize) -> Router {
    let body_limit = if max_bytes == 0 {
        DefaultBodyLimit::disable()
    } else {
        DefaultBodyLimit::max(max_bytes)
    };

    Router::new()
        .route("/", get(index::<B>))
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics::prometheus_metrics))
        .route("/convert", post(convert::<B>))
        .route("/v1/formats", get(formats))
        .route("/v1/extract", post(extract::<B>))
        .route_layer(from_fn(metrics::track_http_metrics))
        .with_state(state)
        .layer(body_limit)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn index<B: MediaBackend + 'static>(State(state): State<AppState<B>>) -> Response {
    match state.pages.index() {
        Ok(html) => Html(html).into_response(),
        Err(err) => render_failure(err),
    }
}

async fn healthz() -> &'static str {
    "ok"
}

async fn formats() -> Json<FormatsResponse> {
    Json(FormatsResponse {
        input_extensions: InputFormat::ALL.iter().map(|f| f.extension()).collect(),
        output_formats: OutputFormat::ALL.iter().map(|f| f.extension()).collect(),
        bitrates: Bitrate::ALL.iter().map(|b| b.as_str()).collect(),
        default_format: OutputFormat::default().extension(),
        default_bitrate: Bitrate::default().as_str(),
    })
}

/// Form submission: always answers with a page, errors included.
async fn convert<B: MediaBackend + 'static>(
    State(state): State<AppState<B>>,
    multipart: Multipart,
) -> Response {
    let (upload, opts) = match read_submission(multipart).await {
        Ok(submission) => submission,
        Err(err) => {
            let view = ResultView::rejected(err.message);
            return render_result(&state.pages, err.status, &view);
        }
    };

    let details = upload.details();
    let view = match run_extraction(&state, upload, opts).await {
        Ok(Outcome::Extracted(audio)) => ResultView::extracted(details, &audio),
        Ok(Outcome::NoAudio) => ResultView::no_audio(details),
        Err(err) => ResultView::failed(details, failure_message(&format!("{err:#}"))),
    };

    render_result(&state.pages, StatusCode::OK, &view)
}

/// Machine API: answers with the audio itself.
async fn extract<B: MediaBackend + 'static>(
    State(state): State<AppState<B>>,
    multipart: Multipart,
) -> std::result::Result<Response, AppError> {
    let (upload, opts) = read_submission(multipart).await?;

    match run_extraction(&state, upload, opts).await {
        Ok(Outcome::Extracted(audio)) => Ok(audio_response(audio)),
        Ok(Outcome::NoAudio) => Err(AppError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            NO_AUDIO_MESSAGE,
        )),
        Err(err) => Err(AppError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: failure_message(&format!("{err:#}")),
            hint: Some(RETRY_HINT.to_owned()),
        }),
    }
}

fn audio_response(audio: audiolift::ExtractedAudio) -> Response {
    let content_type = HeaderValue::from_str(&audio.mime_type())
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        audio.download_filename()
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        audio.into_bytes(),
    )
        .into_response()
}

/// Read `file`, `format` and `bitrate` from a multipart body.
async fn read_submission(
    mut multipart: Multipart,
) -> std::result::Result<(UploadedFile, ExtractOpts), AppError> {
    let mut file = None;
    let mut format = None;
    let mut bitrate = None;

    while let Some(field) = multipart.next_field().await.map_err(AppError::multipart)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_owned();
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await.map_err(AppError::multipart)?;
                file = Some((filename, content_type, bytes));
            }
            Some("format") => format = Some(field.text().await.map_err(AppError::multipart)?),
            Some("bitrate") => bitrate = Some(field.text().await.map_err(AppError::multipart)?),
            _ => {}
        }
    }

    let (filename, content_type, bytes) = file
        .filter(|(filename, _, _)| !filename.is_empty())
        .ok_or_else(|| AppError::bad_request("no video file was uploaded (multipart field 'file')"))?;

    let upload = UploadedFile::new(filename, content_type, bytes.to_vec())
        .map_err(AppError::invalid_input)?;
    let opts = ExtractOpts::from_form(format.as_deref(), bitrate.as_deref())
        .map_err(AppError::invalid_input)?;

    Ok((upload, opts))
}

/// Run one extraction on the blocking pool.
///
/// The concurrency permit moves into the blocking task, so it stays held until the extraction
/// finishes even if the request is dropped while waiting on it.
async fn run_extraction<B: MediaBackend + 'static>(
    state: &AppState<B>,
    upload: UploadedFile,
    opts: ExtractOpts,
) -> Result<Outcome> {
    let permit = state
        .permits
        .clone()
        .acquire_owned()
        .await
        .map_err(|_| anyhow!("extraction queue closed"))?;

    let extractor = state.extractor.clone();
    let result = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        extractor.extract(&upload, &opts)
    })
    .await
    .context("extraction task panicked")
    .and_then(|res| res.map_err(anyhow::Error::from));

    let outcome = match &result {
        Ok(Outcome::Extracted(_)) => "extracted",
        Ok(Outcome::NoAudio) => "no_audio",
        Err(_) => "failed",
    };
    metrics::record_extraction(outcome, opts.format().extension());

    result
}

fn render_result(pages: &Pages, status: StatusCode, view: &ResultView) -> Response {
    match pages.result(view) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => render_failure(err),
    }
}

fn render_failure(err: anyhow::Error) -> Response {
    error!(error = ?err, "failed to render page");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "failed to render page",
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::Request;
    use clap::CommandFactory;
    use http_body_util::BodyExt;
    use tokio::sync::Notify;
    use tower::ServiceExt;

    use audiolift::MediaClip;

    use super::*;

    const BOUNDARY: &str = "audiolift-test-boundary";
    const STUB_AUDIO: &[u8] = b"stub audio bytes";

    #[derive(Clone, Copy)]
    enum Behavior {
        WithAudio,
        Silent,
        Broken,
        /// Holds the write open long enough for a second request to arrive.
        Slow,
    }

    /// How many writes are in flight, and the most seen at once.
    #[derive(Default)]
    struct Gauge {
        active: AtomicUsize,
        peak: AtomicUsize,
        started: Notify,
    }

    #[derive(Clone)]
    struct StubBackend {
        behavior: Behavior,
        calls: Arc<Mutex<Vec<ExtractOpts>>>,
        gauge: Arc<Gauge>,
    }

    struct StubClip {
        behavior: Behavior,
        calls: Arc<Mutex<Vec<ExtractOpts>>>,
        gauge: Arc<Gauge>,
    }

    impl MediaBackend for StubBackend {
        type Clip = StubClip;

        fn open(&self, _input: &Path) -> audiolift::Result<StubClip> {
            Ok(StubClip {
                behavior: self.behavior,
                calls: self.calls.clone(),
                gauge: self.gauge.clone(),
            })
        }
    }

    impl MediaClip for StubClip {
        fn has_audio(&self) -> bool {
            !matches!(self.behavior, Behavior::Silent)
        }

        fn write_audio(&mut self, output: &Path, opts: &ExtractOpts) -> audiolift::Result<()> {
            self.calls.lock().expect("calls lock").push(*opts);

            let active = self.gauge.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.gauge.peak.fetch_max(active, Ordering::SeqCst);
            self.gauge.started.notify_one();
            if let Behavior::Slow = self.behavior {
                std::thread::sleep(Duration::from_millis(300));
            }
            self.gauge.active.fetch_sub(1, Ordering::SeqCst);

            match self.behavior {
                Behavior::Broken => {
                    Err(std::io::Error::other("encoder exploded").into())
                }
                _ => Ok(std::fs::write(output, STUB_AUDIO)?),
            }
        }

        fn close(self) {}
    }

    struct Harness {
        app: Router,
        calls: Arc<Mutex<Vec<ExtractOpts>>>,
        gauge: Arc<Gauge>,
        scratch: tempfile::TempDir,
    }

    fn harness(behavior: Behavior) -> Harness {
        let scratch = tempfile::tempdir().expect("scratch dir");
        let calls = Arc::new(Mutex::new(Vec::new()));
        let gauge = Arc::new(Gauge::default());
        let backend = StubBackend {
            behavior,
            calls: calls.clone(),
            gauge: gauge.clone(),
        };
        let config = ExtractorConfig {
            scratch_dir: scratch.path().to_path_buf(),
        };
        let state = AppState::new(Extractor::new(backend, config), 1).expect("state");
        Harness {
            app: router(state, 0),
            calls,
            gauge,
            scratch,
        }
    }

    impl Harness {
        fn recorded(&self) -> Vec<ExtractOpts> {
            self.calls.lock().expect("calls lock").clone()
        }

        fn scratch_is_empty(&self) -> bool {
            std::fs::read_dir(self.scratch.path())
                .expect("read scratch dir")
                .next()
                .is_none()
        }
    }

    fn multipart_body(filename: &str, fields: &[(&str, &str)]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: video/mp4\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"fake video payload");
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn post(uri: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request")
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, header::HeaderMap, Vec<u8>) {
        let res = app.clone().oneshot(req).await.expect("infallible");
        let status = res.status();
        let headers = res.headers().clone();
        let body = res
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes()
            .to_vec();
        (status, headers, body)
    }

    #[tokio::test]
    async fn index_serves_the_form() {
        let h = harness(Behavior::WithAudio);
        let req = Request::get("/").body(Body::empty()).expect("request");
        let (status, _, body) = send(&h.app, req).await;

        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).expect("utf-8");
        assert!(html.contains(r#"action="/convert""#));
        assert!(html.contains(r#"name="bitrate""#));
        assert!(html.contains(r#"<video id="preview""#));
    }

    #[tokio::test]
    async fn extract_wav_returns_audio_with_fixed_download_name() {
        let h = harness(Behavior::WithAudio);
        let body = multipart_body("clip.mp4", &[("format", "wav")]);
        let (status, headers, body) = send(&h.app, post("/v1/extract", body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "audio/wav");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"extracted_audio.wav\""
        );
        assert_eq!(body, STUB_AUDIO);
        assert_eq!(h.recorded()[0].bitrate(), None);
        assert!(h.scratch_is_empty());
    }

    #[tokio::test]
    async fn extract_mp3_passes_the_chosen_bitrate() {
        let h = harness(Behavior::WithAudio);
        let body = multipart_body("clip.mkv", &[("format", "mp3"), ("bitrate", "320k")]);
        let (status, headers, _) = send(&h.app, post("/v1/extract", body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "audio/mp3");
        assert_eq!(h.recorded()[0].bitrate(), Some(Bitrate::K320));
        assert!(h.scratch_is_empty());
    }

    #[tokio::test]
    async fn extract_without_audio_track_is_unprocessable() {
        let h = harness(Behavior::Silent);
        let body = multipart_body("silent.mov", &[("format", "mp3")]);
        let (status, _, body) = send(&h.app, post("/v1/extract", body)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json["error"], NO_AUDIO_MESSAGE);
        assert!(h.recorded().is_empty());
        assert!(h.scratch_is_empty());
    }

    #[tokio::test]
    async fn extract_failure_reports_message_and_hint() {
        let h = harness(Behavior::Broken);
        let body = multipart_body("clip.avi", &[("format", "ogg")]);
        let (status, _, body) = send(&h.app, post("/v1/extract", body)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        let error = json["error"].as_str().expect("error string");
        assert!(error.starts_with("An error occurred during processing:"));
        assert!(error.contains("encoder exploded"));
        assert_eq!(json["hint"], RETRY_HINT);
        assert!(h.scratch_is_empty());
    }

    #[tokio::test]
    async fn extract_rejects_unsupported_extensions() {
        let h = harness(Behavior::WithAudio);
        let body = multipart_body("notes.txt", &[]);
        let (status, _, _) = send(&h.app, post("/v1/extract", body)).await;

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(h.recorded().is_empty());
    }

    #[tokio::test]
    async fn extract_rejects_unknown_formats() {
        let h = harness(Behavior::WithAudio);
        let body = multipart_body("clip.mp4", &[("format", "flac")]);
        let (status, _, _) = send(&h.app, post("/v1/extract", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn convert_page_offers_playback_and_download() {
        let h = harness(Behavior::WithAudio);
        let body = multipart_body("clip.mp4", &[("format", "wav")]);
        let (status, _, body) = send(&h.app, post("/convert", body)).await;

        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).expect("utf-8");
        assert!(html.contains("Audio extracted successfully!"));
        assert!(html.contains(r#"type="audio/wav""#));
        assert!(html.contains("data:audio/wav;base64,"));
        assert!(html.contains(r#"download="extracted_audio.wav""#));
        assert!(html.contains("Download audiolift-"));
        assert!(html.contains(".wav</a>"));
        assert!(html.contains("clip.mp4"));
        assert!(h.scratch_is_empty());
    }

    #[tokio::test]
    async fn convert_page_without_audio_shows_error_and_no_player() {
        let h = harness(Behavior::Silent);
        let body = multipart_body("silent.mov", &[("format", "mp3")]);
        let (status, _, body) = send(&h.app, post("/convert", body)).await;

        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).expect("utf-8");
        assert!(html.contains(NO_AUDIO_MESSAGE));
        assert!(!html.contains("<audio"));
        assert!(!html.contains("download="));
    }

    #[tokio::test]
    async fn convert_page_without_file_is_rejected() {
        let h = harness(Behavior::WithAudio);
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"format\"\r\n\r\nwav\r\n--{BOUNDARY}--\r\n"
        );
        let (status, _, body) = send(&h.app, post("/convert", body.into_bytes())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let html = String::from_utf8(body).expect("utf-8");
        assert!(html.contains("no video file was uploaded"));
    }

    #[tokio::test]
    async fn formats_lists_the_fixed_choices() {
        let h = harness(Behavior::WithAudio);
        let req = Request::get("/v1/formats").body(Body::empty()).expect("request");
        let (status, _, body) = send(&h.app, req).await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json["output_formats"], serde_json::json!(["mp3", "wav", "aac", "ogg"]));
        assert_eq!(json["default_bitrate"], "192k");
    }

    #[tokio::test]
    async fn abandoned_request_keeps_its_slot_until_extraction_ends() {
        let h = harness(Behavior::Slow);

        let first = send(
            &h.app,
            post("/v1/extract", multipart_body("first.mp4", &[("format", "wav")])),
        );
        tokio::select! {
            _ = first => panic!("first extraction finished before it was abandoned"),
            _ = h.gauge.started.notified() => {}
        }

        let (status, _, body) = send(
            &h.app,
            post("/v1/extract", multipart_body("second.mp4", &[("format", "wav")])),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, STUB_AUDIO);
        assert_eq!(h.gauge.peak.load(Ordering::SeqCst), 1);
        assert_eq!(h.recorded().len(), 2);
    }

    #[test]
    fn ffmpeg_flag_falls_back_to_the_environment_variable() {
        let command = Params::command();
        let ffmpeg = command
            .get_arguments()
            .find(|arg| arg.get_id() == "ffmpeg")
            .expect("--ffmpeg argument");
        assert_eq!(
            ffmpeg.get_env(),
            Some(std::ffi::OsStr::new(audiolift::locate::FFMPEG_ENV_VAR))
        );
    }
}

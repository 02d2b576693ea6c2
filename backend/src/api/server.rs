//! HTTP Server for the attendance report API.
//!
//! Every POST endpoint takes a multipart form with the sheet in the `file`
//! field and optional `filter`, `policy`, `columns` and `page` fields. Each
//! request is computed from its own bytes; nothing is kept between requests.
//!
//! # API Endpoints
//!
//! | Method | Path               | Description                          |
//! |--------|--------------------|--------------------------------------|
//! | GET    | `/health`          | Health check                         |
//! | POST   | `/api/upload`      | Summary as JSON                      |
//! | POST   | `/api/export/xlsx` | Spreadsheet download                 |
//! | POST   | `/api/export/pdf`  | PDF download                         |
//! | POST   | `/api/cards`       | HTML card grid (one page)            |
//! | POST   | `/api/charts`      | SVG bar charts                       |
//! | GET    | `/api/logs`        | SSE stream for real-time logs        |

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, Method},
    response::{sse::Event, Html, IntoResponse, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_info, LOG_BROADCASTER};
use super::types::UploadResponse;
use crate::config::{self, AppConfig};
use crate::error::{LoadError, PipelineError, PipelineResult, ServerError, ServerResult};
use crate::models::{DenominatorPolicy, ReportRequest, SourceFile, SourceFormat};
use crate::render::{paginate, CardRenderer, CardView, ChartRenderer};
use crate::transform::pipeline::{summarize, Report};

type SharedConfig = Arc<AppConfig>;

/// Build the application router.
pub fn router(config: AppConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/upload", post(upload))
        .route("/api/export/xlsx", post(export_xlsx))
        .route("/api/export/pdf", post(export_pdf))
        .route("/api/cards", post(cards))
        .route("/api/charts", post(charts))
        .route("/api/logs", get(sse_logs))
        // multipart framing on top of the largest accepted file
        .layer(DefaultBodyLimit::max(config::MAX_FILE_SIZE + 64 * 1024))
        .layer(cors)
        .with_state(Arc::new(config))
}

/// Start the HTTP server
pub async fn start_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let port = config.server.port;
    let app = router(config);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("frequencia server running on http://localhost:{}", port);
    tracing::info!("POST /api/upload       - summary JSON");
    tracing::info!("POST /api/export/xlsx  - spreadsheet download");
    tracing::info!("POST /api/export/pdf   - PDF download");
    tracing::info!("POST /api/cards        - HTML cards");
    tracing::info!("POST /api/charts       - SVG charts");
    tracing::info!("GET  /api/logs         - SSE log stream");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "frequencia",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "POST /api/upload",
            "xlsx": "POST /api/export/xlsx",
            "pdf": "POST /api/export/pdf",
            "cards": "POST /api/cards",
            "charts": "POST /api/charts",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

// =============================================================================
// Multipart form
// =============================================================================

/// Fields of an upload form.
#[derive(Debug)]
struct UploadForm {
    file: SourceFile,
    filter: Option<String>,
    policy: Option<DenominatorPolicy>,
    columns: Option<usize>,
    page: Option<usize>,
}

impl UploadForm {
    fn request(&self, config: &AppConfig) -> ReportRequest {
        let mut request = ReportRequest::new(self.file.clone())
            .with_policy(self.policy.unwrap_or(config.report.denominator));
        if let Some(filter) = &self.filter {
            request = request.with_filter(filter.as_str());
        }
        request
    }
}

async fn read_form(mut multipart: Multipart, config: &AppConfig) -> ServerResult<UploadForm> {
    let mut file: Option<SourceFile> = None;
    let mut filter = None;
    let mut policy = None;
    let mut columns = None;
    let mut page = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            let file_name = field.file_name().unwrap_or("upload.csv").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?
                .to_vec();
            let format = SourceFormat::from_file_name(
                &file_name,
                config.delimiter_byte(),
                &config.input.encoding,
            )
            .ok_or_else(|| PipelineError::from(LoadError::UnsupportedFormat(file_name.clone())))?;

            log_info(format!("New upload: {} ({} bytes)", file_name, bytes.len()));
            file = Some(SourceFile {
                name: file_name,
                bytes,
                format,
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
        match name.as_str() {
            "filter" => filter = Some(value),
            "policy" if !value.trim().is_empty() => policy = Some(parse_policy(&value)?),
            "columns" if !value.trim().is_empty() => columns = Some(parse_columns(&value)?),
            "page" if !value.trim().is_empty() => page = Some(parse_number("page", &value)?),
            _ => {}
        }
    }

    let file = file.ok_or_else(|| ServerError::BadRequest("No file provided".to_string()))?;

    Ok(UploadForm {
        file,
        filter,
        policy,
        columns,
        page,
    })
}

fn parse_policy(value: &str) -> ServerResult<DenominatorPolicy> {
    value.parse().map_err(ServerError::BadRequest)
}

fn parse_number(field: &str, value: &str) -> ServerResult<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| ServerError::BadRequest(format!("'{}' must be a positive integer, got '{}'", field, value)))
}

/// Card-grid column count, rejected outside the configured range.
fn parse_columns(value: &str) -> ServerResult<usize> {
    let columns = parse_number("columns", value)?;
    config::validate_columns(columns).map_err(|e| ServerError::BadRequest(e.to_string()))?;
    Ok(columns)
}

/// Run CPU-bound pipeline work off the async executor.
async fn blocking<T, F>(work: F) -> ServerResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> PipelineResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .map_err(ServerError::from)
}

async fn report_for(form: &UploadForm, config: &AppConfig) -> ServerResult<Report> {
    let request = form.request(config);
    blocking(move || summarize(&request)).await
}

// =============================================================================
// Handlers
// =============================================================================

/// Summary as JSON
async fn upload(
    State(config): State<SharedConfig>,
    multipart: Multipart,
) -> ServerResult<Json<UploadResponse>> {
    let form = read_form(multipart, &config).await?;
    let report = report_for(&form, &config).await?;
    Ok(Json(UploadResponse::from(&report)))
}

/// Spreadsheet download
async fn export_xlsx(
    State(config): State<SharedConfig>,
    multipart: Multipart,
) -> ServerResult<impl IntoResponse> {
    let form = read_form(multipart, &config).await?;
    let request = form.request(&config);
    let bytes = blocking(move || Ok(summarize(&request)?.to_xlsx()?)).await?;

    Ok(attachment(
        bytes,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        config::XLSX_FILE_NAME,
    ))
}

/// PDF download
async fn export_pdf(
    State(config): State<SharedConfig>,
    multipart: Multipart,
) -> ServerResult<impl IntoResponse> {
    let form = read_form(multipart, &config).await?;
    let request = form.request(&config);
    let bytes = blocking(move || Ok(summarize(&request)?.to_pdf()?)).await?;

    Ok(attachment(bytes, "application/pdf", config::PDF_FILE_NAME))
}

/// One page of the card grid
async fn cards(
    State(config): State<SharedConfig>,
    multipart: Multipart,
) -> ServerResult<Html<String>> {
    let form = read_form(multipart, &config).await?;
    let report = report_for(&form, &config).await?;

    let views: Vec<CardView> = report.display_rows().into_iter().map(CardView::from).collect();
    let page = paginate(&views, form.page.unwrap_or(1), config.display.page_size);
    let renderer = CardRenderer::new(form.columns.unwrap_or(config.display.columns));

    Ok(Html(renderer.render(&page)))
}

/// Bar charts for the filtered rows
async fn charts(
    State(config): State<SharedConfig>,
    multipart: Multipart,
) -> ServerResult<impl IntoResponse> {
    let form = read_form(multipart, &config).await?;
    let report = report_for(&form, &config).await?;

    let svg = ChartRenderer::new()
        .render(&report.display_rows())
        .map_err(PipelineError::from)?;

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}

fn attachment(bytes: Vec<u8>, content_type: &'static str, file_name: &str) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
}

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::collections::{HashMap, VecDeque};
use std::env;
use std::sync::{Arc, Mutex};
use suppress_filter::{partition_streams, write_entries, ParseError};
use uuid::Uuid;

/// How many partition results are kept before the oldest is evicted.
const MAX_RESULTS: usize = 32;

/// Uploads are fully buffered, so cap the request body
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Exported streams for one completed request, held until evicted.
struct ResultRecord {
    clean: Vec<u8>,
    suppressed: Vec<u8>,
    clean_count: usize,
    suppressed_count: usize,
}

/// In-memory result store keyed by request id.
///
/// Each request gets its own handle, so concurrent requests never overwrite
/// each other's downloads. Bounded FIFO: past MAX_RESULTS the oldest record
/// is dropped and its downloads start returning 404.
#[derive(Default)]
struct ResultStore {
    records: HashMap<Uuid, ResultRecord>,
    order: VecDeque<Uuid>,
}

impl ResultStore {
    fn insert(&mut self, record: ResultRecord) -> Uuid {
        let id = Uuid::new_v4();
        self.records.insert(id, record);
        self.order.push_back(id);
        while self.order.len() > MAX_RESULTS {
            if let Some(evicted) = self.order.pop_front() {
                self.records.remove(&evicted);
            }
        }
        id
    }
}

#[derive(Clone)]
struct AppState {
    results: Arc<Mutex<ResultStore>>,
}

#[tokio::main]
async fn main() {
    let state = AppState {
        results: Arc::new(Mutex::new(ResultStore::default())),
    };

    let app = Router::new()
        .route("/supp", get(form_handler).post(upload_handler))
        .route("/download/:id/:kind", get(download_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state);

    // Get port from environment or use default
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(5000);

    let addr = format!("0.0.0.0:{}", port);
    eprintln!("Starting server on {}", addr);
    eprintln!("Endpoints:");
    eprintln!("  GET  /supp                 - Upload form");
    eprintln!("  POST /supp                 - Partition emails against suppression list");
    eprintln!("  GET  /download/<id>/<kind> - Download a result (kind: clean, suppressed)");

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// GET /supp - Upload form
async fn form_handler() -> Html<&'static str> {
    Html(
        r#"
    <h2>Email Suppression Upload</h2>
    <form method="post" enctype="multipart/form-data">
      Email file (.txt or .csv): <input type="file" name="emails" required><br><br>
      Suppression file (.txt or .csv): <input type="file" name="suppression" required><br><br>
      <input type="submit" value="Submit">
    </form>
    "#,
    )
}

/// POST /supp - Partition the uploaded target list against the suppression list
async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let mut emails: Option<(String, Vec<u8>)> = None;
    let mut suppression: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadUpload(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadUpload(e.to_string()))?;

        match name.as_str() {
            "emails" => emails = Some((filename, bytes.to_vec())),
            "suppression" => suppression = Some((filename, bytes.to_vec())),
            _ => {}
        }
    }

    // Both files are required before any processing starts
    let (emails_name, emails_bytes) = emails.ok_or(AppError::MissingInput)?;
    let (suppression_name, suppression_bytes) = suppression.ok_or(AppError::MissingInput)?;

    eprintln!(
        "Partitioning '{}' ({} bytes) against '{}' ({} bytes)",
        emails_name,
        emails_bytes.len(),
        suppression_name,
        suppression_bytes.len()
    );

    let result = partition_streams(
        &emails_bytes[..],
        &emails_name,
        &suppression_bytes[..],
        &suppression_name,
    )?;

    let mut clean = Vec::new();
    write_entries(&result.clean, &mut clean)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let mut suppressed = Vec::new();
    write_entries(&result.suppressed, &mut suppressed)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let record = ResultRecord {
        clean,
        suppressed,
        clean_count: result.clean_count(),
        suppressed_count: result.suppressed_count(),
    };
    let id = state.results.lock().unwrap().insert(record);

    eprintln!(
        "Result {}: clean {}, suppressed {}",
        id,
        result.clean_count(),
        result.suppressed_count()
    );

    Ok(Html(format!(
        r#"
    <h2>Results</h2>
    <p>Clean emails: {clean}</p>
    <p>Suppressed emails: {suppressed}</p>
    <a href="/download/{id}/clean">Download Clean Emails</a><br>
    <a href="/download/{id}/suppressed">Download Suppressed Emails</a><br><br>
    <a href="/supp">Try Again</a>
    "#,
        clean = result.clean_count(),
        suppressed = result.suppressed_count(),
        id = id,
    )))
}

/// GET /download/:id/:kind - Serve a stored result as a downloadable attachment
async fn download_handler(
    State(state): State<AppState>,
    Path((id, kind)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let id = Uuid::parse_str(&id).map_err(|_| AppError::NotFound)?;

    let (bytes, filename) = {
        let store = state.results.lock().unwrap();
        let record = store.records.get(&id).ok_or(AppError::NotFound)?;
        match kind.as_str() {
            "clean" => (record.clean.clone(), "clean_emails.txt"),
            "suppressed" => (record.suppressed.clone(), "suppressed_emails.txt"),
            _ => return Err(AppError::NotFound),
        }
    };

    eprintln!("Serving {} for result {} ({} bytes)", filename, id, bytes.len());

    Ok((
        StatusCode::OK,
        [
            ("content-type", "text/plain; charset=utf-8".to_string()),
            (
                "content-disposition",
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Application errors
#[derive(Debug)]
enum AppError {
    MissingInput,
    BadUpload(String),
    Parse(ParseError),
    Internal(String),
    NotFound,
}

impl From<ParseError> for AppError {
    fn from(e: ParseError) -> Self {
        AppError::Parse(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::MissingInput => {
                (StatusCode::BAD_REQUEST, "Both files are required!".to_string())
            }
            AppError::BadUpload(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Parse(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::NotFound => (StatusCode::NOT_FOUND, "File not found".to_string()),
        };

        (status, message).into_response()
    }
}

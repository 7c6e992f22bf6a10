//! Request handlers for the submission API.
//!
//! Each handler decides its own status code and message. Store errors are
//! logged here with their cause and answered with a generic reason.

use axum::{
    extract::{FromRequest, Multipart, Query, Request, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};

use crate::health::{check_store, StoreHealth};
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::store::{NewSubmission, StoreError};

pub const SUBMISSION_OK: &str = "Submission successful!";

/// Fields of `POST /api/submit`, from the body or the query string.
#[derive(Debug, Default, Deserialize)]
pub struct SubmissionForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SubmissionForm {
    /// Body values win; the query string fills fields the body lacks.
    fn or(self, fallback: SubmissionForm) -> SubmissionForm {
        SubmissionForm {
            name: self.name.or(fallback.name),
            message: self.message.or(fallback.message),
        }
    }
}

/// Read the submission fields from a urlencoded or multipart body plus the
/// query string. Other body types are ignored.
async fn read_form(request: Request) -> Result<SubmissionForm, String> {
    let query = match request.uri().query() {
        Some(_) => Query::<SubmissionForm>::try_from_uri(request.uri())
            .map_err(|e| e.to_string())?
            .0,
        None => SubmissionForm::default(),
    };

    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let body = if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| e.to_string())?;
        let mut form = SubmissionForm::default();
        while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
            let key = field.name().map(str::to_owned);
            match key.as_deref() {
                Some("name") => form.name = Some(field.text().await.map_err(|e| e.to_string())?),
                Some("message") => {
                    form.message = Some(field.text().await.map_err(|e| e.to_string())?)
                }
                _ => {}
            }
        }
        form
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        Form::<SubmissionForm>::from_request(request, &())
            .await
            .map_err(|e| e.to_string())?
            .0
    } else {
        SubmissionForm::default()
    };

    Ok(body.or(query))
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub status: &'static str,
}

/// `GET /api/ready`: the process is up and serving.
pub async fn ready(method: Method, headers: HeaderMap) -> &'static str {
    tracing::info!(
        request_id = %request_id(&headers),
        method = %method,
        "Readiness requested"
    );
    "Backend is running"
}

/// `GET /api/health`: ping the store.
pub async fn health(State(state): State<AppState>) -> Response {
    tracing::info!("Health check requested");
    match check_store(state.store.as_ref(), state.health_timeout).await {
        StoreHealth::Reachable => (StatusCode::OK, "OK").into_response(),
        StoreHealth::Unreachable => {
            (StatusCode::SERVICE_UNAVAILABLE, "Database connection error").into_response()
        }
    }
}

/// `POST /api/submit`: validate the form and insert one row.
pub async fn create_submission(State(state): State<AppState>, request: Request) -> Response {
    let request_id = request_id(request.headers()).to_owned();

    let form = match read_form(request).await {
        Ok(form) => form,
        Err(reason) => {
            tracing::debug!(request_id = %request_id, reason = %reason, "Rejected form body");
            return (StatusCode::BAD_REQUEST, "Error parsing form data").into_response();
        }
    };

    let submission = match NewSubmission::new(
        form.name.unwrap_or_default(),
        form.message.unwrap_or_default(),
    ) {
        Ok(submission) => submission,
        Err(missing) => {
            tracing::debug!(request_id = %request_id, reason = %missing, "Rejected submission");
            return (StatusCode::BAD_REQUEST, "Missing form fields").into_response();
        }
    };

    match state.store.insert(submission).await {
        Ok(stored) => {
            tracing::info!(
                request_id = %request_id,
                id = stored.id,
                name = %stored.name,
                "New submission"
            );
            Json(SubmitResponse { status: SUBMISSION_OK }).into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Error inserting data");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error inserting data").into_response()
        }
    }
}

/// `GET /api/submissions`: every submission, newest first.
pub async fn list_submissions(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let request_id = request_id(&headers);

    match state.store.list().await {
        Ok(submissions) => {
            tracing::info!(request_id = %request_id, count = submissions.len(), "Fetched submissions");
            Json(submissions).into_response()
        }
        Err(StoreError::Decode(e)) => {
            tracing::error!(request_id = %request_id, error = %e, "Error scanning data");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error scanning data").into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Error fetching submissions");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error fetching data").into_response()
        }
    }
}

/// CORS preflight: headers only, no body, no store access.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Any method the route does not serve.
pub async fn invalid_method(method: Method, uri: Uri) -> (StatusCode, &'static str) {
    tracing::debug!(method = %method, path = %uri.path(), "Invalid request method");
    (StatusCode::METHOD_NOT_ALLOWED, "Invalid request method")
}

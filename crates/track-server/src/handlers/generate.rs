//! Activity generation handler.

use std::sync::Arc;

use axum::{
    Extension,
    extract::rejection::JsonRejection,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use axum_extra::headers::{ContentType, HeaderMapExt, Mime};
use time::PrimitiveDateTime;
use track_synth::prelude::*;

use crate::{
    errors::AppError,
    packaging::{self, Download},
    types::{ErrorResponse, GenerateRequest},
};

/// Generate one TCX activity per start time.
///
/// A single time downloads `run_<YYYYMMDD_HHMMSS>.tcx`; several download
/// `runs.zip` with one member per time.
#[utoipa::path(
    post,
    path = "/generate",
    tag = "generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "TCX document (application/xml) or zip archive (application/zip)"),
        (status = 400, description = "Invalid start time", body = ErrorResponse),
        (status = 500, description = "Generation failed", body = ErrorResponse)
    )
)]
pub async fn generate_activities(
    Extension(generator): Extension<Arc<TrajectoryGenerator>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let starts = request.start_times()?;

    let download = build_download(&generator, &starts)?;

    tracing::info!(
        activities = starts.len(),
        file_name = %download.file_name,
        bytes = download.bytes.len(),
        "Generated download"
    );

    Ok(download.into_response())
}

/// Generates every activity in order and packages the documents.
fn build_download(
    generator: &TrajectoryGenerator,
    starts: &[PrimitiveDateTime],
) -> Result<Download, AppError> {
    let mut rng = rand::thread_rng();
    let style = generator.config().timestamps;

    let files = starts
        .iter()
        .map(|start| {
            let activity = generator.generate(*start, &mut rng)?;
            Ok((file_name_for(*start), write_tcx(&activity, style)))
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(packaging::package(files)?)
}

impl IntoResponse for Download {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();

        if let Ok(mime) = self.content_type.parse::<Mime>() {
            headers.typed_insert(ContentType::from(mime));
        }
        if let Ok(value) =
            HeaderValue::from_str(&format!("attachment; filename=\"{}\"", self.file_name))
        {
            headers.insert(header::CONTENT_DISPOSITION, value);
        }

        (StatusCode::OK, headers, self.bytes).into_response()
    }
}

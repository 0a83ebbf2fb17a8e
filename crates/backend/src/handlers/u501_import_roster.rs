use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use contracts::system::audit::{AuditSeverity, AuditStatus};
use contracts::usecases::common::{UseCaseError, UseCaseMetadata};
use contracts::usecases::u501_import_roster::{
    ImportProfile, ImportResponse, ImportRoster, ImportTemplate,
};
use serde_json::json;

use super::common::{client_ip, ApiError};
use crate::routes::AppState;
use crate::shared::format::format_number;
use crate::system::audit::service::{self as audit, AuditContext};
use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::permissions::Permission;
use crate::usecases::u501_import_roster::{
    self as u501, Principal, RosterImporter, UploadFormat, UploadTable,
};

/// Multipart field carrying the spreadsheet
const FILE_FIELD: &str = "excel_file";

struct Upload {
    filename: String,
    bytes: Bytes,
}

/// POST /api/u501/import/users
pub async fn import_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    user: CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ImportResponse>), ApiError> {
    run_import(state, ImportProfile::User, headers, user, multipart).await
}

/// POST /api/u501/import/members
pub async fn import_members(
    State(state): State<AppState>,
    headers: HeaderMap,
    user: CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ImportResponse>), ApiError> {
    run_import(state, ImportProfile::Member, headers, user, multipart).await
}

/// GET /api/u501/import/users/template
pub async fn users_template(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ImportTemplate>, ApiError> {
    user.require(Permission::ImportUsers)?;
    Ok(Json(u501::template(ImportProfile::User, &state.config.import)))
}

/// GET /api/u501/import/members/template
pub async fn members_template(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ImportTemplate>, ApiError> {
    user.require(Permission::ImportMembers)?;
    Ok(Json(u501::template(ImportProfile::Member, &state.config.import)))
}

/// Upload limit in the largest unit that does not round it down to zero
fn limit_text(max_bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;
    match max_bytes {
        n if n >= MB => format!("{}MB", format_number(n / MB)),
        n if n >= KB => format!("{}KB", format_number(n / KB)),
        n => format!("{} bytes", format_number(n)),
    }
}

fn too_large(max_bytes: usize) -> ApiError {
    ApiError::bad_request(UseCaseError::file_too_large(format!(
        "File size must be less than {}.",
        limit_text(max_bytes)
    )))
}

async fn read_upload(mut multipart: Multipart, max_bytes: usize) -> Result<Upload, ApiError> {
    let multipart_error = |e: MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            too_large(max_bytes)
        } else {
            ApiError::bad_request(UseCaseError::validation(e.body_text()))
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        if filename.is_empty() && bytes.is_empty() {
            break;
        }
        return Ok(Upload { filename, bytes });
    }

    Err(ApiError::bad_request(UseCaseError::no_file(
        "Please upload an Excel file.",
    )))
}

async fn run_import(
    state: AppState,
    profile: ImportProfile,
    headers: HeaderMap,
    user: CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ImportResponse>), ApiError> {
    user.require(Permission::for_import(profile))?;

    let max_bytes = state.config.import.max_upload_bytes;
    let upload = read_upload(multipart, max_bytes).await?;

    let format = UploadFormat::from_filename(&upload.filename).ok_or_else(|| {
        ApiError::bad_request(UseCaseError::invalid_file_type(
            "Only Excel files (.xlsx, .xls) or CSV files (.csv) are allowed.",
        ))
    })?;
    if upload.bytes.len() > max_bytes {
        return Err(too_large(max_bytes));
    }

    let claims = &user.0;
    let principal = Principal::from(claims);
    let ctx = AuditContext {
        actor: claims,
        ip_address: client_ip(&headers),
    };

    tracing::info!(
        "[{}] {} import of '{}' ({} bytes) requested by {}",
        ImportRoster::full_name(),
        profile,
        upload.filename,
        upload.bytes.len(),
        principal.identity
    );

    let importer = RosterImporter::new(state.db.clone(), state.config.import.clone());
    let result = match UploadTable::read(format, upload.bytes.to_vec()) {
        Ok(table) => importer.import(profile, &table, &principal).await,
        Err(e) => Err(e),
    };

    let report = match result {
        Ok(report) => report,
        Err(e) if e.is_validation() => {
            tracing::warn!("{} import validation error: {}", profile, e);
            return Err(ApiError::bad_request(UseCaseError::validation(e.to_string())));
        }
        Err(e) => {
            tracing::error!("Error importing {}: {:#}", profile.noun(), e);
            audit::record(
                &state.db,
                &ctx,
                profile.failure_action(),
                "System",
                AuditStatus::Failed,
                AuditSeverity::High,
                json!({
                    "filename": upload.filename,
                    "error": e.to_string(),
                    "imported_by": principal.identity,
                }),
            )
            .await;
            return Err(ApiError::internal(
                UseCaseError::import_failed(format!(
                    "An error occurred while importing {}.",
                    profile.noun()
                ))
                .with_details(e.to_string()),
            ));
        }
    };

    let dropped = state.cache.invalidate_all();
    tracing::debug!("Directory cache invalidated ({} entries)", dropped);

    let summary = &report.summary;
    audit::record(
        &state.db,
        &ctx,
        profile.audit_action(),
        profile.audit_target(),
        AuditStatus::Success,
        AuditSeverity::High,
        json!({
            "filename": upload.filename,
            "total_rows": summary.total_rows,
            "created": summary.successful,
            "rows_failed": summary.failed,
            "rows_skipped": summary.skipped,
            "stations_created": summary.stations_created.len(),
            "divisions_created": summary.divisions_created.len(),
            "imported_by": principal.identity,
            "success_rate": summary.success_rate,
        }),
    )
    .await;

    let message = u501::completion_message(profile, summary);
    Ok((
        StatusCode::CREATED,
        Json(ImportResponse { message, report }),
    ))
}

use super::distribute;
use crate::database::{agents, list_items, AsyncDbConnection};
use crate::error::ApiError;
use crate::helpers::session::AuthenticatedAdmin;
use extractors::{validate_records, ContactListParser};
use shared_types::{ContactRecord, UploadSummary};
use std::path::{Path, PathBuf};

async fn parse_upload(path: &Path) -> Result<Vec<ContactRecord>, ApiError> {
    let path: PathBuf = path.to_path_buf();
    let records = tokio::task::spawn_blocking(move || ContactListParser::new().parse_path(&path))
        .await
        .map_err(|e| ApiError::Internal(format!("Parser task failed: {}", e)))??;
    Ok(records)
}

/// Parse, validate, distribute and persist one uploaded list for `admin`.
///
/// Nothing is written unless every row validates and at least one agent
/// exists.
pub async fn process_upload(
    conn: AsyncDbConnection,
    admin: &AuthenticatedAdmin,
    path: &Path,
) -> Result<UploadSummary, ApiError> {
    let records = parse_upload(path).await?;
    if records.is_empty() {
        return Err(ApiError::Validation(
            "The uploaded file contains no rows".to_string(),
        ));
    }

    let errors = validate_records(&records);
    if !errors.is_empty() {
        return Err(ApiError::Validation(format!(
            "Validation failed: {}",
            errors.join(", ")
        )));
    }

    let agents = agents::list_agents_for_distribution(conn.clone(), admin.id).await?;
    let distribution = distribute(records, &agents, admin.id)?;
    let written = list_items::insert_distribution(conn, &distribution).await?;

    tracing::info!(
        "Distributed {} items across {} agents in batch {}",
        written,
        agents.len(),
        distribution.batch_id
    );

    Ok(UploadSummary {
        batch_id: distribution.batch_id,
        total_items: distribution.total_items(),
        distribution: distribution.summary(),
    })
}

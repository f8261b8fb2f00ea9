use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use shared_types::{AgentLists, ApiResponse};
use std::sync::Arc;

use super::parse_id;
use crate::config::UploadConfig;
use crate::database::agents as agents_db;
use crate::database::list_items as list_items_db;
use crate::database::{Database, DbError};
use crate::distribution::process_upload;
use crate::error::ApiError;
use crate::helpers::session::AuthenticatedAdmin;
use crate::helpers::uploads::receive_upload;

pub async fn upload_list(
    db: web::Data<Arc<Database>>,
    upload_config: web::Data<UploadConfig>,
    admin: AuthenticatedAdmin,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let upload = receive_upload(payload, &upload_config).await?;
    tracing::info!(
        "Admin {} uploaded {} ({:?})",
        admin.id,
        upload.original_name,
        upload.format
    );

    let result = process_upload(db.async_connection.clone(), &admin, upload.file.path()).await;

    // The stored copy goes away whether or not processing succeeded
    if let Err(e) = upload.file.close() {
        tracing::warn!("Failed to remove uploaded file: {}", e);
    }

    let summary = result?;
    Ok(HttpResponse::Ok().json(
        ApiResponse::ok(summary).with_message("List uploaded and distributed successfully"),
    ))
}

pub async fn list_summary(
    db: web::Data<Arc<Database>>,
    admin: AuthenticatedAdmin,
) -> Result<HttpResponse, ApiError> {
    let batches = list_items_db::list_batches(db.async_connection.clone(), admin.id).await?;
    let count = batches.len();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(batches).with_count(count)))
}

pub async fn batch_detail(
    db: web::Data<Arc<Database>>,
    admin: AuthenticatedAdmin,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let batch_id = parse_id(&path, "batch")?;

    let detail = list_items_db::get_batch_detail(db.async_connection.clone(), admin.id, batch_id)
        .await
        .map_err(|e| match e {
            DbError::NotFound => {
                ApiError::NotFound("Batch not found or no items in this batch".to_string())
            }
            other => other.into(),
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(detail)))
}

pub async fn agent_lists(
    db: web::Data<Arc<Database>>,
    admin: AuthenticatedAdmin,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let agent_id = parse_id(&path, "agent")?;

    let agent = agents_db::find_owned_agent(db.async_connection.clone(), agent_id, admin.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Agent not found".to_string()))?;

    let lists =
        list_items_db::list_agent_batches(db.async_connection.clone(), admin.id, agent.id).await?;
    let count = lists.len();

    Ok(HttpResponse::Ok().json(
        ApiResponse::ok(AgentLists {
            agent_id: agent.id,
            agent_name: agent.name,
            lists,
        })
        .with_count(count),
    ))
}

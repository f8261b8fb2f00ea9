use actix_web::{web, HttpResponse};
use shared_types::{Agent, ApiResponse, CreateAgentRequest, UpdateAgentRequest};
use std::sync::Arc;

use super::parse_id;
use crate::database::agents::{self as agents_db, AgentChanges, NewAgent};
use crate::database::{AsyncDbConnection, Database, DbError};
use crate::error::ApiError;
use crate::helpers::password::hash_password;
use crate::helpers::session::AuthenticatedAdmin;
use crate::helpers::validation;

/// Loads an agent and checks that `admin` owns it. `action` completes the
/// "Not authorized to ... this agent" message.
async fn owned_agent(
    conn: AsyncDbConnection,
    raw_id: &str,
    admin: &AuthenticatedAdmin,
    action: &str,
) -> Result<Agent, ApiError> {
    let id = parse_id(raw_id, "agent")?;

    let agent = agents_db::get_agent(conn, id).await.map_err(|e| match e {
        DbError::NotFound => ApiError::NotFound("Agent not found".to_string()),
        other => other.into(),
    })?;

    if agent.owner_id != admin.id {
        return Err(ApiError::Unauthorized(format!(
            "Not authorized to {} this agent",
            action
        )));
    }

    Ok(agent)
}

/// Trimmed value of an optional field, `None` when absent or blank.
fn provided(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn create_agent(
    db: web::Data<Arc<Database>>,
    admin: AuthenticatedAdmin,
    request: web::Json<CreateAgentRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    let name = request.name.trim().to_string();
    let email = request.email.trim().to_lowercase();
    let mobile_number = request.mobile_number.trim().to_string();

    validation::require(&name, "Please provide a name")?;
    validation::require(&email, "Please provide an email")?;
    validation::require(&mobile_number, "Please provide a mobile number")?;
    validation::require(&request.password, "Please provide a password")?;
    validation::validate_email(&email)?;
    validation::validate_mobile_number(&mobile_number)?;
    validation::validate_password(&request.password)?;

    let new_agent = NewAgent {
        name,
        email,
        mobile_number,
        password_hash: hash_password(&request.password)?,
    };
    let agent = agents_db::insert_agent(db.async_connection.clone(), admin.id, &new_agent).await?;

    tracing::info!("Admin {} created agent {}", admin.id, agent.id);
    Ok(HttpResponse::Created().json(ApiResponse::ok(agent)))
}

pub async fn list_agents(
    db: web::Data<Arc<Database>>,
    admin: AuthenticatedAdmin,
) -> Result<HttpResponse, ApiError> {
    let agents = agents_db::list_agents(db.async_connection.clone(), admin.id).await?;
    let count = agents.len();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(agents).with_count(count)))
}

pub async fn get_agent(
    db: web::Data<Arc<Database>>,
    admin: AuthenticatedAdmin,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let agent = owned_agent(db.async_connection.clone(), &path, &admin, "access").await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(agent)))
}

pub async fn update_agent(
    db: web::Data<Arc<Database>>,
    admin: AuthenticatedAdmin,
    path: web::Path<String>,
    request: web::Json<UpdateAgentRequest>,
) -> Result<HttpResponse, ApiError> {
    let agent = owned_agent(db.async_connection.clone(), &path, &admin, "update").await?;
    let request = request.into_inner();

    let changes = AgentChanges {
        name: provided(request.name),
        email: provided(request.email).map(|e| e.to_lowercase()),
        mobile_number: provided(request.mobile_number),
    };
    if let Some(email) = &changes.email {
        validation::validate_email(email)?;
    }
    if let Some(mobile_number) = &changes.mobile_number {
        validation::validate_mobile_number(mobile_number)?;
    }

    let updated = agents_db::update_agent(db.async_connection.clone(), agent.id, changes).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(updated)))
}

pub async fn delete_agent(
    db: web::Data<Arc<Database>>,
    admin: AuthenticatedAdmin,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let agent = owned_agent(db.async_connection.clone(), &path, &admin, "delete").await?;

    agents_db::delete_agent(db.async_connection.clone(), agent.id).await?;
    tracing::info!("Admin {} deleted agent {}", admin.id, agent.id);

    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({}))))
}

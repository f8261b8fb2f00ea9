use super::{is_unique_violation, not_found, AsyncDbConnection, DbError};
use rusqlite::{params, OptionalExtension, Row};
use shared_types::Agent;
use uuid::Uuid;

pub struct NewAgent {
    pub name: String,
    pub email: String,
    pub mobile_number: String,
    pub password_hash: String,
}

/// Fields to change on an agent; `None` keeps the stored value.
#[derive(Default)]
pub struct AgentChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile_number: Option<String>,
}

const AGENT_COLUMNS: &str =
    "id, name, email, mobile_number, owner_id, created_at, updated_at";

fn agent_from_row(row: &Row) -> rusqlite::Result<Agent> {
    Ok(Agent {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        mobile_number: row.get(3)?,
        owner_id: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn duplicate_email(e: rusqlite::Error) -> DbError {
    if is_unique_violation(&e) {
        DbError::Duplicate("Agent with this email already exists".to_string())
    } else {
        DbError::Sqlite(e)
    }
}

pub async fn insert_agent(
    conn: AsyncDbConnection,
    owner_id: Uuid,
    agent: &NewAgent,
) -> Result<Agent, DbError> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp_millis();
    let id = Uuid::new_v4();

    conn.execute(
        "INSERT INTO agents
         (id, name, email, mobile_number, password_hash, owner_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id,
            &agent.name,
            &agent.email,
            &agent.mobile_number,
            &agent.password_hash,
            owner_id,
            now,
            now
        ],
    )
    .map_err(duplicate_email)?;

    Ok(Agent {
        id,
        name: agent.name.clone(),
        email: agent.email.clone(),
        mobile_number: agent.mobile_number.clone(),
        owner_id,
        created_at: now,
        updated_at: now,
    })
}

/// The admin's agents, most recently created first.
pub async fn list_agents(conn: AsyncDbConnection, owner_id: Uuid) -> Result<Vec<Agent>, DbError> {
    query_agents(
        conn,
        owner_id,
        "ORDER BY created_at DESC, rowid DESC",
    )
    .await
}

/// The admin's agents in creation order. This order drives round-robin
/// assignment, so it must stay stable across calls.
pub async fn list_agents_for_distribution(
    conn: AsyncDbConnection,
    owner_id: Uuid,
) -> Result<Vec<Agent>, DbError> {
    query_agents(conn, owner_id, "ORDER BY created_at ASC, rowid ASC").await
}

async fn query_agents(
    conn: AsyncDbConnection,
    owner_id: Uuid,
    order_by: &str,
) -> Result<Vec<Agent>, DbError> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {AGENT_COLUMNS} FROM agents WHERE owner_id = ?1 {order_by}"
    ))?;

    let agents = stmt
        .query_map([owner_id], agent_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(agents)
}

pub async fn get_agent(conn: AsyncDbConnection, id: Uuid) -> Result<Agent, DbError> {
    let conn = conn.lock().await?;

    conn.query_row(
        &format!("SELECT {AGENT_COLUMNS} FROM agents WHERE id = ?1"),
        [id],
        agent_from_row,
    )
    .map_err(not_found)
}

/// Looks the agent up only among the admin's own agents.
pub async fn find_owned_agent(
    conn: AsyncDbConnection,
    id: Uuid,
    owner_id: Uuid,
) -> Result<Option<Agent>, DbError> {
    let conn = conn.lock().await?;

    let agent = conn
        .query_row(
            &format!("SELECT {AGENT_COLUMNS} FROM agents WHERE id = ?1 AND owner_id = ?2"),
            params![id, owner_id],
            agent_from_row,
        )
        .optional()?;

    Ok(agent)
}

pub async fn update_agent(
    conn: AsyncDbConnection,
    id: Uuid,
    changes: AgentChanges,
) -> Result<Agent, DbError> {
    {
        let conn = conn.lock().await?;
        let now = chrono::Utc::now().timestamp_millis();

        let updated = conn
            .execute(
                "UPDATE agents SET
                    name = COALESCE(?1, name),
                    email = COALESCE(?2, email),
                    mobile_number = COALESCE(?3, mobile_number),
                    updated_at = ?4
                 WHERE id = ?5",
                params![changes.name, changes.email, changes.mobile_number, now, id],
            )
            .map_err(duplicate_email)?;

        if updated == 0 {
            return Err(DbError::NotFound);
        }
    }

    get_agent(conn, id).await
}

pub async fn delete_agent(conn: AsyncDbConnection, id: Uuid) -> Result<(), DbError> {
    let conn = conn.lock().await?;

    let deleted = conn.execute("DELETE FROM agents WHERE id = ?1", [id])?;
    if deleted == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

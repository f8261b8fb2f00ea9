use super::{is_unique_violation, not_found, AsyncDbConnection, DbError};
use rusqlite::{params, OptionalExtension, Row};
use shared_types::{AdminProfile, AdminRole};
use uuid::Uuid;

/// Admin row including the password hash; only the auth handlers see this.
pub struct AdminCredentials {
    pub profile: AdminProfile,
    pub password_hash: String,
}

fn profile_from_row(row: &Row) -> rusqlite::Result<AdminProfile> {
    let role: String = row.get(2)?;
    Ok(AdminProfile {
        id: row.get(0)?,
        email: row.get(1)?,
        role: AdminRole::parse(&role).unwrap_or(AdminRole::Admin),
        created_at: row.get(3)?,
    })
}

pub async fn insert_admin(
    conn: AsyncDbConnection,
    email: &str,
    password_hash: &str,
) -> Result<AdminProfile, DbError> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp_millis();
    let id = Uuid::new_v4();
    let role = AdminRole::Admin;

    conn.execute(
        "INSERT INTO admins (id, email, password_hash, role, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, email, password_hash, role.as_str(), now],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            DbError::Duplicate("An account with this email already exists".to_string())
        } else {
            DbError::Sqlite(e)
        }
    })?;

    Ok(AdminProfile {
        id,
        email: email.to_string(),
        role,
        created_at: now,
    })
}

pub async fn find_admin_by_email(
    conn: AsyncDbConnection,
    email: &str,
) -> Result<Option<AdminCredentials>, DbError> {
    let conn = conn.lock().await?;

    let admin = conn
        .query_row(
            "SELECT id, email, role, created_at, password_hash FROM admins WHERE email = ?1",
            [email],
            |row| {
                Ok(AdminCredentials {
                    profile: profile_from_row(row)?,
                    password_hash: row.get(4)?,
                })
            },
        )
        .optional()?;

    Ok(admin)
}

pub async fn get_admin(conn: AsyncDbConnection, id: Uuid) -> Result<AdminProfile, DbError> {
    let conn = conn.lock().await?;

    conn.query_row(
        "SELECT id, email, role, created_at FROM admins WHERE id = ?1",
        [id],
        profile_from_row,
    )
    .map_err(not_found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::temp_database;

    #[tokio::test]
    async fn test_insert_and_lookup_admin() {
        let (_dir, db) = temp_database();
        let conn = db.async_connection.clone();

        let admin = insert_admin(conn.clone(), "boss@example.com", "hash").await.unwrap();
        assert_eq!(admin.role, AdminRole::Admin);

        let found = find_admin_by_email(conn.clone(), "boss@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.profile.id, admin.id);
        assert_eq!(found.password_hash, "hash");

        let by_id = get_admin(conn.clone(), admin.id).await.unwrap();
        assert_eq!(by_id.email, "boss@example.com");

        assert!(find_admin_by_email(conn, "nobody@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_admin_email() {
        let (_dir, db) = temp_database();
        let conn = db.async_connection.clone();

        insert_admin(conn.clone(), "boss@example.com", "hash").await.unwrap();
        let result = insert_admin(conn, "boss@example.com", "other").await;
        assert!(matches!(result, Err(DbError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_get_missing_admin() {
        let (_dir, db) = temp_database();
        let result = get_admin(db.async_connection.clone(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(DbError::NotFound)));
    }
}

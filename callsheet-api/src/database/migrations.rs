use rusqlite::Connection;

/// Run all database migrations. Every statement is idempotent.
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS admins (
            id BLOB PRIMARY KEY,
            email VARCHAR NOT NULL UNIQUE,
            password_hash VARCHAR NOT NULL,
            role VARCHAR NOT NULL DEFAULT 'admin' CHECK (role IN ('admin')),
            created_at BIGINT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS agents (
            id BLOB PRIMARY KEY,
            name VARCHAR NOT NULL,
            email VARCHAR NOT NULL UNIQUE,
            mobile_number VARCHAR NOT NULL,
            password_hash VARCHAR NOT NULL,
            owner_id BLOB NOT NULL,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL,
            FOREIGN KEY (owner_id) REFERENCES admins (id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_agents_owner_created
            ON agents(owner_id, created_at)",
        [],
    )?;

    // No foreign key on assigned_agent_id: items outlive a deleted agent
    conn.execute(
        "CREATE TABLE IF NOT EXISTS list_items (
            id BLOB PRIMARY KEY,
            first_name VARCHAR NOT NULL,
            phone VARCHAR NOT NULL,
            notes VARCHAR NOT NULL DEFAULT '',
            assigned_agent_id BLOB NOT NULL,
            batch_id BLOB NOT NULL,
            owner_id BLOB NOT NULL,
            row_index BIGINT NOT NULL,
            created_at BIGINT NOT NULL,
            FOREIGN KEY (owner_id) REFERENCES admins (id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_list_items_owner_batch
            ON list_items(owner_id, batch_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_list_items_owner_agent
            ON list_items(owner_id, assigned_agent_id)",
        [],
    )?;

    Ok(())
}

use super::{AsyncDbConnection, DbError};
use crate::distribution::Distribution;
use rusqlite::params;
use shared_types::{AgentBatchGroup, BatchAgentGroup, BatchDetail, BatchSummary, ListItemEntry};
use uuid::Uuid;

/// Writes every agent's share of the batch, skipping agents with nothing
/// assigned. All writes share one transaction: either the whole batch lands
/// or none of it does. Returns the number of items written.
pub async fn insert_distribution(
    conn: AsyncDbConnection,
    distribution: &Distribution,
) -> Result<usize, DbError> {
    let mut conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp_millis();
    let tx = conn.transaction()?;
    let mut written = 0;

    for assignment in &distribution.assignments {
        if assignment.items.is_empty() {
            continue;
        }

        let mut stmt = tx.prepare_cached(
            "INSERT INTO list_items
             (id, first_name, phone, notes, assigned_agent_id, batch_id, owner_id, row_index, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;

        for item in &assignment.items {
            stmt.execute(params![
                Uuid::new_v4(),
                &item.record.first_name,
                &item.record.phone,
                &item.record.notes,
                item.assigned_agent_id,
                item.batch_id,
                item.owner_id,
                item.row_index as i64,
                now
            ])?;
            written += 1;
        }

        tracing::debug!(
            "Wrote {} items for agent {} in batch {}",
            assignment.items.len(),
            assignment.agent_id,
            distribution.batch_id
        );
    }

    tx.commit()?;

    Ok(written)
}

/// One row per upload batch owned by the admin, most recent first.
pub async fn list_batches(
    conn: AsyncDbConnection,
    owner_id: Uuid,
) -> Result<Vec<BatchSummary>, DbError> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(
        "SELECT batch_id, COUNT(*), COUNT(DISTINCT assigned_agent_id), MIN(created_at) AS batch_created
         FROM list_items
         WHERE owner_id = ?1
         GROUP BY batch_id
         ORDER BY batch_created DESC, batch_id",
    )?;

    let batches = stmt
        .query_map([owner_id], |row| {
            Ok(BatchSummary {
                batch_id: row.get(0)?,
                count: row.get(1)?,
                agent_count: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(batches)
}

/// Items of one batch grouped by agent, agents sorted by name and items in
/// file order. Items whose agent was deleted come last, without name/email.
/// A batch with no items owned by the admin is `NotFound`.
pub async fn get_batch_detail(
    conn: AsyncDbConnection,
    owner_id: Uuid,
    batch_id: Uuid,
) -> Result<BatchDetail, DbError> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(
        "SELECT li.assigned_agent_id, a.name, a.email, li.id, li.first_name, li.phone, li.notes
         FROM list_items li
         LEFT JOIN agents a ON a.id = li.assigned_agent_id
         WHERE li.batch_id = ?1 AND li.owner_id = ?2
         ORDER BY a.name IS NULL, a.name ASC, li.assigned_agent_id, li.row_index",
    )?;

    let rows = stmt.query_map(params![batch_id, owner_id], |row| {
        Ok((
            row.get::<_, Uuid>(0)?,
            row.get::<_, Option<String>>(1)?,
            row.get::<_, Option<String>>(2)?,
            entry_from_columns(row, 3)?,
        ))
    })?;

    let mut distribution: Vec<BatchAgentGroup> = Vec::new();
    for row in rows {
        let (agent_id, agent_name, agent_email, entry) = row?;
        match distribution.last_mut() {
            Some(group) if group.agent_id == agent_id => {
                group.items.push(entry);
                group.count += 1;
            }
            _ => distribution.push(BatchAgentGroup {
                agent_id,
                agent_name,
                agent_email,
                count: 1,
                items: vec![entry],
            }),
        }
    }

    if distribution.is_empty() {
        return Err(DbError::NotFound);
    }

    Ok(BatchDetail {
        batch_id,
        distribution,
    })
}

/// The agent's items grouped by batch, most recent batch first.
pub async fn list_agent_batches(
    conn: AsyncDbConnection,
    owner_id: Uuid,
    agent_id: Uuid,
) -> Result<Vec<AgentBatchGroup>, DbError> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(
        "SELECT li.batch_id,
                (SELECT MIN(b.created_at) FROM list_items b WHERE b.batch_id = li.batch_id) AS batch_created,
                li.id, li.first_name, li.phone, li.notes
         FROM list_items li
         WHERE li.assigned_agent_id = ?1 AND li.owner_id = ?2
         ORDER BY batch_created DESC, li.batch_id, li.row_index",
    )?;

    let rows = stmt.query_map(params![agent_id, owner_id], |row| {
        Ok((
            row.get::<_, Uuid>(0)?,
            row.get::<_, i64>(1)?,
            entry_from_columns(row, 2)?,
        ))
    })?;

    let mut lists: Vec<AgentBatchGroup> = Vec::new();
    for row in rows {
        let (batch_id, created_at, entry) = row?;
        match lists.last_mut() {
            Some(group) if group.batch_id == batch_id => {
                group.items.push(entry);
                group.count += 1;
            }
            _ => lists.push(AgentBatchGroup {
                batch_id,
                created_at,
                count: 1,
                items: vec![entry],
            }),
        }
    }

    Ok(lists)
}

fn entry_from_columns(row: &rusqlite::Row, start: usize) -> rusqlite::Result<ListItemEntry> {
    Ok(ListItemEntry {
        id: row.get(start)?,
        first_name: row.get(start + 1)?,
        phone: row.get(start + 2)?,
        notes: row.get(start + 3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::admins::insert_admin;
    use crate::database::agents::{delete_agent, insert_agent, tests::new_agent};
    use crate::database::test_support::temp_database;
    use crate::distribution::distribute;
    use shared_types::{Agent, ContactRecord};

    fn records(count: usize) -> Vec<ContactRecord> {
        (0..count)
            .map(|i| ContactRecord::new(format!("contact-{i}"), format!("555{i:04}"), ""))
            .collect()
    }

    async fn seed_agents(conn: AsyncDbConnection, owner: Uuid, names: &[&str]) -> Vec<Agent> {
        let mut agents = Vec::new();
        for name in names {
            agents.push(insert_agent(conn.clone(), owner, &new_agent(name)).await.unwrap());
        }
        agents
    }

    #[tokio::test]
    async fn test_insert_and_summarize_batches() {
        let (_dir, db) = temp_database();
        let conn = db.async_connection.clone();
        let owner = insert_admin(conn.clone(), "a@example.com", "h").await.unwrap().id;
        let agents = seed_agents(conn.clone(), owner, &["Zed", "Amy", "Kim"]).await;

        let first = distribute(records(7), &agents, owner).unwrap();
        assert_eq!(insert_distribution(conn.clone(), &first).await.unwrap(), 7);

        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = distribute(records(2), &agents, owner).unwrap();
        assert_eq!(insert_distribution(conn.clone(), &second).await.unwrap(), 2);

        let batches = list_batches(conn, owner).await.unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].batch_id, second.batch_id);
        assert_eq!(batches[0].count, 2);
        assert_eq!(batches[0].agent_count, 2);
        assert_eq!(batches[1].batch_id, first.batch_id);
        assert_eq!(batches[1].count, 7);
        assert_eq!(batches[1].agent_count, 3);
    }

    #[tokio::test]
    async fn test_batch_detail_groups_by_agent_name() {
        let (_dir, db) = temp_database();
        let conn = db.async_connection.clone();
        let owner = insert_admin(conn.clone(), "a@example.com", "h").await.unwrap().id;
        let agents = seed_agents(conn.clone(), owner, &["Zed", "Amy", "Kim"]).await;

        let distribution = distribute(records(7), &agents, owner).unwrap();
        insert_distribution(conn.clone(), &distribution).await.unwrap();

        let detail = get_batch_detail(conn, owner, distribution.batch_id)
            .await
            .unwrap();

        let names: Vec<Option<String>> = detail
            .distribution
            .iter()
            .map(|g| g.agent_name.clone())
            .collect();
        assert_eq!(
            names,
            vec![
                Some("Amy".to_string()),
                Some("Kim".to_string()),
                Some("Zed".to_string())
            ]
        );

        // Zed was created first, so holds rows 0, 3 and 6
        let zed = &detail.distribution[2];
        assert_eq!(zed.count, 3);
        let zed_names: Vec<&str> = zed.items.iter().map(|i| i.first_name.as_str()).collect();
        assert_eq!(zed_names, vec!["contact-0", "contact-3", "contact-6"]);
        assert_eq!(zed.agent_email.as_deref(), Some("zed@example.com"));
    }

    #[tokio::test]
    async fn test_batch_detail_is_owner_scoped() {
        let (_dir, db) = temp_database();
        let conn = db.async_connection.clone();
        let owner = insert_admin(conn.clone(), "a@example.com", "h").await.unwrap().id;
        let stranger = insert_admin(conn.clone(), "b@example.com", "h").await.unwrap().id;
        let agents = seed_agents(conn.clone(), owner, &["Amy"]).await;

        let distribution = distribute(records(3), &agents, owner).unwrap();
        insert_distribution(conn.clone(), &distribution).await.unwrap();

        assert!(matches!(
            get_batch_detail(conn.clone(), stranger, distribution.batch_id).await,
            Err(DbError::NotFound)
        ));
        assert!(matches!(
            get_batch_detail(conn.clone(), owner, Uuid::new_v4()).await,
            Err(DbError::NotFound)
        ));
        assert!(list_batches(conn, stranger).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleted_agent_items_are_kept() {
        let (_dir, db) = temp_database();
        let conn = db.async_connection.clone();
        let owner = insert_admin(conn.clone(), "a@example.com", "h").await.unwrap().id;
        let agents = seed_agents(conn.clone(), owner, &["Amy", "Bea"]).await;

        let distribution = distribute(records(4), &agents, owner).unwrap();
        insert_distribution(conn.clone(), &distribution).await.unwrap();
        delete_agent(conn.clone(), agents[0].id).await.unwrap();

        let detail = get_batch_detail(conn.clone(), owner, distribution.batch_id)
            .await
            .unwrap();
        assert_eq!(detail.distribution.len(), 2);
        assert_eq!(detail.distribution[0].agent_name.as_deref(), Some("Bea"));
        assert_eq!(detail.distribution[1].agent_id, agents[0].id);
        assert!(detail.distribution[1].agent_name.is_none());

        let batches = list_batches(conn, owner).await.unwrap();
        assert_eq!(batches[0].count, 4);
    }

    #[tokio::test]
    async fn test_agent_batches_newest_first() {
        let (_dir, db) = temp_database();
        let conn = db.async_connection.clone();
        let owner = insert_admin(conn.clone(), "a@example.com", "h").await.unwrap().id;
        let agents = seed_agents(conn.clone(), owner, &["Amy", "Bea"]).await;

        let older = distribute(records(5), &agents, owner).unwrap();
        insert_distribution(conn.clone(), &older).await.unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let newer = distribute(records(1), &agents, owner).unwrap();
        insert_distribution(conn.clone(), &newer).await.unwrap();

        let amy = list_agent_batches(conn.clone(), owner, agents[0].id)
            .await
            .unwrap();
        assert_eq!(amy.len(), 2);
        assert_eq!(amy[0].batch_id, newer.batch_id);
        assert_eq!(amy[0].count, 1);
        assert_eq!(amy[1].batch_id, older.batch_id);
        let older_rows: Vec<&str> = amy[1].items.iter().map(|i| i.first_name.as_str()).collect();
        assert_eq!(older_rows, vec!["contact-0", "contact-2", "contact-4"]);

        let bea = list_agent_batches(conn, owner, agents[1].id).await.unwrap();
        assert_eq!(bea.len(), 1);
        assert_eq!(bea[0].batch_id, older.batch_id);
    }

    #[tokio::test]
    async fn test_failed_insert_leaves_no_partial_batch() {
        let (_dir, db) = temp_database();
        let conn = db.async_connection.clone();
        let owner = insert_admin(conn.clone(), "a@example.com", "h").await.unwrap().id;
        let agents = seed_agents(conn.clone(), owner, &["Amy", "Bea"]).await;

        // Unknown owner ids violate the foreign key, so the second agent's
        // share fails after the first one was already written
        let mut distribution = distribute(records(4), &agents, owner).unwrap();
        for item in &mut distribution.assignments[1].items {
            item.owner_id = Uuid::new_v4();
        }

        assert!(insert_distribution(conn.clone(), &distribution).await.is_err());
        assert!(list_batches(conn, owner).await.unwrap().is_empty());
    }
}

use shared_types::{Agent, AgentDistribution, ContactRecord};
use uuid::Uuid;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DistributionError {
    #[error("No agents available for distribution")]
    NoAgentsAvailable,
}

/// A contact row stamped with its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedRecord {
    /// Zero-based position of the row in the uploaded file
    pub row_index: usize,
    pub record: ContactRecord,
    pub assigned_agent_id: Uuid,
    pub batch_id: Uuid,
    pub owner_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentAssignment {
    pub agent_id: Uuid,
    pub agent_name: String,
    pub items: Vec<AssignedRecord>,
}

/// The full partition of one upload, in agent order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    pub batch_id: Uuid,
    pub owner_id: Uuid,
    pub assignments: Vec<AgentAssignment>,
}

impl Distribution {
    pub fn total_items(&self) -> usize {
        self.assignments.iter().map(|a| a.items.len()).sum()
    }

    /// Per-agent counts, including agents that received nothing.
    pub fn summary(&self) -> Vec<AgentDistribution> {
        self.assignments
            .iter()
            .map(|a| AgentDistribution {
                agent_id: a.agent_id,
                agent_name: a.agent_name.clone(),
                item_count: a.items.len(),
            })
            .collect()
    }

    /// All assigned records back in file order.
    pub fn records_in_file_order(&self) -> Vec<&AssignedRecord> {
        let mut all: Vec<&AssignedRecord> =
            self.assignments.iter().flat_map(|a| a.items.iter()).collect();
        all.sort_by_key(|item| item.row_index);
        all
    }
}

/// Splits `records` round-robin across `agents` under a fresh batch id.
pub fn distribute(
    records: Vec<ContactRecord>,
    agents: &[Agent],
    owner_id: Uuid,
) -> Result<Distribution, DistributionError> {
    distribute_with_batch_id(records, agents, owner_id, Uuid::new_v4())
}

/// Record `i` goes to `agents[i % agents.len()]`, so the first
/// `len % agents.len()` agents receive one record more than the rest.
pub fn distribute_with_batch_id(
    records: Vec<ContactRecord>,
    agents: &[Agent],
    owner_id: Uuid,
    batch_id: Uuid,
) -> Result<Distribution, DistributionError> {
    if agents.is_empty() {
        return Err(DistributionError::NoAgentsAvailable);
    }

    let per_agent = records.len().div_ceil(agents.len());
    let mut assignments: Vec<AgentAssignment> = agents
        .iter()
        .map(|agent| AgentAssignment {
            agent_id: agent.id,
            agent_name: agent.name.clone(),
            items: Vec::with_capacity(per_agent),
        })
        .collect();

    for (row_index, record) in records.into_iter().enumerate() {
        let assignment = &mut assignments[row_index % agents.len()];
        assignment.items.push(AssignedRecord {
            row_index,
            record,
            assigned_agent_id: assignment.agent_id,
            batch_id,
            owner_id,
        });
    }

    Ok(Distribution {
        batch_id,
        owner_id,
        assignments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agents(names: &[&str]) -> Vec<Agent> {
        names
            .iter()
            .map(|name| Agent {
                id: Uuid::new_v4(),
                name: name.to_string(),
                email: format!("{name}@example.com"),
                mobile_number: "+15550000000".to_string(),
                owner_id: Uuid::nil(),
                created_at: 0,
                updated_at: 0,
            })
            .collect()
    }

    fn records(count: usize) -> Vec<ContactRecord> {
        (0..count)
            .map(|i| ContactRecord::new(format!("contact-{i}"), format!("555{i:04}"), ""))
            .collect()
    }

    fn rows_of(assignment: &AgentAssignment) -> Vec<usize> {
        assignment.items.iter().map(|i| i.row_index).collect()
    }

    #[test]
    fn test_seven_rows_across_three_agents() {
        let team = agents(&["A", "B", "C"]);
        let owner = Uuid::new_v4();
        let result = distribute(records(7), &team, owner).unwrap();

        assert_eq!(rows_of(&result.assignments[0]), vec![0, 3, 6]);
        assert_eq!(rows_of(&result.assignments[1]), vec![1, 4]);
        assert_eq!(rows_of(&result.assignments[2]), vec![2, 5]);
        assert_eq!(result.total_items(), 7);

        for assignment in &result.assignments {
            for item in &assignment.items {
                assert_eq!(item.assigned_agent_id, assignment.agent_id);
                assert_eq!(item.batch_id, result.batch_id);
                assert_eq!(item.owner_id, owner);
            }
        }
    }

    #[test]
    fn test_counts_differ_by_at_most_one() {
        for agent_count in 1..=6 {
            let team = agents(&["a", "b", "c", "d", "e", "f"][..agent_count]);
            for total in 0..=25 {
                let result = distribute(records(total), &team, Uuid::nil()).unwrap();
                let counts: Vec<usize> =
                    result.assignments.iter().map(|a| a.items.len()).collect();

                let extra = total % agent_count;
                for (position, count) in counts.iter().enumerate() {
                    let expected = if position < extra {
                        total.div_ceil(agent_count)
                    } else {
                        total / agent_count
                    };
                    assert_eq!(*count, expected, "{total} rows over {agent_count} agents");
                }
            }
        }
    }

    #[test]
    fn test_distribution_is_deterministic() {
        let team = agents(&["A", "B", "C", "D"]);
        let owner = Uuid::new_v4();
        let batch = Uuid::new_v4();

        let first = distribute_with_batch_id(records(11), &team, owner, batch).unwrap();
        let second = distribute_with_batch_id(records(11), &team, owner, batch).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_round_trip_restores_input() {
        let input = records(13);
        let result = distribute(input.clone(), &agents(&["A", "B", "C"]), Uuid::nil()).unwrap();

        let restored: Vec<ContactRecord> = result
            .records_in_file_order()
            .into_iter()
            .map(|item| item.record.clone())
            .collect();
        assert_eq!(restored, input);
    }

    #[test]
    fn test_fresh_batch_id_per_call() {
        let team = agents(&["A"]);
        let first = distribute(records(1), &team, Uuid::nil()).unwrap();
        let second = distribute(records(1), &team, Uuid::nil()).unwrap();
        assert_ne!(first.batch_id, second.batch_id);
    }

    #[test]
    fn test_no_agents() {
        let result = distribute(records(3), &[], Uuid::nil());
        assert_eq!(result, Err(DistributionError::NoAgentsAvailable));
    }

    #[test]
    fn test_summary_lists_agents_without_items() {
        let team = agents(&["A", "B", "C"]);
        let result = distribute(records(2), &team, Uuid::nil()).unwrap();

        let counts: Vec<(String, usize)> = result
            .summary()
            .into_iter()
            .map(|d| (d.agent_name, d.item_count))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("A".to_string(), 1),
                ("B".to_string(), 1),
                ("C".to_string(), 0)
            ]
        );
    }
}

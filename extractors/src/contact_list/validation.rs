use shared_types::ContactRecord;

/// Checks every record for the required fields. Row numbers are 1-based and
/// follow file order. An empty result means the list can be distributed.
pub fn validate_records(records: &[ContactRecord]) -> Vec<String> {
    let mut errors = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let row = index + 1;

        if record.first_name.trim().is_empty() {
            errors.push(format!("Row {}: First name is required", row));
        }

        if record.phone.trim().is_empty() {
            errors.push(format!("Row {}: Phone number is required", row));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_records_without_notes() {
        let records = vec![
            ContactRecord::new("Alice", "555", ""),
            ContactRecord::new("Bob", "556", "call back"),
        ];
        assert!(validate_records(&records).is_empty());
    }

    #[test]
    fn test_missing_fields_are_reported_per_row() {
        let records = vec![
            ContactRecord::new("Alice", "555", ""),
            ContactRecord::new("", "556", ""),
            ContactRecord::new("Carol", "", "note"),
            ContactRecord::new("", "", ""),
        ];

        assert_eq!(
            validate_records(&records),
            vec![
                "Row 2: First name is required",
                "Row 3: Phone number is required",
                "Row 4: First name is required",
                "Row 4: Phone number is required",
            ]
        );
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        let records = vec![ContactRecord::new("  ", "555", "")];
        assert_eq!(validate_records(&records), vec!["Row 1: First name is required"]);
    }
}

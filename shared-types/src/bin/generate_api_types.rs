use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut types = Vec::new();

    // Admin / session types
    types.push(clean_type(AdminRole::export_to_string()?));
    types.push(clean_type(AdminProfile::export_to_string()?));
    types.push(clean_type(RegisterRequest::export_to_string()?));
    types.push(clean_type(LoginRequest::export_to_string()?));
    types.push(clean_type(AuthResponse::export_to_string()?));

    // Agent types
    types.push(clean_type(Agent::export_to_string()?));
    types.push(clean_type(CreateAgentRequest::export_to_string()?));
    types.push(clean_type(UpdateAgentRequest::export_to_string()?));

    // Contact list types
    types.push(clean_type(ContactRecord::export_to_string()?));
    types.push(clean_type(ListItemEntry::export_to_string()?));
    types.push(clean_type(AgentDistribution::export_to_string()?));
    types.push(clean_type(UploadSummary::export_to_string()?));
    types.push(clean_type(BatchSummary::export_to_string()?));
    types.push(clean_type(BatchAgentGroup::export_to_string()?));
    types.push(clean_type(BatchDetail::export_to_string()?));
    types.push(clean_type(AgentBatchGroup::export_to_string()?));
    types.push(clean_type(AgentLists::export_to_string()?));

    let output_dir = Path::new("../ui/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

/// Strips the per-type banner and import lines; every type ends up in the
/// same file so cross-references resolve without imports.
fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}

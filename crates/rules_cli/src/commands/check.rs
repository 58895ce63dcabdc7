use anyhow::{Context, Result};
use rules_parser::parse_file;
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(profile_path: &str, format: &str) -> Result<()> {
    info!("Checking validator profile: {}", profile_path);

    let path = Path::new(profile_path);
    let profile = parse_file(path)
        .with_context(|| format!("Failed to parse profile file: {}", profile_path))?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    output::print_info(&format!(
        "Profile loaded: {} ({} fields)",
        profile.name,
        profile.rules.len()
    ));
    output::print_success("Profile is valid");

    println!("\nProfile Summary:");
    println!("  Name:        {}", profile.name);
    println!(
        "  Description: {}",
        profile.description.as_deref().unwrap_or("N/A")
    );
    println!("  Table:       {}", profile.table.as_deref().unwrap_or("N/A"));
    println!("  Fields:      {}", profile.rules.len());
    println!("  Constraints: {}", profile.rules.constraint_count());
    if !profile.uniques.is_empty() {
        println!("  Uniques:     {}", profile.uniques.join(", "));
    }
    if !profile.messages.is_empty() {
        println!("  Messages:    {}", profile.messages.len());
    }

    if !profile.rules.is_empty() {
        println!("\nRules:");
        for field in profile.rules.fields() {
            let piped = profile.rules.to_piped(field).unwrap_or_default();
            println!("  {:<16} {}", field, piped);
        }
    }

    if !profile.operations.is_empty() {
        println!("\nOperations:");
        for (name, op) in &profile.operations {
            let mut parts = Vec::new();
            if let Some(rules) = &op.rules {
                parts.push(format!("{} fields", rules.len()));
            }
            if let Some(uniques) = &op.uniques {
                parts.push(format!("uniques: {}", uniques.join(", ")));
            }
            println!("  {:<16} {}", name.as_str(), parts.join("; "));
        }
    }

    Ok(())
}

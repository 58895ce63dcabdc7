use anyhow::Result;
use colored::*;
use rules_core::ValidationOutcome;
use serde_json::json;

pub fn print_validation_report(outcome: &ValidationOutcome, format: &str) -> Result<()> {
    match format {
        "json" => print_json_report(outcome),
        _ => {
            print_text_report(outcome);
            Ok(())
        }
    }
}

fn print_text_report(outcome: &ValidationOutcome) {
    println!("\n{}", "═".repeat(60));
    println!("{}", "  VALIDATION REPORT".bold());
    println!("{}", "═".repeat(60));

    if outcome.passes() {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Validation PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Validation FAILED".red().bold()
        );
    }

    let errors = outcome.errors();
    if !errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for (field, messages) in errors.iter() {
            println!("  {}:", field.bold());
            for message in messages {
                println!("    - {}", message.red());
            }
        }
    }

    println!("\n{}", "Summary:".bold());
    println!("  Fields with errors: {}", errors.fields().count());
    println!("  Total errors:       {}", errors.len());
    println!("{}", "═".repeat(60));
}

fn print_json_report(outcome: &ValidationOutcome) -> Result<()> {
    let errors = outcome.errors();
    let output = json!({
        "passed": outcome.passed,
        "errors": errors,
        "summary": {
            "field_count": errors.fields().count(),
            "error_count": errors.len(),
        }
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

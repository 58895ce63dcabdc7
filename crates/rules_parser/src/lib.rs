//! Parser for validator profiles (YAML/TOML formats).
//!
//! This module parses validator profiles from YAML and TOML files into the
//! strongly-typed `ValidatorProfile` structure. Every parsed profile is checked
//! for configuration mistakes before it is returned.
//!
//! # Example
//!
//! ```rust
//! use rules_parser::parse_yaml;
//!
//! let yaml = r#"
//! name: users
//! table: users
//! rules:
//!   email: required|email
//!   username: [required, alpha_num]
//! uniques:
//!   - email
//! "#;
//!
//! let profile = parse_yaml(yaml).expect("Failed to parse profile");
//! assert_eq!(profile.name, "users");
//! assert_eq!(profile.rules.len(), 2);
//! ```

use rules_core::ValidatorProfile;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during profile parsing.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// The profile deserialized but is not usable
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported profile file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

fn checked(profile: ValidatorProfile) -> Result<ValidatorProfile> {
    let problems = profile.check_definition();
    if !problems.is_empty() {
        return Err(ParserError::InvalidProfile(problems.join("; ")));
    }

    debug!(
        profile = %profile.name,
        fields = profile.rules.len(),
        operations = profile.operations.len(),
        "Parsed validator profile"
    );
    Ok(profile)
}

/// Parse a profile from a YAML string.
///
/// # Example
///
/// ```rust
/// use rules_parser::parse_yaml;
///
/// let yaml = r#"
/// name: posts
/// rules:
///   title: required|max:120
/// "#;
///
/// let profile = parse_yaml(yaml).unwrap();
/// assert_eq!(profile.name, "posts");
/// ```
pub fn parse_yaml(content: &str) -> Result<ValidatorProfile> {
    let profile: ValidatorProfile = serde_yaml_ng::from_str(content)?;
    checked(profile)
}

/// Parse a profile from a TOML string.
///
/// # Example
///
/// ```rust
/// use rules_parser::parse_toml;
///
/// let toml = r#"
/// name = "posts"
///
/// [rules]
/// title = "required|max:120"
/// "#;
///
/// let profile = parse_toml(toml).unwrap();
/// assert_eq!(profile.name, "posts");
/// ```
pub fn parse_toml(content: &str) -> Result<ValidatorProfile> {
    let profile: ValidatorProfile =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    checked(profile)
}

/// Detect the profile format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `ProfileFormat::Yaml`
/// * `.toml` → `ProfileFormat::Toml`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<ProfileFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(ProfileFormat::Yaml),
        "toml" => Ok(ProfileFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a profile from a file with automatic format detection.
///
/// # Example
///
/// ```no_run
/// use rules_parser::parse_file;
/// use std::path::Path;
///
/// let profile = parse_file(Path::new("profiles/users.yml")).unwrap();
/// println!("Loaded profile: {}", profile.name);
/// ```
pub fn parse_file(path: &Path) -> Result<ValidatorProfile> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        ProfileFormat::Yaml => parse_yaml(&content),
        ProfileFormat::Toml => parse_toml(&content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rules_core::{Constraint, OperationKey, UniqueRule};
    use std::io::Write;

    #[test]
    fn test_parse_valid_yaml_minimal() {
        let yaml = "name: empty\n";

        let profile = parse_yaml(yaml).expect("Failed to parse valid YAML");

        assert_eq!(profile.name, "empty");
        assert_eq!(profile.description, None);
        assert_eq!(profile.table, None);
        assert!(profile.rules.is_empty());
        assert!(profile.uniques.is_empty());
        assert!(profile.operations.is_empty());
    }

    #[test]
    fn test_parse_yaml_with_operations() {
        let yaml = r#"
name: users
description: Account sign-up and profile edits
table: users
rules:
  email: required|email
  username:
    - required
    - "regex:/^[a-z|_]+$/"
uniques:
  - email
  - username
messages:
  email.unique: That address is already registered.
  required: ":attribute is mandatory"
operations:
  update_profile:
    rules:
      display_name: required|string|max:40
    uniques:
      - username
  rename:
    rules:
      username: required|alpha_num
"#;

        let profile = parse_yaml(yaml).expect("Failed to parse YAML with operations");

        assert_eq!(profile.table.as_deref(), Some("users"));
        assert_eq!(profile.uniques, vec!["email", "username"]);
        assert_eq!(
            profile.rules.get("username"),
            Some(&[Constraint::Required, Constraint::Regex("^[a-z|_]+$".to_string())][..])
        );
        assert_eq!(
            profile.messages.lookup("email", "unique"),
            Some("That address is already registered.")
        );

        let update = OperationKey::new("updateProfile");
        assert!(profile.has_operation(&update));
        assert!(profile.rules_for(&update).contains_field("display_name"));
        assert_eq!(profile.uniques_for(&update), ["username".to_string()]);

        let rename = OperationKey::new("rename");
        assert_eq!(
            profile.uniques_for(&rename),
            ["email".to_string(), "username".to_string()]
        );
    }

    #[test]
    fn test_parse_yaml_with_explicit_unique_rule() {
        let yaml = r#"
name: teams
rules:
  slug: required|unique:teams,slug
"#;

        let profile = parse_yaml(yaml).unwrap();
        assert_eq!(
            profile.rules.get("slug"),
            Some(
                &[
                    Constraint::Required,
                    Constraint::Unique(UniqueRule::new("teams").with_column("slug")),
                ][..]
            )
        );
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let invalid_yaml = r#"
name: users
rules:
  email: [required
"#;

        let result = parse_yaml(invalid_yaml);
        assert!(matches!(result.unwrap_err(), ParserError::YamlError(_)));
    }

    #[test]
    fn test_parse_yaml_unknown_rule() {
        let yaml = r#"
name: users
rules:
  email: required|shiny
"#;

        let err = parse_yaml(yaml).unwrap_err();
        assert!(matches!(err, ParserError::YamlError(_)));
        assert!(err.to_string().contains("field 'email'"));
    }

    #[test]
    fn test_parse_yaml_missing_name() {
        let yaml = r#"
rules:
  email: required
"#;

        assert!(parse_yaml(yaml).is_err());
    }

    #[test]
    fn test_uniques_without_table_rejected() {
        let yaml = r#"
name: users
rules:
  email: required
uniques: [email]
"#;

        let err = parse_yaml(yaml).unwrap_err();
        assert!(matches!(err, ParserError::InvalidProfile(_)));
        assert_eq!(
            err.to_string(),
            "Invalid profile: unique fields are configured but no table is set"
        );
    }

    #[test]
    fn test_operation_uniques_without_table_rejected() {
        let yaml = r#"
name: users
operations:
  update:
    uniques: [email]
"#;

        assert!(matches!(
            parse_yaml(yaml).unwrap_err(),
            ParserError::InvalidProfile(_)
        ));
    }

    #[test]
    fn test_parse_valid_toml() {
        let toml = r#"
name = "users"
table = "users"
uniques = ["email"]

[rules]
email = "required|email"
age = ["integer", "between:18,120"]

[messages]
"age.between" = "Age must be between :min and :max."

[operations.update.rules]
nickname = "nullable|alpha"
"#;

        let profile = parse_toml(toml).expect("Failed to parse valid TOML");

        assert_eq!(profile.name, "users");
        assert_eq!(profile.rules.len(), 2);
        assert_eq!(
            profile.rules.to_piped("age").as_deref(),
            Some("integer|between:18,120")
        );
        assert!(
            profile
                .rules_for(&OperationKey::new("update"))
                .contains_field("nickname")
        );
        assert_eq!(profile.messages.len(), 1);
    }

    #[test]
    fn test_parse_invalid_toml() {
        let invalid_toml = r#"
name = "users"
[[[invalid syntax
"#;

        let result = parse_toml(invalid_toml);
        assert!(matches!(result.unwrap_err(), ParserError::TomlError(_)));
    }

    #[test]
    fn test_detect_format_yaml() {
        assert_eq!(
            detect_format(Path::new("profile.yaml")).unwrap(),
            ProfileFormat::Yaml
        );
        assert_eq!(
            detect_format(Path::new("profile.YML")).unwrap(),
            ProfileFormat::Yaml
        );
    }

    #[test]
    fn test_detect_format_toml() {
        assert_eq!(
            detect_format(Path::new("profile.toml")).unwrap(),
            ProfileFormat::Toml
        );
    }

    #[test]
    fn test_detect_format_unsupported() {
        let result = detect_format(Path::new("profile.json"));
        assert!(matches!(
            result.unwrap_err(),
            ParserError::UnsupportedFormat(_)
        ));
    }

    #[test]
    fn test_detect_format_no_extension() {
        let result = detect_format(Path::new("profile"));
        assert!(matches!(result.unwrap_err(), ParserError::InvalidExtension));
    }

    #[test]
    fn test_parse_file_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "name: users\nrules:\n  email: required|email").unwrap();

        let profile = parse_file(file.path()).expect("Failed to parse profile file");
        assert_eq!(profile.name, "users");
        assert!(profile.rules.contains_field("email"));
    }

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file(Path::new("does/not/exist.yml"));
        assert!(matches!(result.unwrap_err(), ParserError::IoError(_)));
    }
}

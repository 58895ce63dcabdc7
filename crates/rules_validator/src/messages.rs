//! Error message formatting.
//!
//! Each failing constraint produces a [`Failure`] describing the rule and its
//! parameters. [`render`] turns it into a sentence, using a custom template
//! from [`MessageOverrides`] when one exists and the built-in English text
//! otherwise.

use rules_core::MessageOverrides;

/// How a size rule measured the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeKind {
    /// Numeric value
    Numeric,
    /// String length in characters
    String,
    /// Number of list or map entries
    Items,
}

/// A failed constraint, ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    /// Rule name as written in the pipe grammar
    pub rule: &'static str,
    /// Measurement used by size rules
    pub size: Option<SizeKind>,
    /// Placeholder values (`min`, `max`, `values`, `other`, `table`)
    pub params: Vec<(&'static str, String)>,
}

impl Failure {
    /// Creates a failure for a rule without parameters.
    pub fn new(rule: &'static str) -> Self {
        Self {
            rule,
            size: None,
            params: Vec::new(),
        }
    }

    /// Sets the size measurement.
    pub fn sized(mut self, size: SizeKind) -> Self {
        self.size = Some(size);
        self
    }

    /// Adds a placeholder value.
    pub fn param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.params.push((name, value.into()));
        self
    }
}

fn default_template(failure: &Failure) -> &'static str {
    match (failure.rule, failure.size) {
        ("required", _) => "The :attribute field is required.",
        ("string", _) => "The :attribute must be a string.",
        ("integer", _) => "The :attribute must be an integer.",
        ("numeric", _) => "The :attribute must be a number.",
        ("boolean", _) => "The :attribute field must be true or false.",
        ("email", _) => "The :attribute must be a valid email address.",
        ("alpha", _) => "The :attribute may only contain letters.",
        ("alpha_num", _) => "The :attribute may only contain letters and numbers.",
        ("date", _) => "The :attribute is not a valid date.",
        ("min", Some(SizeKind::Numeric)) => "The :attribute must be at least :min.",
        ("min", Some(SizeKind::Items)) => "The :attribute must have at least :min items.",
        ("min", _) => "The :attribute must be at least :min characters.",
        ("max", Some(SizeKind::Numeric)) => "The :attribute may not be greater than :max.",
        ("max", Some(SizeKind::Items)) => "The :attribute may not have more than :max items.",
        ("max", _) => "The :attribute may not be greater than :max characters.",
        ("between", Some(SizeKind::Numeric)) => "The :attribute must be between :min and :max.",
        ("between", Some(SizeKind::Items)) => {
            "The :attribute must have between :min and :max items."
        }
        ("between", _) => "The :attribute must be between :min and :max characters.",
        ("in", _) | ("not_in", _) => "The selected :attribute is invalid.",
        ("confirmed", _) => "The :attribute confirmation does not match.",
        ("unique", _) => "The :attribute has already been taken.",
        _ => "The :attribute format is invalid.",
    }
}

/// Human-readable form of a field name.
pub fn attribute_name(field: &str) -> String {
    field.replace('_', " ")
}

/// Renders the message for a failed constraint on `field`.
pub fn render(field: &str, failure: &Failure, overrides: &MessageOverrides) -> String {
    let template = overrides
        .lookup(field, failure.rule)
        .unwrap_or_else(|| default_template(failure));

    let mut message = template.replace(":attribute", &attribute_name(field));
    for (name, value) in &failure.params {
        message = message.replace(&format!(":{}", name), value);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_required_message() {
        let msg = render("email", &Failure::new("required"), &MessageOverrides::new());
        assert_eq!(msg, "The email field is required.");
    }

    #[test]
    fn test_attribute_underscores_replaced() {
        let msg = render("first_name", &Failure::new("required"), &MessageOverrides::new());
        assert_eq!(msg, "The first name field is required.");
    }

    #[test]
    fn test_size_messages_follow_kind() {
        let overrides = MessageOverrides::new();
        let numeric = Failure::new("min").sized(SizeKind::Numeric).param("min", "18");
        let string = Failure::new("min").sized(SizeKind::String).param("min", "3");
        let items = Failure::new("max").sized(SizeKind::Items).param("max", "2");

        assert_eq!(render("age", &numeric, &overrides), "The age must be at least 18.");
        assert_eq!(
            render("name", &string, &overrides),
            "The name must be at least 3 characters."
        );
        assert_eq!(
            render("tags", &items, &overrides),
            "The tags may not have more than 2 items."
        );
    }

    #[test]
    fn test_override_with_placeholders() {
        let overrides = MessageOverrides::new()
            .with("between", ":attribute out of :min-:max")
            .with("email.unique", "That address is in use.");

        let between = Failure::new("between")
            .sized(SizeKind::Numeric)
            .param("min", "1")
            .param("max", "5");
        assert_eq!(render("rating", &between, &overrides), "rating out of 1-5");
        assert_eq!(
            render("email", &Failure::new("unique"), &overrides),
            "That address is in use."
        );
        assert_eq!(
            render("username", &Failure::new("unique"), &overrides),
            "The username has already been taken."
        );
    }
}

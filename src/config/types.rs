use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// A single invalid setting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "placeholderTags[0]")
    pub field_path: String,
    /// Human readable description of the problem.
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more settings failed validation.
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    /// The configuration file could not be read.
    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// The configuration file is not valid JSON for `SiteSettings`.
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Numbered list of validation errors, one per line.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Settings read from `.site-i18n.json`; every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    /// Directory holding one document per language, relative to the site root.
    pub resource_dir: String,
    /// File name inside `resource_dir`; `{lang}` is replaced by the language code.
    pub file_pattern: String,

    /// Language used when nothing has been persisted yet.
    pub default_language: String,
    /// Key under which the active language is persisted.
    pub storage_key: String,

    /// Separator between segments of a translation key.
    pub key_separator: String,

    /// Attribute holding the translation key of an element.
    pub key_attribute: String,
    /// Attribute holding the language code of a switcher control.
    pub language_attribute: String,
    /// Class shared by all language switcher controls.
    pub switcher_class: String,
    /// Class marking the switcher control of the active language.
    pub active_class: String,

    /// Tags that receive the translation as placeholder instead of content.
    pub placeholder_tags: Vec<String>,
}

impl SiteSettings {
    /// # Errors
    /// - Required field is empty
    /// - File pattern without `{lang}`
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        if self.file_pattern.is_empty() {
            errors.push(ValidationError::new(
                "filePattern",
                "The pattern cannot be empty. Example: \"{lang}.json\"",
            ));
        } else if !self.file_pattern.contains("{lang}") {
            errors.push(ValidationError::new(
                "filePattern",
                format!("The pattern '{}' must contain the {{lang}} placeholder", self.file_pattern),
            ));
        }

        let required = [
            ("defaultLanguage", &self.default_language),
            ("storageKey", &self.storage_key),
            ("keyAttribute", &self.key_attribute),
            ("languageAttribute", &self.language_attribute),
            ("switcherClass", &self.switcher_class),
            ("activeClass", &self.active_class),
        ];
        for (field, value) in required {
            if value.is_empty() {
                errors.push(ValidationError::new(field, "This value cannot be empty"));
            }
        }

        for (index, tag) in self.placeholder_tags.iter().enumerate() {
            if tag.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("placeholderTags[{index}]"),
                    "Tag names cannot be empty",
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Whether elements with `tag` receive translations as placeholder text.
    #[must_use]
    pub fn is_placeholder_tag(&self, tag: &str) -> bool {
        self.placeholder_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            resource_dir: "i18n".to_string(),
            file_pattern: "{lang}.json".to_string(),
            default_language: "en".to_string(),
            storage_key: "language".to_string(),
            key_separator: ".".to_string(),
            key_attribute: "data-i18n".to_string(),
            language_attribute: "data-lang".to_string(),
            switcher_class: "lang-btn".to_string(),
            active_class: "active".to_string(),
            placeholder_tags: vec!["input".to_string(), "textarea".to_string()],
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_settings() {
        let settings = SiteSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"defaultLanguage": "fr", "resourceDir": "assets/lang"}"#;

        let settings: SiteSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.default_language, eq("fr"));
        assert_that!(settings.resource_dir, eq("assets/lang"));
        assert_that!(settings.key_separator, eq("."));
        assert_that!(settings.placeholder_tags, len(eq(2)));
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let settings: SiteSettings = serde_json::from_str("{}").unwrap();

        assert_eq!(settings, SiteSettings::default());
        assert_that!(settings.key_attribute, eq("data-i18n"));
        assert_that!(settings.language_attribute, eq("data-lang"));
        assert_that!(settings.placeholder_tags, elements_are![eq("input"), eq("textarea")]);
    }

    #[rstest]
    fn validate_invalid_key_separator_empty() {
        let settings = SiteSettings { key_separator: String::new(), ..SiteSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("keySeparator")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    #[rstest]
    fn validate_file_pattern_without_placeholder() {
        let settings =
            SiteSettings { file_pattern: "en.json".to_string(), ..SiteSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("filePattern")),
                field!(ValidationError.message, contains_substring("{lang}"))
            ]])
        );
    }

    #[rstest]
    #[case(SiteSettings { default_language: String::new(), ..SiteSettings::default() }, "defaultLanguage")]
    #[case(SiteSettings { storage_key: String::new(), ..SiteSettings::default() }, "storageKey")]
    #[case(SiteSettings { switcher_class: String::new(), ..SiteSettings::default() }, "switcherClass")]
    #[case(SiteSettings { active_class: String::new(), ..SiteSettings::default() }, "activeClass")]
    fn validate_required_value_empty(#[case] settings: SiteSettings, #[case] field_path: &str) {
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![field!(ValidationError.field_path, eq(field_path))])
        );
    }

    #[rstest]
    fn validate_placeholder_tag_empty() {
        let settings = SiteSettings {
            placeholder_tags: vec!["input".to_string(), " ".to_string()],
            ..SiteSettings::default()
        };

        assert_that!(
            settings.validate(),
            err(elements_are![field!(ValidationError.field_path, eq("placeholderTags[1]"))])
        );
    }

    #[rstest]
    #[case("input", true)]
    #[case("INPUT", true)]
    #[case("TextArea", true)]
    #[case("a", false)]
    fn placeholder_tag_match_ignores_case(#[case] tag: &str, #[case] expected: bool) {
        assert_eq!(SiteSettings::default().is_placeholder_tag(tag), expected);
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = SiteSettings {
            key_separator: String::new(),
            storage_key: String::new(),
            ..SiteSettings::default()
        };

        let errors = settings.validate().unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. keySeparator"));
        assert_that!(error_message, contains_substring("2. storageKey"));
    }
}

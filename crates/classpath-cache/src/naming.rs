//! Identifier to relative source path mapping.
//!
//! `Mage_Core_Model_App` becomes `Mage/Core/Model/App.php`: each
//! delimiter-separated segment gets its first character upper-cased, segments
//! are joined with the platform directory separator and the extension is
//! appended. Empty segments are kept, so `Foo__Bar` maps to `Foo//Bar.php`.

use std::path::MAIN_SEPARATOR;

use crate::types::{DEFAULT_DELIMITER, DEFAULT_EXTENSION};

/// Converts identifiers into candidate relative paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMapper {
    delimiter: char,
    extension: String,
}

impl Default for NameMapper {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER, DEFAULT_EXTENSION)
    }
}

impl NameMapper {
    pub fn new(delimiter: char, extension: impl Into<String>) -> Self {
        Self {
            delimiter,
            extension: extension.into(),
        }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Map an identifier to its relative file path.
    pub fn to_relative_path(&self, identifier: &str) -> String {
        let mut path = String::with_capacity(identifier.len() + self.extension.len() + 1);
        for (idx, segment) in identifier.split(self.delimiter).enumerate() {
            if idx > 0 {
                path.push(MAIN_SEPARATOR);
            }
            push_capitalized(&mut path, segment);
        }
        path.push('.');
        path.push_str(&self.extension);
        path
    }
}

// ASCII-only; other first characters are left as they are.
fn push_capitalized(out: &mut String, segment: &str) {
    let mut chars = segment.chars();
    if let Some(first) = chars.next() {
        out.push(first.to_ascii_uppercase());
        out.push_str(chars.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sep(parts: &[&str]) -> String {
        parts.join(&MAIN_SEPARATOR.to_string())
    }

    #[test]
    fn test_segments_capitalized_and_joined() {
        let mapper = NameMapper::default();
        assert_eq!(
            mapper.to_relative_path("Foo_Bar_Baz"),
            format!("{}.php", sep(&["Foo", "Bar", "Baz"]))
        );
        assert_eq!(
            mapper.to_relative_path("mage_core_model_app"),
            format!("{}.php", sep(&["Mage", "Core", "Model", "App"]))
        );
    }

    #[test]
    fn test_rest_of_segment_untouched() {
        let mapper = NameMapper::default();
        assert_eq!(
            mapper.to_relative_path("aoe_ClassPathCache_helper_DATA"),
            format!("{}.php", sep(&["Aoe", "ClassPathCache", "Helper", "DATA"]))
        );
    }

    #[test]
    fn test_single_segment() {
        let mapper = NameMapper::default();
        assert_eq!(mapper.to_relative_path("mage"), "Mage.php");
    }

    #[test]
    fn test_digit_and_non_ascii_first_chars_unchanged() {
        let mapper = NameMapper::default();
        assert_eq!(
            mapper.to_relative_path("Zend_3d"),
            format!("{}.php", sep(&["Zend", "3d"]))
        );
        assert_eq!(
            mapper.to_relative_path("Foo_élan"),
            format!("{}.php", sep(&["Foo", "élan"]))
        );
    }

    #[test]
    fn test_empty_segments_preserved() {
        let mapper = NameMapper::default();
        assert_eq!(mapper.to_relative_path(""), ".php");
        assert_eq!(
            mapper.to_relative_path("Foo__Bar"),
            format!("{}.php", sep(&["Foo", "", "Bar"]))
        );
        assert_eq!(
            mapper.to_relative_path("_Foo_"),
            format!("{}.php", sep(&["", "Foo", ""]))
        );
    }

    #[test]
    fn test_custom_delimiter_and_extension() {
        let mapper = NameMapper::new('.', "inc");
        assert_eq!(
            mapper.to_relative_path("acme.widget"),
            format!("{}.inc", sep(&["Acme", "Widget"]))
        );
    }
}

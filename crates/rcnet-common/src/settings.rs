//! Loosely-typed settings bags for the configuration boundary.
//!
//! Callers (the CLI, or a configuration agent frontend) hand interface
//! settings over as ordered field/value pairs; the typed structs in the
//! manager crates are built from these with explicit validation.

/// Key-value tuple representing a field and its value.
pub type FieldValue = (String, String);

/// Collection of field-value pairs for one settings bag.
pub type FieldValues = Vec<FieldValue>;

/// Helper trait for working with field-value collections.
pub trait FieldValuesExt {
    /// Gets the value for a field, if present.
    fn get_field(&self, field: &str) -> Option<&str>;

    /// Gets the value for a field, returning the default if not present.
    fn get_field_or<'a>(&'a self, field: &str, default: &'a str) -> &'a str;

    /// Checks if a field exists.
    fn has_field(&self, field: &str) -> bool;
}

impl FieldValuesExt for FieldValues {
    fn get_field(&self, field: &str) -> Option<&str> {
        self.iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v.as_str())
    }

    fn get_field_or<'a>(&'a self, field: &str, default: &'a str) -> &'a str {
        self.get_field(field).unwrap_or(default)
    }

    fn has_field(&self, field: &str) -> bool {
        self.iter().any(|(f, _)| f == field)
    }
}

/// Builds a FieldValues collection from key-value pairs.
#[macro_export]
macro_rules! field_values {
    ($($field:expr => $value:expr),* $(,)?) => {
        vec![
            $(($field.to_string(), $value.to_string()),)*
        ]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_values_ext() {
        let fvs: FieldValues = vec![
            ("ipaddr".to_string(), "10.0.0.2".to_string()),
            ("netmask".to_string(), "255.255.255.0".to_string()),
        ];

        assert_eq!(fvs.get_field("ipaddr"), Some("10.0.0.2"));
        assert_eq!(fvs.get_field("nonexistent"), None);
        assert_eq!(fvs.get_field_or("netmask", "255.255.255.255"), "255.255.255.0");
        assert_eq!(fvs.get_field_or("nonexistent", "default"), "default");
        assert!(fvs.has_field("ipaddr"));
        assert!(!fvs.has_field("gateway"));
    }

    #[test]
    fn test_field_values_macro() {
        let fvs = field_values! {
            "ipaddr" => "10.0.0.1",
            "netmask" => "255.255.255.252",
        };

        assert_eq!(fvs.len(), 2);
        assert_eq!(fvs.get_field("ipaddr"), Some("10.0.0.1"));
    }
}

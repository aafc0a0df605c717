//! Property descriptors and their polymorphism modifiers.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer};
use withgen_common::keywords;

bitflags! {
    /// Polymorphism modifiers carried by a property declaration.
    ///
    /// `ABSTRACT` and `VIRTUAL` never appear together on valid input;
    /// `ABSTRACT | OVERRIDE` is the C# `abstract override` form and is
    /// treated as abstract for storage purposes.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PropertyModifiers: u8 {
        const ABSTRACT = 1;
        const VIRTUAL = 1 << 1;
        const OVERRIDE = 1 << 2;
    }
}

const MODIFIER_NAMES: &[&str] = &["abstract", "virtual", "override"];

fn modifiers_from_list<'de, D>(deserializer: D) -> Result<PropertyModifiers, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<String> = Vec::deserialize(deserializer)?;
    let mut flags = PropertyModifiers::empty();
    for item in &raw {
        match item.as_str() {
            "abstract" => flags |= PropertyModifiers::ABSTRACT,
            "virtual" => flags |= PropertyModifiers::VIRTUAL,
            "override" => flags |= PropertyModifiers::OVERRIDE,
            other => {
                return Err(serde::de::Error::unknown_variant(other, MODIFIER_NAMES));
            }
        }
    }
    Ok(flags)
}

/// A single get-only property on a type declaration.
///
/// The type reference is opaque text copied verbatim into generated code;
/// the generator never interprets it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: String,
    #[serde(default, deserialize_with = "modifiers_from_list")]
    pub modifiers: PropertyModifiers,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        PropertyDescriptor {
            name: name.into(),
            type_ref: type_ref.into(),
            modifiers: PropertyModifiers::empty(),
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: PropertyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(PropertyModifiers::ABSTRACT)
    }

    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.modifiers.contains(PropertyModifiers::VIRTUAL)
    }

    #[must_use]
    pub fn is_override(&self) -> bool {
        self.modifiers.contains(PropertyModifiers::OVERRIDE)
    }

    /// Whether the declaration participates in virtual dispatch.
    #[must_use]
    pub fn is_polymorphic(&self) -> bool {
        !self.modifiers.is_empty()
    }

    /// Constructor parameter name for this property.
    ///
    /// First letter lowered, then `@`-escaped when the result collides with
    /// a reserved word (`Object` becomes `@object`).
    #[must_use]
    pub fn parameter_name(&self) -> String {
        keywords::escape_identifier(&lower_first(&self.name))
    }
}

/// Lower the first character of `name`, leaving the rest untouched.
#[must_use]
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_name_lowers_first_letter() {
        let prop = PropertyDescriptor::new("NormalNumber", "int");
        assert_eq!(prop.parameter_name(), "normalNumber");
    }

    #[test]
    fn test_parameter_name_escapes_reserved_words() {
        let prop = PropertyDescriptor::new("Object", "object");
        assert_eq!(prop.parameter_name(), "@object");

        let prop = PropertyDescriptor::new("Event", "string");
        assert_eq!(prop.parameter_name(), "@event");
    }

    #[test]
    fn test_modifier_queries() {
        let prop = PropertyDescriptor::new("X", "int").with_modifiers(PropertyModifiers::ABSTRACT);
        assert!(prop.is_abstract());
        assert!(!prop.is_virtual());
        assert!(prop.is_polymorphic());

        let plain = PropertyDescriptor::new("Y", "int");
        assert!(!plain.is_polymorphic());
    }

    #[test]
    fn test_deserialize_with_modifiers() {
        let prop: PropertyDescriptor = serde_json::from_str(
            r#"{ "name": "Count", "type": "int", "modifiers": ["virtual"] }"#,
        )
        .unwrap();
        assert_eq!(prop.name, "Count");
        assert_eq!(prop.type_ref, "int");
        assert!(prop.is_virtual());
    }

    #[test]
    fn test_deserialize_defaults_to_no_modifiers() {
        let prop: PropertyDescriptor =
            serde_json::from_str(r#"{ "name": "Text", "type": "string" }"#).unwrap();
        assert!(prop.modifiers.is_empty());
    }

    #[test]
    fn test_deserialize_rejects_unknown_modifier() {
        let result: Result<PropertyDescriptor, _> = serde_json::from_str(
            r#"{ "name": "Text", "type": "string", "modifiers": ["static"] }"#,
        );
        assert!(result.is_err());
    }
}

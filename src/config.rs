//! Configuration for the rendering engine.
//!
//! [`RenderConfig`] controls which parts of the model are written and how numbers are spelled.
//! Hosts usually keep their settings as a key/value map; [`RenderConfig::from_map`] parses that
//! form and [`RenderConfig::validate`] rejects combinations that cannot render anything.

use std::{collections::HashMap, str::FromStr};

use strum::{Display, EnumIter, EnumString};

use crate::{model::Visibility, Error, Result};

/// Textual base of integer literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
pub enum NumberFormat {
    /// Decimal for small or round magnitudes, hexadecimal otherwise
    #[default]
    Auto,
    /// Always decimal
    Decimal,
    /// Always hexadecimal
    Hexadecimal,
}

/// Six independent visibility gates.
///
/// Every declaration resolves its declared visibility to exactly one gate; compiler-controlled
/// members use the private gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisibilityConfiguration {
    /// `public`
    pub public: bool,
    /// `private`
    pub private: bool,
    /// `protected`
    pub family: bool,
    /// `internal`
    pub assembly: bool,
    /// `private protected`
    pub family_and_assembly: bool,
    /// `protected internal`
    pub family_or_assembly: bool,
}

impl Default for VisibilityConfiguration {
    fn default() -> Self {
        Self::all()
    }
}

impl VisibilityConfiguration {
    /// Every gate open
    #[must_use]
    pub fn all() -> Self {
        Self {
            public: true,
            private: true,
            family: true,
            assembly: true,
            family_and_assembly: true,
            family_or_assembly: true,
        }
    }

    /// Every gate closed
    #[must_use]
    pub fn none() -> Self {
        Self {
            public: false,
            private: false,
            family: false,
            assembly: false,
            family_and_assembly: false,
            family_or_assembly: false,
        }
    }

    /// Only the public gate open
    #[must_use]
    pub fn public_only() -> Self {
        Self {
            public: true,
            ..Self::none()
        }
    }

    /// Public and protected surface, what a derived type in another assembly can see
    #[must_use]
    pub fn api_surface() -> Self {
        Self {
            public: true,
            family: true,
            family_or_assembly: true,
            ..Self::none()
        }
    }

    /// The gate `visibility` resolves to
    #[must_use]
    pub fn allows(&self, visibility: Visibility) -> bool {
        match visibility {
            Visibility::Public => self.public,
            Visibility::Private | Visibility::CompilerControlled => self.private,
            Visibility::Family => self.family,
            Visibility::Assembly => self.assembly,
            Visibility::FamilyAndAssembly => self.family_and_assembly,
            Visibility::FamilyOrAssembly => self.family_or_assembly,
        }
    }

    /// Returns true if at least one gate is open
    #[must_use]
    pub fn any_enabled(&self) -> bool {
        self.public
            || self.private
            || self.family
            || self.assembly
            || self.family_and_assembly
            || self.family_or_assembly
    }

    /// Returns true if every gate open in `self` is also open in `other`
    #[must_use]
    pub fn is_subset_of(&self, other: &VisibilityConfiguration) -> bool {
        (!self.public || other.public)
            && (!self.private || other.private)
            && (!self.family || other.family)
            && (!self.assembly || other.assembly)
            && (!self.family_and_assembly || other.family_and_assembly)
            && (!self.family_or_assembly || other.family_or_assembly)
    }

    fn gate_mut(&mut self, visibility: Visibility) -> &mut bool {
        match visibility {
            Visibility::Public => &mut self.public,
            Visibility::Private | Visibility::CompilerControlled => &mut self.private,
            Visibility::Family => &mut self.family,
            Visibility::Assembly => &mut self.assembly,
            Visibility::FamilyAndAssembly => &mut self.family_and_assembly,
            Visibility::FamilyOrAssembly => &mut self.family_or_assembly,
        }
    }
}

/// Configuration of one renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Write custom attributes above declarations (default: true).
    pub show_custom_attributes: bool,

    /// Write member lists of type declarations (default: true).
    pub show_type_declaration_body: bool,

    /// Write the types of a namespace inside its block (default: true).
    pub show_namespace_body: bool,

    /// Textual base of integer literals (default: [`NumberFormat::Auto`]).
    pub number_format: NumberFormat,

    /// Which declarations are written.
    pub visibility: VisibilityConfiguration,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            show_custom_attributes: true,
            show_type_declaration_body: true,
            show_namespace_body: true,
            number_format: NumberFormat::Auto,
            visibility: VisibilityConfiguration::all(),
        }
    }
}

impl RenderConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether custom attributes are written.
    #[must_use]
    pub fn with_custom_attributes(mut self, show: bool) -> Self {
        self.show_custom_attributes = show;
        self
    }

    /// Sets whether type bodies are written.
    #[must_use]
    pub fn with_type_declaration_body(mut self, show: bool) -> Self {
        self.show_type_declaration_body = show;
        self
    }

    /// Sets whether namespace bodies are written.
    #[must_use]
    pub fn with_namespace_body(mut self, show: bool) -> Self {
        self.show_namespace_body = show;
        self
    }

    /// Sets the integer literal base.
    #[must_use]
    pub fn with_number_format(mut self, format: NumberFormat) -> Self {
        self.number_format = format;
        self
    }

    /// Sets the visibility gates.
    #[must_use]
    pub fn with_visibility(mut self, visibility: VisibilityConfiguration) -> Self {
        self.visibility = visibility;
        self
    }

    /// Parse the key/value form hosts store settings in.
    ///
    /// Recognized keys are `ShowCustomAttributes`, `ShowTypeDeclarationBody`,
    /// `ShowNamespaceBody`, `NumberFormat` and `Visibility.<Gate>` where the gate is one of
    /// `Public`, `Private`, `Family`, `Assembly`, `FamilyAndAssembly`, `FamilyOrAssembly`.
    /// Missing keys keep their default, unknown keys are ignored with a warning.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfiguration`] for values that do not parse, or if the result
    /// fails [`RenderConfig::validate`].
    pub fn from_map(settings: &HashMap<String, String>) -> Result<Self> {
        let mut config = Self::default();

        // Sorted so that errors and warnings do not depend on hash order
        let mut keys: Vec<&String> = settings.keys().collect();
        keys.sort();

        for key in keys {
            let value = settings[key].trim();
            match key.as_str() {
                "ShowCustomAttributes" => config.show_custom_attributes = parse_bool(key, value)?,
                "ShowTypeDeclarationBody" => {
                    config.show_type_declaration_body = parse_bool(key, value)?;
                }
                "ShowNamespaceBody" => config.show_namespace_body = parse_bool(key, value)?,
                "NumberFormat" => {
                    config.number_format = NumberFormat::from_str(value).map_err(|_| {
                        Error::InvalidConfiguration(format!(
                            "NumberFormat: '{value}' is not one of Auto, Decimal, Hexadecimal"
                        ))
                    })?;
                }
                other => match other
                    .strip_prefix("Visibility.")
                    .and_then(|gate| Visibility::from_str(gate).ok())
                {
                    Some(Visibility::CompilerControlled) | None => {
                        tracing::warn!(key = other, "ignoring unknown configuration key");
                    }
                    Some(visibility) => {
                        *config.visibility.gate_mut(visibility) = parse_bool(key, value)?;
                    }
                },
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot render anything.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfiguration`] if every visibility gate is closed.
    pub fn validate(&self) -> Result<()> {
        if !self.visibility.any_enabled() {
            return Err(Error::InvalidConfiguration(
                "no visibility gate is enabled".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(Error::InvalidConfiguration(format!(
            "{key}: '{value}' is not a boolean"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert!(config.show_custom_attributes);
        assert!(config.show_type_declaration_body);
        assert!(config.show_namespace_body);
        assert_eq!(config.number_format, NumberFormat::Auto);
        assert_eq!(config.visibility, VisibilityConfiguration::all());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = RenderConfig::new()
            .with_custom_attributes(false)
            .with_number_format(NumberFormat::Hexadecimal)
            .with_visibility(VisibilityConfiguration::public_only());

        assert!(!config.show_custom_attributes);
        assert_eq!(config.number_format, NumberFormat::Hexadecimal);
        assert!(!config.visibility.private);
    }

    #[test]
    fn test_compiler_controlled_uses_private_gate() {
        let mut gates = VisibilityConfiguration::none();
        assert!(!gates.allows(Visibility::CompilerControlled));
        gates.private = true;
        assert!(gates.allows(Visibility::CompilerControlled));
        assert!(!gates.allows(Visibility::Public));
    }

    #[test]
    fn test_from_map() {
        let config = RenderConfig::from_map(&settings(&[
            ("ShowNamespaceBody", "False"),
            ("NumberFormat", "Decimal"),
            ("Visibility.Private", "false"),
            ("Visibility.FamilyAndAssembly", "false"),
            ("SomethingElse", "ignored"),
        ]))
        .unwrap();

        assert!(!config.show_namespace_body);
        assert_eq!(config.number_format, NumberFormat::Decimal);
        assert!(!config.visibility.private);
        assert!(!config.visibility.family_and_assembly);
        assert!(config.visibility.public);
    }

    #[test]
    fn test_from_map_rejects_bad_values() {
        assert!(matches!(
            RenderConfig::from_map(&settings(&[("NumberFormat", "Octal")])),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            RenderConfig::from_map(&settings(&[("ShowCustomAttributes", "yes")])),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_all_gates_closed_is_invalid() {
        let pairs: Vec<(String, String)> = [
            "Public",
            "Private",
            "Family",
            "Assembly",
            "FamilyAndAssembly",
            "FamilyOrAssembly",
        ]
        .iter()
        .map(|gate| (format!("Visibility.{gate}"), "false".to_string()))
        .collect();

        assert!(matches!(
            RenderConfig::from_map(&pairs.into_iter().collect()),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(RenderConfig::new()
            .with_visibility(VisibilityConfiguration::none())
            .validate()
            .is_err());
    }

    #[test]
    fn test_subset() {
        let all = VisibilityConfiguration::all();
        let none = VisibilityConfiguration::none();
        assert!(VisibilityConfiguration::public_only().is_subset_of(&all));
        assert!(!all.is_subset_of(&VisibilityConfiguration::api_surface()));
        assert!(none.is_subset_of(&none));
    }
}

//! Visibility and attribute flags of declarations.
//!
//! Accessibility is modelled as the ordered [`Visibility`] enum so that "most visible" is a
//! plain `max`. The remaining ECMA-335 attribute bits are kept as `bitflags`, with the raw
//! values of the metadata tables so providers can pass them through unchanged.

use bitflags::bitflags;
use strum::{Display, EnumIter, EnumString};

/// Mask of the access bits in `MethodAttributes` and `FieldAttributes`
pub const MEMBER_ACCESS_MASK: u32 = 0x0007;
/// Mask of the visibility bits in `TypeAttributes`
pub const TYPE_VISIBILITY_MASK: u32 = 0x0007;

/// Accessibility of a declaration, ordered from least to most visible.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter,
)]
pub enum Visibility {
    /// Member not referenceable outside the compiler (`privatescope`)
    CompilerControlled,
    /// `private`
    Private,
    /// `private protected`
    FamilyAndAssembly,
    /// `internal` / `Friend`
    Assembly,
    /// `protected`
    Family,
    /// `protected internal`
    FamilyOrAssembly,
    /// `public`
    Public,
}

impl Visibility {
    /// Decode the access bits of a field or method attribute word
    #[must_use]
    pub fn from_member_access(flags: u32) -> Self {
        match flags & MEMBER_ACCESS_MASK {
            0 => Visibility::CompilerControlled,
            1 => Visibility::Private,
            2 => Visibility::FamilyAndAssembly,
            3 => Visibility::Assembly,
            4 => Visibility::Family,
            5 => Visibility::FamilyOrAssembly,
            _ => Visibility::Public,
        }
    }

    /// Decode the visibility bits of a type attribute word.
    ///
    /// Top-level non-public types are assembly-visible.
    #[must_use]
    pub fn from_type_attributes(flags: u32) -> Self {
        match flags & TYPE_VISIBILITY_MASK {
            0 | 5 => Visibility::Assembly,
            1 | 2 => Visibility::Public,
            3 => Visibility::Private,
            4 => Visibility::Family,
            6 => Visibility::FamilyAndAssembly,
            _ => Visibility::FamilyOrAssembly,
        }
    }
}

bitflags! {
    /// Type attributes besides visibility (ECMA-335 II.23.1.15)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeAttributes: u32 {
        /// Type is an interface
        const INTERFACE = 0x0000_0020;
        /// Type is abstract
        const ABSTRACT = 0x0000_0080;
        /// Type cannot be derived from
        const SEALED = 0x0000_0100;
        /// Name has special meaning
        const SPECIAL_NAME = 0x0000_0400;
        /// Type is imported
        const IMPORT = 0x0000_1000;
        /// Type is serializable
        const SERIALIZABLE = 0x0000_2000;
        /// Static initialization may run before first static field access
        const BEFORE_FIELD_INIT = 0x0010_0000;
    }
}

bitflags! {
    /// Method attributes besides access (ECMA-335 II.23.1.10)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MethodModifiers: u32 {
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Method cannot be overridden
        const FINAL = 0x0020;
        /// Method is virtual
        const VIRTUAL = 0x0040;
        /// Method hides by name and signature
        const HIDE_BY_SIG = 0x0080;
        /// Method always gets a new slot in the vtable
        const NEW_SLOT = 0x0100;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Method is special
        const SPECIAL_NAME = 0x0800;
        /// Runtime should check name encoding
        const RTSPECIAL_NAME = 0x1000;
        /// Implementation is forwarded through PInvoke
        const PINVOKE_IMPL = 0x2000;
    }
}

bitflags! {
    /// Field attributes besides access (ECMA-335 II.23.1.5)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldModifiers: u32 {
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Field can only be initialized, not written to after init
        const INIT_ONLY = 0x0020;
        /// Value is a compile time constant
        const LITERAL = 0x0040;
        /// Field does not have to be serialized
        const NOT_SERIALIZED = 0x0080;
        /// Field is special
        const SPECIAL_NAME = 0x0200;
        /// Implementation is forwarded through PInvoke
        const PINVOKE_IMPL = 0x2000;
        /// Field has a default value
        const HAS_DEFAULT = 0x8000;
    }
}

bitflags! {
    /// Parameter attributes (ECMA-335 II.23.1.13)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ParameterFlags: u32 {
        /// Parameter is `[In]`
        const IN = 0x0001;
        /// Parameter is `[Out]`
        const OUT = 0x0002;
        /// Parameter is optional
        const OPTIONAL = 0x0010;
        /// Parameter has a default value
        const HAS_DEFAULT = 0x1000;
    }
}

bitflags! {
    /// Generic parameter variance and constraints (ECMA-335 II.23.1.7)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GenericParameterFlags: u32 {
        /// `out T`
        const COVARIANT = 0x0001;
        /// `in T`
        const CONTRAVARIANT = 0x0002;
        /// `where T : class`
        const REFERENCE_TYPE_CONSTRAINT = 0x0004;
        /// `where T : struct`
        const NOT_NULLABLE_VALUE_TYPE_CONSTRAINT = 0x0008;
        /// `where T : new()`
        const DEFAULT_CONSTRUCTOR_CONSTRAINT = 0x0010;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_member_access() {
        assert_eq!(Visibility::from_member_access(0x0006), Visibility::Public);
        assert_eq!(Visibility::from_member_access(0x0001), Visibility::Private);
        assert_eq!(
            Visibility::from_member_access(0x0000),
            Visibility::CompilerControlled
        );
        // modifier bits are ignored
        assert_eq!(Visibility::from_member_access(0x0056), Visibility::Public);
    }

    #[test]
    fn test_type_visibility() {
        assert_eq!(Visibility::from_type_attributes(0x0), Visibility::Assembly);
        assert_eq!(Visibility::from_type_attributes(0x1), Visibility::Public);
        assert_eq!(Visibility::from_type_attributes(0x2), Visibility::Public);
        assert_eq!(Visibility::from_type_attributes(0x3), Visibility::Private);
        assert_eq!(
            Visibility::from_type_attributes(0x7),
            Visibility::FamilyOrAssembly
        );
    }

    #[test]
    fn test_ordering() {
        assert!(Visibility::Public > Visibility::Family);
        assert!(Visibility::Private > Visibility::CompilerControlled);
        assert_eq!(
            [Visibility::Private, Visibility::Public, Visibility::Assembly]
                .into_iter()
                .max(),
            Some(Visibility::Public)
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            Visibility::from_str("FamilyOrAssembly").ok(),
            Some(Visibility::FamilyOrAssembly)
        );
        assert!(Visibility::from_str("Internal").is_err());
    }
}

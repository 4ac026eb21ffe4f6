//! Metadata tokens.
//!
//! A [`Token`] is the identifier a model provider attaches to each declaration and
//! reference. Builders hand them out sequentially per table.

use std::fmt;

/// Stable 32-bit identifier the model provider exposes for every declaration and reference.
///
/// Tokens follow the ECMA-335 layout:
/// - The high byte (bits 24-31) names the table the entity lives in
/// - The low 24 bits (bits 0-23) are the row inside that table
///
/// The renderers compare tokens for identity (accessor de-duplication, operand handle
/// de-duplication) instead of comparing declarations structurally. Models assembled by hand may
/// leave references at [`Token::NULL`]; such references fall back to structural identity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Token(pub u32);

impl Token {
    /// The null token, carried by references that have no provider-side identity
    pub const NULL: Token = Token(0);

    /// `TypeRef` table
    pub const TYPE_REF: u8 = 0x01;
    /// `TypeDef` table
    pub const TYPE_DEF: u8 = 0x02;
    /// `Field` table
    pub const FIELD: u8 = 0x04;
    /// `MethodDef` table
    pub const METHOD_DEF: u8 = 0x06;
    /// `Param` table
    pub const PARAM: u8 = 0x08;
    /// `MemberRef` table
    pub const MEMBER_REF: u8 = 0x0A;
    /// `StandAloneSig` table
    pub const STAND_ALONE_SIG: u8 = 0x11;
    /// `Event` table
    pub const EVENT: u8 = 0x14;
    /// `Property` table
    pub const PROPERTY: u8 = 0x17;
    /// `TypeSpec` table
    pub const TYPE_SPEC: u8 = 0x1B;
    /// `MethodSpec` table
    pub const METHOD_SPEC: u8 = 0x2B;
    /// User string heap
    pub const USER_STRING: u8 = 0x70;

    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token from a table id and a row index
    #[must_use]
    pub const fn from_parts(table: u8, row: u32) -> Self {
        Token(((table as u32) << 24) | (row & 0x00FF_FFFF))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token(0x{:08x})", self.0)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts() {
        let token = Token::from_parts(Token::METHOD_DEF, 7);
        assert_eq!(token.value(), 0x0600_0007);
        assert_eq!(token.table(), Token::METHOD_DEF);
        assert_eq!(token.row(), 7);
    }

    #[test]
    fn test_row_is_masked() {
        let token = Token::from_parts(Token::FIELD, 0x0100_0002);
        assert_eq!(token.table(), Token::FIELD);
        assert_eq!(token.row(), 2);
    }

    #[test]
    fn test_null() {
        assert!(Token::NULL.is_null());
        assert!(Token::default().is_null());
        assert!(!Token::new(0x0200_0001).is_null());
    }

    #[test]
    fn test_display() {
        assert_eq!(Token::new(0x0A00_0010).to_string(), "0x0a000010");
        assert_eq!(format!("{:?}", Token::new(1)), "Token(0x00000001)");
    }
}

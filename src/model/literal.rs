/// A constant value: expression literals, field constants, parameter defaults and custom
/// attribute arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `null` / `Nothing`
    Null,
    /// `bool`
    Boolean(bool),
    /// `char`
    Char(char),
    /// `sbyte`
    SByte(i8),
    /// `byte`
    Byte(u8),
    /// `short`
    Int16(i16),
    /// `ushort`
    UInt16(u16),
    /// `int`
    Int32(i32),
    /// `uint`
    UInt32(u32),
    /// `long`
    Int64(i64),
    /// `ulong`
    UInt64(u64),
    /// `float`
    Single(f32),
    /// `double`
    Double(f64),
    /// `string`
    String(String),
}

impl Literal {
    /// Returns the value of an integer literal, widened to `i128`
    #[must_use]
    pub fn as_integer(&self) -> Option<i128> {
        match *self {
            Literal::SByte(v) => Some(i128::from(v)),
            Literal::Byte(v) => Some(i128::from(v)),
            Literal::Int16(v) => Some(i128::from(v)),
            Literal::UInt16(v) => Some(i128::from(v)),
            Literal::Int32(v) => Some(i128::from(v)),
            Literal::UInt32(v) => Some(i128::from(v)),
            Literal::Int64(v) => Some(i128::from(v)),
            Literal::UInt64(v) => Some(i128::from(v)),
            _ => None,
        }
    }

    /// Returns true if this literal is the integer one
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.as_integer() == Some(1)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Int32(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Boolean(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

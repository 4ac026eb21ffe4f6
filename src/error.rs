use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($offset:expr, $msg:expr) => {
        crate::Error::MalformedBytecode {
            offset: $offset,
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($offset:expr, $fmt:expr, $($arg:tt)*) => {
        crate::Error::MalformedBytecode {
            offset: $offset,
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! unsupported_error {
    ($construct:expr, $syntax:expr) => {
        crate::Error::UnsupportedConstruct {
            construct: $construct.to_string(),
            syntax: $syntax,
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Rendering Errors
/// - [`Error::UnsupportedConstruct`] - A construct the selected syntax cannot express
/// - [`Error::Render`] - A failure while rendering a top-level unit, with the unit's name
///
/// ## Model Errors
/// - [`Error::UnresolvedReference`] - A strict lookup did not find a declaration
///
/// ## Bytecode Errors
/// - [`Error::MalformedBytecode`] - An instruction stream violates the offset/size invariant
/// - [`Error::UnknownInstruction`] - An opcode outside the legal opcode space
///
/// ## Configuration Errors
/// - [`Error::InvalidConfiguration`] - Inconsistent or unparsable rendering configuration
///
/// # Examples
///
/// ```rust,ignore
/// use cilrender::{Error, Renderer};
///
/// match renderer.render(unit, &mut out) {
///     Ok(()) => {}
///     Err(Error::UnsupportedConstruct { construct, syntax }) => {
///         eprintln!("{syntax} cannot express {construct}");
///     }
///     Err(Error::MalformedBytecode { offset, message, .. }) => {
///         eprintln!("IL_{offset:04X}: {message}");
///     }
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A construct reached a renderer whose target syntax has no way of expressing it.
    ///
    /// Fatal to the current render call. The renderer never substitutes approximate text.
    #[error("{syntax} cannot express {construct}")]
    UnsupportedConstruct {
        /// Description of the offending construct
        construct: String,
        /// Name of the target syntax
        syntax: &'static str,
    },

    /// A type or member reference could not be resolved against the loaded model.
    ///
    /// Only strict lookups return this; renderers fall back to the reference's own name
    /// information, since decompiled models legitimately point at assemblies that were never
    /// loaded.
    #[error("Unresolved reference - {0}")]
    UnresolvedReference(String),

    /// The instruction stream of a method body is damaged.
    ///
    /// Raised when an instruction's offset plus its encoded size does not match the next
    /// instruction's offset, when an operand does not fit its opcode, or when exception
    /// regions do not line up with instruction boundaries.
    ///
    /// # Fields
    ///
    /// * `offset` - Offset of the offending instruction or region
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed bytecode at IL_{offset:04X} - {file}:{line}: {message}")]
    MalformedBytecode {
        /// Offset of the offending instruction or region
        offset: u32,
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An opcode outside the legal CIL opcode space.
    ///
    /// Two-byte opcodes are reported as `0xFE00 | second_byte`.
    #[error("Unknown instruction 0x{opcode:04X} at IL_{offset:04X}")]
    UnknownInstruction {
        /// The numeric opcode
        opcode: u16,
        /// Offset of the instruction
        offset: u32,
    },

    /// The rendering configuration is internally inconsistent or could not be parsed.
    ///
    /// Raised by configuration validation, before any rendering starts.
    #[error("Invalid configuration - {0}")]
    InvalidConfiguration(String),

    /// Rendering of a top-level unit failed.
    ///
    /// Wraps the underlying error together with the name of the unit whose render call was
    /// aborted.
    #[error("Failed to render {unit}: {source}")]
    Render {
        /// Name of the unit that failed to render
        unit: String,
        /// The underlying failure
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Returns `true` if this error only affects a single method body.
    ///
    /// Callers rendering a whole type use this to decide whether the remaining members can
    /// still be rendered.
    #[must_use]
    pub fn is_body_local(&self) -> bool {
        matches!(
            self,
            Error::MalformedBytecode { .. } | Error::UnknownInstruction { .. }
        )
    }
}

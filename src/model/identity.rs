//! Assembly identities and their display names.
//!
//! An [`AssemblyIdentity`] names an assembly the way the runtime binder does: simple name,
//! four-part version, culture and an optional strong name. Declaration headers and owner
//! descriptions print it through [`AssemblyIdentity::display_name`].

use std::{
    fmt::{self, Write},
    hash::{Hash, Hasher},
};

use sha1::{Digest, Sha1};

/// Four-part assembly version (`major.minor.build.revision`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AssemblyVersion {
    /// Major version
    pub major: u16,
    /// Minor version
    pub minor: u16,
    /// Build number
    pub build: u16,
    /// Revision number
    pub revision: u16,
}

impl AssemblyVersion {
    /// Create a new version
    #[must_use]
    pub const fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }
}

impl fmt::Display for AssemblyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

/// Strong name information carried by an assembly identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrongName {
    /// The full public key blob
    PublicKey(Vec<u8>),
    /// The 8-byte public key token, in display order
    Token([u8; 8]),
}

impl StrongName {
    /// Returns the public key token, computing it from the full key if necessary.
    ///
    /// The token is the last 8 bytes of the SHA-1 hash of the public key, in reverse order.
    #[must_use]
    pub fn token(&self) -> [u8; 8] {
        match self {
            StrongName::Token(token) => *token,
            StrongName::PublicKey(key) => {
                let mut hasher = Sha1::new();
                hasher.update(key);
                let hash = hasher.finalize();

                let mut token = [0u8; 8];
                for (slot, byte) in token.iter_mut().zip(hash.iter().rev()) {
                    *slot = *byte;
                }
                token
            }
        }
    }
}

/// Identity of an assembly.
///
/// Equality and hashing ignore the strong name: two identities naming the same assembly, one
/// with the full key and one with just its token, are the same assembly.
#[derive(Debug, Clone)]
pub struct AssemblyIdentity {
    /// Simple name, e.g. `mscorlib`
    pub name: String,
    /// Assembly version
    pub version: AssemblyVersion,
    /// Culture; `None` for culture-neutral assemblies
    pub culture: Option<String>,
    /// Strong name, if the assembly is signed
    pub strong_name: Option<StrongName>,
}

impl AssemblyIdentity {
    /// Create a new culture-neutral, unsigned identity
    #[must_use]
    pub fn new(name: &str, version: AssemblyVersion) -> Self {
        Self {
            name: name.to_string(),
            version,
            culture: None,
            strong_name: None,
        }
    }

    /// Set the culture
    #[must_use]
    pub fn with_culture(mut self, culture: &str) -> Self {
        self.culture = Some(culture.to_string());
        self
    }

    /// Set the strong name
    #[must_use]
    pub fn with_strong_name(mut self, strong_name: StrongName) -> Self {
        self.strong_name = Some(strong_name);
        self
    }

    /// Render the binder display name.
    ///
    /// `Name, Version=a.b.c.d, Culture=neutral, PublicKeyToken=xxxxxxxxxxxxxxxx`, with
    /// `PublicKeyToken=null` for unsigned assemblies.
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut result = String::with_capacity(self.name.len() + 80);

        result.push_str(&self.name);
        let _ = write!(result, ", Version={}", self.version);
        let _ = write!(
            result,
            ", Culture={}",
            self.culture.as_deref().unwrap_or("neutral")
        );

        result.push_str(", PublicKeyToken=");
        match &self.strong_name {
            Some(strong_name) => {
                for byte in strong_name.token() {
                    let _ = write!(result, "{byte:02x}");
                }
            }
            None => result.push_str("null"),
        }

        result
    }
}

impl PartialEq for AssemblyIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.version == other.version && self.culture == other.culture
    }
}

impl Eq for AssemblyIdentity {}

impl Hash for AssemblyIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.version.hash(state);
        self.culture.hash(state);
    }
}

impl fmt::Display for AssemblyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_unsigned() {
        let identity = AssemblyIdentity::new("MyLibrary", AssemblyVersion::new(1, 2, 3, 4));
        assert_eq!(
            identity.display_name(),
            "MyLibrary, Version=1.2.3.4, Culture=neutral, PublicKeyToken=null"
        );
    }

    #[test]
    fn test_display_name_culture() {
        let identity =
            AssemblyIdentity::new("MyLibrary", AssemblyVersion::new(1, 0, 0, 0)).with_culture("de");
        assert!(identity.display_name().contains("Culture=de,"));
    }

    #[test]
    fn test_display_name_with_token() {
        let identity = AssemblyIdentity::new("mscorlib", AssemblyVersion::new(4, 0, 0, 0))
            .with_strong_name(StrongName::Token([
                0xb7, 0x7a, 0x5c, 0x56, 0x19, 0x34, 0xe0, 0x89,
            ]));
        assert_eq!(
            identity.display_name(),
            "mscorlib, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089"
        );
    }

    #[test]
    fn test_ecma_key_token() {
        let ecma_key = vec![0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0];
        let strong_name = StrongName::PublicKey(ecma_key);
        assert_eq!(
            strong_name.token(),
            [0xb7, 0x7a, 0x5c, 0x56, 0x19, 0x34, 0xe0, 0x89]
        );
    }

    #[test]
    fn test_equality_ignores_strong_name() {
        let a = AssemblyIdentity::new("Lib", AssemblyVersion::new(1, 0, 0, 0));
        let b = a.clone().with_strong_name(StrongName::Token([1; 8]));
        assert_eq!(a, b);

        let c = AssemblyIdentity::new("Lib", AssemblyVersion::new(2, 0, 0, 0));
        assert_ne!(a, c);
    }
}

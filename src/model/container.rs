//! Assemblies, modules and namespaces.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use crate::model::{
    attributes::CustomAttribute,
    identity::AssemblyIdentity,
    token::Token,
    typedef::{TypeDeclarationList, TypeDeclarationRc},
    weak::AssemblyRef,
};

/// Reference-counted assembly
pub type AssemblyRc = Arc<Assembly>;
/// Reference-counted module
pub type ModuleRc = Arc<Module>;

/// A loaded assembly.
pub struct Assembly {
    /// The assembly's identity
    pub identity: AssemblyIdentity,
    /// Modules, the manifest module first
    pub modules: Arc<boxcar::Vec<ModuleRc>>,
    /// Assembly-level custom attributes
    pub custom_attributes: Vec<CustomAttribute>,
}

impl Assembly {
    /// Create an assembly without modules
    #[must_use]
    pub fn new(identity: AssemblyIdentity) -> Self {
        Assembly {
            identity,
            modules: Arc::new(boxcar::Vec::new()),
            custom_attributes: Vec::new(),
        }
    }

    /// Add a module and link it back to this assembly
    pub fn add_module(self: &Arc<Self>, module: ModuleRc) {
        module.set_assembly(self);
        self.modules.push(module);
    }
}

impl std::fmt::Debug for Assembly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assembly")
            .field("identity", &self.identity.display_name())
            .field("modules", &self.modules.count())
            .finish_non_exhaustive()
    }
}

/// A module of an assembly.
pub struct Module {
    /// Module file name
    pub name: String,
    /// Module version identifier
    pub mvid: uguid::Guid,
    /// Top-level types; nested types hang off their enclosing type
    pub types: TypeDeclarationList,
    /// Module-level custom attributes
    pub custom_attributes: Vec<CustomAttribute>,
    assembly: OnceLock<AssemblyRef>,
    next_rows: DashMap<u8, u32>,
}

impl Module {
    /// Create an empty module
    #[must_use]
    pub fn new(name: &str, mvid: uguid::Guid) -> Self {
        Module {
            name: name.to_string(),
            mvid,
            types: Arc::new(boxcar::Vec::new()),
            custom_attributes: Vec::new(),
            assembly: OnceLock::new(),
            next_rows: DashMap::new(),
        }
    }

    /// Link the module to its assembly. Only the first call has an effect.
    pub fn set_assembly(&self, assembly: &AssemblyRc) {
        let _ = self.assembly.set(AssemblyRef::new(assembly));
    }

    /// The owning assembly, if the link is still alive
    #[must_use]
    pub fn assembly(&self) -> Option<AssemblyRc> {
        self.assembly.get().and_then(AssemblyRef::upgrade)
    }

    /// Hand out the next free token of `table`. Rows start at 1.
    ///
    /// Safe to call from several threads building the same module.
    pub fn allocate_token(&self, table: u8) -> Token {
        let mut row = self.next_rows.entry(table).or_insert(0);
        *row += 1;
        Token::from_parts(table, *row)
    }

    /// Add a top-level type and link it back to this module
    pub fn add_type(self: &Arc<Self>, declaration: TypeDeclarationRc) {
        declaration.set_module(self);
        self.types.push(declaration);
    }
}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("mvid", &self.mvid)
            .field("types", &self.types.count())
            .finish_non_exhaustive()
    }
}

/// A namespace of a module: the module's top-level types sharing one namespace name.
///
/// Namespaces are not stored in the model; they are computed on demand by
/// [`crate::query::namespaces`].
#[derive(Debug, Clone)]
pub struct Namespace {
    /// The module the namespace is listed for
    pub module: ModuleRc,
    /// Namespace name, empty for the global namespace
    pub name: String,
}

impl Namespace {
    /// Create a namespace view
    #[must_use]
    pub fn new(module: ModuleRc, name: &str) -> Self {
        Namespace {
            module,
            name: name.to_string(),
        }
    }

    /// The module's top-level types in this namespace, unsorted
    #[must_use]
    pub fn types(&self) -> Vec<TypeDeclarationRc> {
        self.module
            .types
            .iter()
            .filter(|(_, declaration)| declaration.namespace == self.name)
            .map(|(_, declaration)| declaration.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::identity::AssemblyVersion;

    #[test]
    fn test_token_allocation() {
        let module = Module::new("Test.dll", uguid::Guid::ZERO);
        assert_eq!(
            module.allocate_token(Token::TYPE_DEF),
            Token::new(0x0200_0001)
        );
        assert_eq!(
            module.allocate_token(Token::TYPE_DEF),
            Token::new(0x0200_0002)
        );
        assert_eq!(
            module.allocate_token(Token::METHOD_DEF),
            Token::new(0x0600_0001)
        );
    }

    #[test]
    fn test_links() {
        let assembly = Arc::new(Assembly::new(AssemblyIdentity::new(
            "Test",
            AssemblyVersion::new(1, 0, 0, 0),
        )));
        let module = Arc::new(Module::new("Test.dll", uguid::Guid::ZERO));
        assembly.add_module(module.clone());

        let owner = module.assembly();
        assert!(owner.is_some_and(|owner| owner.identity.name == "Test"));
        assert_eq!(assembly.modules.count(), 1);
    }
}

//! The code model registry.
//!
//! [`CodeModel`] indexes every type declaration of the loaded assemblies so that references
//! coming out of signatures, expressions and instruction operands can be resolved back to their
//! declarations. Resolution is best-effort: references into assemblies that were never loaded
//! stay unresolved and the renderers work from the reference's own information.
//!
//! # Thread Safety
//!
//! Primary storage is an ordered `SkipMap`, the name index a `DashMap`; providers may register
//! assemblies from several threads before rendering starts.

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;

use crate::{
    model::{
        container::AssemblyRc,
        members::{
            EventDeclarationRc, EventReference, FieldDeclarationRc, FieldReference,
            MethodDeclarationRc, MethodReference, PropertyDeclarationRc, PropertyReference,
        },
        typedef::TypeDeclarationRc,
        types::{TypeOwner, TypeReference, TypeSignature},
    },
    Error::UnresolvedReference,
    Result,
};

/// Ordering key of the primary type storage: full name, owning assembly, token
type TypeKey = (String, String, u32);

/// Registry of all loaded declarations.
pub struct CodeModel {
    assemblies: boxcar::Vec<AssemblyRc>,
    types: SkipMap<TypeKey, TypeDeclarationRc>,
    types_by_fullname: DashMap<String, Vec<TypeDeclarationRc>>,
}

impl CodeModel {
    /// Create an empty model
    #[must_use]
    pub fn new() -> Self {
        CodeModel {
            assemblies: boxcar::Vec::new(),
            types: SkipMap::new(),
            types_by_fullname: DashMap::new(),
        }
    }

    /// Register an assembly and every type declared in its modules, nested types included
    pub fn add_assembly(&self, assembly: AssemblyRc) {
        tracing::debug!(
            assembly = %assembly.identity.name,
            modules = assembly.modules.count(),
            "registering assembly"
        );

        for (_, module) in assembly.modules.iter() {
            for (_, declaration) in module.types.iter() {
                self.register_type(declaration);
            }
        }
        self.assemblies.push(assembly);
    }

    /// Register one type declaration and, recursively, its nested types
    pub fn register_type(&self, declaration: &TypeDeclarationRc) {
        let full_name = declaration.full_name();
        let assembly = declaration
            .module()
            .and_then(|module| module.assembly())
            .map(|assembly| assembly.identity.name.clone())
            .unwrap_or_default();

        self.types.insert(
            (full_name.clone(), assembly, declaration.token.value()),
            declaration.clone(),
        );
        self.types_by_fullname
            .entry(full_name)
            .or_default()
            .push(declaration.clone());

        for (_, nested) in declaration.nested_types.iter() {
            self.register_type(nested);
        }
    }

    /// All registered assemblies, in registration order
    #[must_use]
    pub fn assemblies(&self) -> Vec<AssemblyRc> {
        self.assemblies
            .iter()
            .map(|(_, assembly)| assembly.clone())
            .collect()
    }

    /// All registered types, ordered by full name
    #[must_use]
    pub fn types(&self) -> Vec<TypeDeclarationRc> {
        self.types.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Number of registered types
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Look up a type by its metadata full name (`Namespace.Name` or `Outer/Inner`)
    #[must_use]
    pub fn get_by_fullname(&self, full_name: &str) -> Option<TypeDeclarationRc> {
        self.types_by_fullname
            .get(full_name)
            .and_then(|candidates| candidates.first().cloned())
    }

    /// Resolve a type reference to its declaration.
    ///
    /// Generic instantiations resolve to their definition. When several loaded assemblies
    /// declare the same full name, the reference's owner picks the candidate; a reference
    /// scoped to an assembly that was not loaded stays unresolved.
    #[must_use]
    pub fn resolve_type(&self, reference: &TypeReference) -> Option<TypeDeclarationRc> {
        let candidates = self.types_by_fullname.get(&reference.full_name())?;

        let owner = match &reference.owner {
            TypeOwner::Type(enclosing) => &enclosing_root(enclosing).owner,
            owner => owner,
        };

        match owner {
            TypeOwner::Assembly(identity) => candidates
                .iter()
                .find(|candidate| {
                    candidate
                        .module()
                        .and_then(|module| module.assembly())
                        .is_some_and(|assembly| assembly.identity == *identity)
                })
                .cloned(),
            TypeOwner::Module(name) => candidates
                .iter()
                .find(|candidate| {
                    candidate
                        .module()
                        .is_some_and(|module| module.name == *name)
                })
                .or_else(|| candidates.first())
                .cloned(),
            TypeOwner::None | TypeOwner::Type(_) => candidates.first().cloned(),
        }
    }

    /// Resolve the named type of a signature
    #[must_use]
    pub fn resolve_signature(&self, signature: &TypeSignature) -> Option<TypeDeclarationRc> {
        signature
            .as_reference()
            .and_then(|reference| self.resolve_type(reference))
    }

    /// Resolve a type reference, failing with [`crate::Error::UnresolvedReference`]
    ///
    /// # Errors
    /// Returns [`crate::Error::UnresolvedReference`] if no loaded declaration matches.
    pub fn require_type(&self, reference: &TypeReference) -> Result<TypeDeclarationRc> {
        self.resolve_type(reference)
            .ok_or_else(|| UnresolvedReference(reference.full_name()))
    }

    /// Resolve a method reference to its declaration.
    ///
    /// A matching token wins; otherwise name and parameter types must match.
    #[must_use]
    pub fn resolve_method(&self, reference: &MethodReference) -> Option<MethodDeclarationRc> {
        let declaring = self.resolve_type(&reference.declaring_type)?;

        if !reference.token.is_null() {
            if let Some((_, method)) = declaring
                .methods
                .iter()
                .find(|(_, method)| method.token == reference.token)
            {
                return Some(method.clone());
            }
        }

        declaring
            .methods
            .iter()
            .find(|(_, method)| {
                method.name == reference.name
                    && method.parameters.len() == reference.parameter_types.len()
                    && method
                        .parameters
                        .iter()
                        .zip(&reference.parameter_types)
                        .all(|(parameter, expected)| parameter.parameter_type == *expected)
            })
            .map(|(_, method)| method.clone())
    }

    /// Resolve a method reference, failing with [`crate::Error::UnresolvedReference`]
    ///
    /// # Errors
    /// Returns [`crate::Error::UnresolvedReference`] if no loaded declaration matches.
    pub fn require_method(&self, reference: &MethodReference) -> Result<MethodDeclarationRc> {
        self.resolve_method(reference).ok_or_else(|| {
            UnresolvedReference(format!(
                "{}::{}",
                reference.declaring_type.full_name(),
                reference.name
            ))
        })
    }

    /// Resolve a field reference to its declaration
    #[must_use]
    pub fn resolve_field(&self, reference: &FieldReference) -> Option<FieldDeclarationRc> {
        self.resolve_type(&reference.declaring_type)?
            .field(&reference.name)
    }

    /// Resolve a property reference to its declaration
    #[must_use]
    pub fn resolve_property(&self, reference: &PropertyReference) -> Option<PropertyDeclarationRc> {
        let declaring = self.resolve_type(&reference.declaring_type)?;
        let found = declaring
            .properties
            .iter()
            .find(|(_, property)| {
                property.name == reference.name
                    && property.parameters.len() == reference.parameter_types.len()
            })
            .map(|(_, property)| property.clone());
        found
    }

    /// Resolve an event reference to its declaration
    #[must_use]
    pub fn resolve_event(&self, reference: &EventReference) -> Option<EventDeclarationRc> {
        let declaring = self.resolve_type(&reference.declaring_type)?;
        let found = declaring
            .events
            .iter()
            .find(|(_, event)| event.name == reference.name)
            .map(|(_, event)| event.clone());
        found
    }
}

impl Default for CodeModel {
    fn default() -> Self {
        Self::new()
    }
}

/// The outermost enclosing reference of a nested type reference
fn enclosing_root(reference: &TypeReference) -> &TypeReference {
    match reference.enclosing() {
        Some(enclosing) => enclosing_root(enclosing),
        None => reference,
    }
}

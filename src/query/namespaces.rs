//! Namespace grouping.
//!
//! Namespaces have no storage of their own; a module's namespaces are the distinct namespace
//! names of its top-level types.

use std::collections::BTreeMap;

use crate::{
    config::VisibilityConfiguration,
    model::{ModuleRc, Namespace, TypeDeclarationRc},
    query::visibility::Visible,
};

/// The top-level types of one module grouped by namespace, both levels sorted by name.
#[derive(Debug, Clone)]
pub struct NamespaceListing {
    module: ModuleRc,
    groups: BTreeMap<String, Vec<TypeDeclarationRc>>,
}

impl NamespaceListing {
    /// Group the types of `module` that pass `gates`.
    ///
    /// Namespaces left without visible types are dropped.
    #[must_use]
    pub fn new(module: &ModuleRc, gates: &VisibilityConfiguration) -> Self {
        let mut groups: BTreeMap<String, Vec<TypeDeclarationRc>> = BTreeMap::new();
        for (_, declaration) in module.types.iter() {
            if declaration.is_visible(gates) {
                groups
                    .entry(declaration.namespace.clone())
                    .or_default()
                    .push(declaration.clone());
            }
        }

        for types in groups.values_mut() {
            types.sort_by(|a, b| a.name.cmp(&b.name).then(a.token.cmp(&b.token)));
        }

        NamespaceListing {
            module: module.clone(),
            groups,
        }
    }

    /// Namespace names, the global namespace (empty name) first
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    /// Namespace views in name order
    #[must_use]
    pub fn namespaces(&self) -> Vec<Namespace> {
        self.groups
            .keys()
            .map(|name| Namespace::new(self.module.clone(), name))
            .collect()
    }

    /// The sorted types of namespace `name`
    #[must_use]
    pub fn types(&self, name: &str) -> &[TypeDeclarationRc] {
        self.groups.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if no type passed the gates
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Visible types of `namespace`, sorted by name
#[must_use]
pub fn namespace_types(
    namespace: &Namespace,
    gates: &VisibilityConfiguration,
) -> Vec<TypeDeclarationRc> {
    let mut types: Vec<TypeDeclarationRc> = namespace
        .types()
        .into_iter()
        .filter(|declaration| declaration.is_visible(gates))
        .collect();
    types.sort_by(|a, b| a.name.cmp(&b.name).then(a.token.cmp(&b.token)));
    types
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{identity::AssemblyVersion, AssemblyBuilder, TypeBuilder, Visibility};

    #[test]
    fn test_groups_and_sorts() {
        let mut builder = AssemblyBuilder::new("Sample", AssemblyVersion::new(1, 0, 0, 0));
        let module = builder.module("Sample.dll");
        TypeBuilder::class("Sample.Io", "Writer").build_in(&module);
        TypeBuilder::class("Sample", "Zeta").build_in(&module);
        TypeBuilder::class("Sample", "Alpha").build_in(&module);
        TypeBuilder::class("", "Program").build_in(&module);
        TypeBuilder::class("Sample.Hidden", "Secret")
            .visibility(Visibility::Assembly)
            .build_in(&module);
        let _assembly = builder.build();

        let listing = NamespaceListing::new(&module, &VisibilityConfiguration::public_only());
        assert_eq!(listing.names(), vec!["", "Sample", "Sample.Io"]);

        let sample: Vec<&str> = listing
            .types("Sample")
            .iter()
            .map(|declaration| declaration.name.as_str())
            .collect();
        assert_eq!(sample, vec!["Alpha", "Zeta"]);
        assert!(listing.types("Sample.Hidden").is_empty());

        let all = NamespaceListing::new(&module, &VisibilityConfiguration::all());
        assert_eq!(all.namespaces().len(), 4);
        let hidden = Namespace::new(module.clone(), "Sample.Hidden");
        assert_eq!(namespace_types(&hidden, &VisibilityConfiguration::all()).len(), 1);
    }
}

//! Visibility resolution.
//!
//! A declaration is visible when the gate of its own visibility is open and every enclosing
//! type is visible as well. Links that can no longer be followed (a dropped enclosing or
//! declaring type) count as visible: hiding content the configuration did not ask to hide is
//! worse than showing it.

use crate::{
    config::VisibilityConfiguration,
    model::{
        AssemblyRc, EventDeclaration, FieldDeclaration, MethodDeclaration, ModuleRc,
        PropertyDeclaration, TypeDeclaration, TypeDeclarationRc, Visibility,
    },
};

/// Declarations subject to the visibility gates.
pub trait Visible {
    /// Returns true if the declaration passes `gates`, enclosing types included
    fn is_visible(&self, gates: &VisibilityConfiguration) -> bool;
}

/// Returns true if `declaration` passes `gates`
#[must_use]
pub fn is_visible<T: Visible + ?Sized>(declaration: &T, gates: &VisibilityConfiguration) -> bool {
    declaration.is_visible(gates)
}

fn declaring_visible(
    declaring: Option<TypeDeclarationRc>,
    gates: &VisibilityConfiguration,
) -> bool {
    match declaring {
        Some(declaring) => declaring.is_visible(gates),
        None => true,
    }
}

fn accessor_gate(visibility: Option<Visibility>, gates: &VisibilityConfiguration) -> bool {
    match visibility {
        Some(visibility) => gates.allows(visibility),
        None => true,
    }
}

impl Visible for TypeDeclaration {
    fn is_visible(&self, gates: &VisibilityConfiguration) -> bool {
        gates.allows(self.visibility) && declaring_visible(self.enclosing_type(), gates)
    }
}

impl Visible for FieldDeclaration {
    fn is_visible(&self, gates: &VisibilityConfiguration) -> bool {
        gates.allows(self.visibility) && declaring_visible(self.declaring_type(), gates)
    }
}

impl Visible for MethodDeclaration {
    fn is_visible(&self, gates: &VisibilityConfiguration) -> bool {
        gates.allows(self.visibility) && declaring_visible(self.declaring_type(), gates)
    }
}

impl Visible for PropertyDeclaration {
    fn is_visible(&self, gates: &VisibilityConfiguration) -> bool {
        accessor_gate(self.visibility(), gates) && declaring_visible(self.declaring_type(), gates)
    }
}

impl Visible for EventDeclaration {
    fn is_visible(&self, gates: &VisibilityConfiguration) -> bool {
        accessor_gate(self.visibility(), gates) && declaring_visible(self.declaring_type(), gates)
    }
}

/// The assembly declaring `declaration`, following enclosing types to the owning module
#[must_use]
pub fn assembly_of(declaration: &TypeDeclaration) -> Option<AssemblyRc> {
    module_of(declaration).and_then(|module| module.assembly())
}

/// The module declaring `declaration`
#[must_use]
pub fn module_of(declaration: &TypeDeclaration) -> Option<ModuleRc> {
    declaration.module()
}

use std::sync::{Arc, Weak};

use crate::model::{
    container::{Assembly, Module},
    typedef::TypeDeclaration,
};

/// A non-owning back-reference inside the model.
///
/// Members point at their declaring type, nested types at their enclosing type and types at
/// their module through this wrapper, so that the ownership graph stays a tree. Traversals
/// must treat a dropped link as missing information, never as an error.
pub struct WeakRef<T> {
    weak_ref: Weak<T>,
}

impl<T> WeakRef<T> {
    /// Create a new `WeakRef` from a strong reference
    pub fn new(strong_ref: &Arc<T>) -> Self {
        Self {
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    /// Get a strong reference, returning None if the target has been dropped
    #[must_use]
    pub fn upgrade(&self) -> Option<Arc<T>> {
        self.weak_ref.upgrade()
    }

    /// Check if the referenced target is still alive
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.weak_ref.strong_count() > 0
    }
}

impl<T> Clone for WeakRef<T> {
    fn clone(&self) -> Self {
        Self {
            weak_ref: self.weak_ref.clone(),
        }
    }
}

impl<T> std::fmt::Debug for WeakRef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WeakRef(valid: {})", self.is_valid())
    }
}

/// Back-reference to a type declaration
pub type TypeDeclarationRef = WeakRef<TypeDeclaration>;
/// Back-reference to a module
pub type ModuleRef = WeakRef<Module>;
/// Back-reference to an assembly
pub type AssemblyRef = WeakRef<Assembly>;

//! Derived facts over the code model.
//!
//! Everything here is a pure function of the model (and, for listings, of the visibility
//! gates). The renderers call these helpers for every type and member they write; nothing is
//! cached between calls.
//!
//! # Key Components
//!
//! - [`names`] - qualified names and signature text for tooltips and sorting
//! - [`visibility`] - the [`Visible`] trait, nested-type escalation, owning assembly lookup
//! - [`interfaces`](mod@interfaces) - interface lists without redundant entries
//! - [`members`] - filtered and sorted member listings
//! - [`overrides`] - override matching along the base type chain
//! - [`namespaces`] - grouping of a module's types by namespace
//!
//! Lookups that cannot be completed (dropped back-links, references into assemblies that were
//! not loaded) fall back to the least resolved answer instead of failing.

pub mod interfaces;
pub mod members;
pub mod names;
pub mod namespaces;
pub mod overrides;
pub mod visibility;

pub use interfaces::{inherited_interfaces, interfaces};
pub use members::{accessor_tokens, events, fields, methods, nested_types, properties};
pub use names::{
    declaration_name, field_reference_text, method_reference_text, method_signature_text,
    qualified_name, signature_name, strip_arity,
};
pub use namespaces::{namespace_types, NamespaceListing};
pub use overrides::{base_method, is_base_method};
pub use visibility::{assembly_of, is_visible, module_of, Visible};

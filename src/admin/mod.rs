//! Admin presentation layer
//!
//! A registry of per-model settings ([`site::AdminSite`]) and generic
//! renderers turning records into list and change views.

pub mod fields;
pub mod filters;
pub mod records;
pub mod render;
pub mod site;

pub use fields::ModelKind;
pub use records::AdminRecord;
pub use site::{AdminSite, ModelAdmin};

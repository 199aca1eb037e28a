//! Request composition - parameter binding and request assembly
//!
//! Everything here is pure and synchronous.

pub mod binder;
pub mod composer;

pub use binder::{bind, classify, unresolved_placeholders, BoundPath, Placement};
pub use composer::RequestComposer;

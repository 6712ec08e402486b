//! Copy-on-write views
//!
//! A view wraps a subset of a container held by a root object. Reading a
//! view reads the subset. Writing to a view copies the root, applies the
//! write to the copy, and makes the copy the root's new state, so that the
//! object the root was subset from, and any other view of it, is unaffected.

mod element_ref;
pub use element_ref::*;

mod container;
pub use container::*;

mod wrapper;
pub use wrapper::*;

mod variants;
pub use variants::*;

mod registry;
pub use registry::*;


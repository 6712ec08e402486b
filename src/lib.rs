#[macro_use]
extern crate pest_derive;

pub mod error;
pub mod object;
pub mod parser;
pub mod store;
pub mod view;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(test)]
pub(crate) mod utils;

pub use error::{Error, Result};
pub use object::index::{compose, compose_pair, Index, Slice, Stride};
pub use store::{Axes, Store};
pub use view::{as_view, ElementRef, Root, View, ViewElem};

mod error;
mod graph;
mod parse;
pub mod profile;
pub mod signal;

pub use error::CatalogError;
pub use graph::{Catalog, CatalogLink, CatalogNode, NodeKind};

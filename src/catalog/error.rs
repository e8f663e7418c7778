use std::path::PathBuf;

use thiserror::Error;

/// Integrity and loading failures for the static node catalog.
///
/// All of these are configuration errors: they surface once, at startup,
/// before any simulation or rendering state exists.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog JSON")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate node id `{0}`")]
    DuplicateNodeId(String),

    #[error("link #{link} references unknown node `{id}`")]
    UnknownLinkEndpoint { link: usize, id: String },

    #[error("link #{link} connects `{id}` to itself")]
    SelfLink { link: usize, id: String },

    #[error("core node `{0}` is not part of the catalog")]
    UnknownCoreNode(String),

    #[error("{what} of `{id}` must be a positive finite number, got {value}")]
    InvalidWeight {
        what: &'static str,
        id: String,
        value: f32,
    },
}

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::error::CatalogError;
use super::parse::{RawCatalog, RawLink, RawNode, parse_catalog};

const EMBEDDED_CATALOG: &str = include_str!("../../assets/catalog.json");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeKind {
    System,
    Data,
    Thought,
    Failure,
    Signal,
}

impl NodeKind {
    pub const ALL: [Self; 5] = [
        Self::System,
        Self::Data,
        Self::Thought,
        Self::Failure,
        Self::Signal,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::System => "SYSTEM",
            Self::Data => "DATA",
            Self::Thought => "THOUGHT",
            Self::Failure => "FAILURE",
            Self::Signal => "SIGNAL",
        }
    }

    /// Projects and datasets get the repository card in the detail overlay.
    pub fn is_project(self) -> bool {
        matches!(self, Self::System | Self::Data)
    }
}

#[derive(Clone, Debug)]
pub struct CatalogNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub description: String,
    pub content: Option<String>,
    pub url: Option<String>,
    pub date: Option<String>,
    pub tags: Vec<String>,
    pub img: Option<String>,
    pub language: Option<String>,
    pub stars: Option<u32>,
    pub read_time: Option<String>,
    pub val: f32,
    pub pinned: Option<[f32; 2]>,
}

impl From<RawNode> for CatalogNode {
    fn from(raw: RawNode) -> Self {
        Self {
            id: raw.id,
            label: raw.label,
            kind: raw.kind,
            description: raw.description,
            content: raw.content,
            url: raw.url,
            date: raw.date,
            tags: raw.tags,
            img: raw.img,
            language: raw.language,
            stars: raw.stars,
            read_time: raw.read_time,
            val: raw.val,
            pinned: raw.pinned,
        }
    }
}

/// A validated edge. Endpoints are kept as ids; the layout engine resolves
/// them to body indices when it is built.
#[derive(Clone, Debug)]
pub struct CatalogLink {
    pub source: String,
    pub target: String,
    pub value: f32,
}

impl From<RawLink> for CatalogLink {
    fn from(raw: RawLink) -> Self {
        Self {
            source: raw.source,
            target: raw.target,
            value: raw.value,
        }
    }
}

/// Immutable node/link set. Built once at startup and only ever read.
#[derive(Clone, Debug)]
pub struct Catalog {
    nodes: Vec<CatalogNode>,
    links: Vec<CatalogLink>,
    index_by_id: HashMap<String, usize>,
    core_index: Option<usize>,
}

impl Catalog {
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let document = parse_catalog(raw)?;
        Self::from_document(document)
    }

    fn from_document(document: RawCatalog) -> Result<Self, CatalogError> {
        let mut index_by_id = HashMap::with_capacity(document.nodes.len());
        let mut nodes = Vec::with_capacity(document.nodes.len());
        for raw in document.nodes {
            if !(raw.val.is_finite() && raw.val > 0.0) {
                return Err(CatalogError::InvalidWeight {
                    what: "val",
                    id: raw.id,
                    value: raw.val,
                });
            }
            if index_by_id.insert(raw.id.clone(), nodes.len()).is_some() {
                return Err(CatalogError::DuplicateNodeId(raw.id));
            }
            nodes.push(CatalogNode::from(raw));
        }

        let mut links = Vec::with_capacity(document.links.len());
        for (link, raw) in document.links.into_iter().enumerate() {
            for endpoint in [&raw.source, &raw.target] {
                if !index_by_id.contains_key(endpoint) {
                    return Err(CatalogError::UnknownLinkEndpoint {
                        link,
                        id: endpoint.clone(),
                    });
                }
            }
            if raw.source == raw.target {
                return Err(CatalogError::SelfLink { link, id: raw.source });
            }
            if !(raw.value.is_finite() && raw.value > 0.0) {
                return Err(CatalogError::InvalidWeight {
                    what: "link value",
                    id: format!("{}->{}", raw.source, raw.target),
                    value: raw.value,
                });
            }
            links.push(CatalogLink::from(raw));
        }

        let core_index = match document.core {
            Some(core) => Some(
                index_by_id
                    .get(&core)
                    .copied()
                    .ok_or(CatalogError::UnknownCoreNode(core))?,
            ),
            None => None,
        };

        Ok(Self {
            nodes,
            links,
            index_by_id,
            core_index,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[CatalogNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&CatalogNode> {
        self.nodes.get(index)
    }

    pub fn links(&self) -> &[CatalogLink] {
        &self.links
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn core_index(&self) -> Option<usize> {
        self.core_index
    }

    pub fn is_core(&self, index: usize) -> bool {
        self.core_index == Some(index)
    }

    pub fn count_of(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|node| node.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_is_valid() {
        let catalog = Catalog::embedded().expect("embedded catalog");
        assert_eq!(catalog.len(), 17);
        assert_eq!(catalog.links().len(), 16);
        assert_eq!(catalog.core_index(), catalog.index_of("sys-core"));
        assert!(catalog.is_core(0));
    }

    #[test]
    fn embedded_ids_are_unique() {
        let catalog = Catalog::embedded().expect("embedded catalog");
        let mut ids = catalog
            .nodes()
            .iter()
            .map(|node| node.id.as_str())
            .collect::<Vec<_>>();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn optional_fields_and_defaults_are_read() {
        let catalog = Catalog::embedded().expect("embedded catalog");
        let cod = catalog
            .node(catalog.index_of("thought-cod").expect("cod"))
            .expect("node");
        assert_eq!(cod.kind, NodeKind::Thought);
        assert_eq!(cod.read_time.as_deref(), Some("6 min read"));
        assert_eq!(cod.tags, ["identity", "growth", "personal"]);
        assert_eq!(cod.val, 2.0);

        let raw = r#"{ "nodes": [{ "id": "a", "label": "A", "type": "SIGNAL" }] }"#;
        let minimal = Catalog::from_json(raw).expect("minimal catalog");
        let node = minimal.node(0).expect("node");
        assert_eq!(node.val, 1.0);
        assert!(node.tags.is_empty());
        assert!(minimal.core_index().is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let raw = r#"{ "nodes": [
            { "id": "a", "label": "A", "type": "DATA" },
            { "id": "a", "label": "again", "type": "THOUGHT" }
        ] }"#;
        let error = Catalog::from_json(raw).expect_err("duplicate id");
        assert!(matches!(error, CatalogError::DuplicateNodeId(id) if id == "a"));
    }

    #[test]
    fn dangling_link_is_rejected() {
        let raw = r#"{
            "nodes": [{ "id": "a", "label": "A", "type": "DATA" }],
            "links": [{ "source": "a", "target": "ghost", "value": 1 }]
        }"#;
        let error = Catalog::from_json(raw).expect_err("dangling link");
        assert!(matches!(
            error,
            CatalogError::UnknownLinkEndpoint { link: 0, ref id } if id == "ghost"
        ));
    }

    #[test]
    fn self_link_unknown_core_and_bad_weights_are_rejected() {
        let self_link = r#"{
            "nodes": [{ "id": "a", "label": "A", "type": "DATA" }],
            "links": [{ "source": "a", "target": "a" }]
        }"#;
        assert!(matches!(
            Catalog::from_json(self_link),
            Err(CatalogError::SelfLink { .. })
        ));

        let missing_core = r#"{ "core": "me", "nodes": [] }"#;
        assert!(matches!(
            Catalog::from_json(missing_core),
            Err(CatalogError::UnknownCoreNode(id)) if id == "me"
        ));

        let zero_val = r#"{ "nodes": [{ "id": "a", "label": "A", "type": "DATA", "val": 0 }] }"#;
        assert!(matches!(
            Catalog::from_json(zero_val),
            Err(CatalogError::InvalidWeight { what: "val", .. })
        ));
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let raw = r#"{ "nodes": [{ "id": "a", "label": "A", "type": "PLANET" }] }"#;
        assert!(matches!(Catalog::from_json(raw), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn empty_catalog_is_valid() {
        let catalog = Catalog::from_json("{}").expect("empty catalog");
        assert!(catalog.is_empty());
        assert_eq!(catalog.count_of(NodeKind::System), 0);
    }
}

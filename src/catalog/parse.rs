use serde::Deserialize;

use super::graph::NodeKind;

fn default_weight() -> f32 {
    1.0
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawNode {
    pub(super) id: String,
    pub(super) label: String,
    #[serde(rename = "type")]
    pub(super) kind: NodeKind,
    #[serde(default)]
    pub(super) description: String,
    #[serde(default)]
    pub(super) content: Option<String>,
    #[serde(default)]
    pub(super) url: Option<String>,
    #[serde(default)]
    pub(super) date: Option<String>,
    #[serde(default)]
    pub(super) tags: Vec<String>,
    #[serde(default)]
    pub(super) img: Option<String>,
    #[serde(default)]
    pub(super) language: Option<String>,
    #[serde(default)]
    pub(super) stars: Option<u32>,
    #[serde(default)]
    pub(super) read_time: Option<String>,
    #[serde(default = "default_weight")]
    pub(super) val: f32,
    #[serde(default)]
    pub(super) pinned: Option<[f32; 2]>,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawLink {
    pub(super) source: String,
    pub(super) target: String,
    #[serde(default = "default_weight")]
    pub(super) value: f32,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawCatalog {
    #[serde(default)]
    pub(super) core: Option<String>,
    #[serde(default)]
    pub(super) nodes: Vec<RawNode>,
    #[serde(default)]
    pub(super) links: Vec<RawLink>,
}

pub(super) fn parse_catalog(raw: &str) -> Result<RawCatalog, serde_json::Error> {
    serde_json::from_str(raw)
}

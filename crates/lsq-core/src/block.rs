//! Block type: a node of hierarchical page content.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::page::EntityRef;

/// A block as returned by the Logseq API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    // === Identity ===
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, alias = "block/uuid", skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    #[serde(default, alias = "block/content", deserialize_with = "string_or_null")]
    pub content: String,

    // === Ownership ===
    #[serde(
        default,
        alias = "block/parent",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent: Option<EntityRef>,
    #[serde(default, alias = "block/page", skip_serializing_if = "Option::is_none")]
    pub page: Option<EntityRef>,
    #[serde(default, alias = "block/left", skip_serializing_if = "Option::is_none")]
    pub left: Option<EntityRef>,

    #[serde(
        default,
        alias = "block/properties",
        skip_serializing_if = "Option::is_none"
    )]
    pub properties: Option<BTreeMap<String, serde_json::Value>>,

    #[serde(
        default,
        alias = "block/children",
        deserialize_with = "children_or_null",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<BlockChild>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A child slot of a block.
///
/// Logseq expands children into full blocks only when asked to; otherwise a
/// child is a `["uuid", "<uuid>"]` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockChild {
    Ref(String, serde_json::Value),
    Block(Box<Block>),
}

impl Block {
    /// Convenience constructor, mostly for tests and fixtures.
    #[must_use]
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children
            .into_iter()
            .map(|b| BlockChild::Block(Box::new(b)))
            .collect();
        self
    }

    /// True when the block carries no visible text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Children that were expanded into full blocks, in order.
    pub fn expanded_children(&self) -> impl Iterator<Item = &Block> {
        self.children.iter().filter_map(|child| match child {
            BlockChild::Block(block) => Some(block.as_ref()),
            BlockChild::Ref(..) => None,
        })
    }
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn children_or_null<'de, D>(deserializer: D) -> Result<Vec<BlockChild>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<BlockChild>>::deserialize(deserializer)?.unwrap_or_default())
}

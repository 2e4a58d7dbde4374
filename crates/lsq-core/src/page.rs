//! Page type: a named document in the Logseq graph.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A page as returned by the Logseq API.
///
/// Logseq replies use camelCase keys, while datascript pulls come back
/// kebab-cased or still namespaced, so every renamed field accepts all three.
/// Fields the bridge does not interpret are kept in `extra` so JSON dumps
/// show the page exactly as Logseq described it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    // === Identity ===
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, alias = "block/uuid", skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, alias = "block/name")]
    pub name: String,
    #[serde(
        default,
        alias = "original-name",
        alias = "block/original-name",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_name: Option<String>,

    // === Journal ===
    #[serde(
        rename = "journal?",
        alias = "journal",
        alias = "block/journal?",
        default
    )]
    pub journal: bool,
    #[serde(
        default,
        alias = "journal-day",
        alias = "block/journal-day",
        skip_serializing_if = "Option::is_none"
    )]
    pub journal_day: Option<i64>,

    // === Metadata ===
    #[serde(
        default,
        alias = "block/namespace",
        skip_serializing_if = "Option::is_none"
    )]
    pub namespace: Option<EntityRef>,
    #[serde(
        default,
        alias = "block/properties",
        skip_serializing_if = "Option::is_none"
    )]
    pub properties: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(
        default,
        alias = "block/format",
        skip_serializing_if = "Option::is_none"
    )]
    pub format: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Page {
    /// Name as the user typed it, falling back to the lower-cased key.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.original_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.name)
    }

    /// Journal day as `YYYY-MM-DD`, when the page is a journal page.
    #[must_use]
    pub fn journal_date(&self) -> Option<String> {
        let day = self.journal_day?;
        if day <= 0 {
            return None;
        }
        Some(format!(
            "{:04}-{:02}-{:02}",
            day / 10_000,
            (day / 100) % 100,
            day % 100
        ))
    }
}

/// Reference from one entity to another.
///
/// Usually just `{"id": 42}`, but pulls and some API calls expand a few
/// identifying fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, alias = "block/uuid", skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, alias = "block/name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        alias = "original-name",
        alias = "block/original-name",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_name: Option<String>,
}

impl EntityRef {
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.original_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.name.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_api_page_and_keeps_unknown_fields() {
        let page: Page = serde_json::from_value(json!({
            "id": 12,
            "uuid": "65a1b2c3-0000-4000-8000-000000000001",
            "name": "project alpha",
            "originalName": "Project Alpha",
            "journal?": false,
            "namespace": {"id": 3},
            "properties": {"status": "active"},
            "format": "markdown",
            "updatedAt": 1700000000000_i64
        }))
        .unwrap();

        assert_eq!(page.display_name(), "Project Alpha");
        assert!(!page.journal);
        assert_eq!(page.namespace.as_ref().and_then(|n| n.id), Some(3));
        assert_eq!(page.extra["updatedAt"], json!(1700000000000_i64));

        let back = serde_json::to_value(&page).unwrap();
        assert_eq!(back["originalName"], "Project Alpha");
        assert_eq!(back["updatedAt"], json!(1700000000000_i64));
    }

    #[test]
    fn decodes_datascript_pull_spelling() {
        let page: Page = serde_json::from_value(json!({
            "block/name": "jan 15th, 2024",
            "block/original-name": "Jan 15th, 2024",
            "block/journal?": true,
            "block/journal-day": 20240115
        }))
        .unwrap();

        assert!(page.journal);
        assert_eq!(page.display_name(), "Jan 15th, 2024");
        assert_eq!(page.journal_date().as_deref(), Some("2024-01-15"));
    }

    #[test]
    fn display_name_falls_back_to_name() {
        let page = Page {
            name: "inbox".to_string(),
            original_name: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(page.display_name(), "inbox");
        assert_eq!(page.journal_date(), None);
    }
}

//! Parameter structs for every operation, with defaults and validation.
//!
//! All structs derive `Deserialize + JsonSchema`: serde rejects missing,
//! unknown, and mistyped fields, the schema is what MCP clients see, and
//! [`Validate`] checks the ranges and content rules serde cannot express.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::marker::PhantomData;

use chrono::{Datelike, NaiveDate};
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use lsq_core::error::ValidationError;

/// Content and range checks beyond what deserialization enforces.
pub trait Validate {
    /// # Errors
    ///
    /// Returns the first violated constraint.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Decode raw arguments into `T` without range checks.
///
/// A JSON `null` is treated as an empty argument object.
///
/// # Errors
///
/// Returns [`ValidationError::Shape`] for missing, unknown, or mistyped fields.
pub fn decode<T: DeserializeOwned>(args: Value) -> Result<T, ValidationError> {
    let args = match args {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    serde_json::from_value(args).map_err(|e| ValidationError::Shape(e.to_string()))
}

/// Decode and validate raw arguments.
///
/// # Errors
///
/// Returns the first shape or constraint violation.
pub fn parse<T: DeserializeOwned + Validate>(args: Value) -> Result<T, ValidationError> {
    let params: T = decode(args)?;
    params.validate()?;
    Ok(params)
}

/// Undecoded tool arguments that publish the JSON schema of `T`.
///
/// Deserializing never fails, so shape errors surface from [`decode`] as a
/// [`ValidationError`] instead of a protocol-level rejection.
#[derive(Debug, Clone)]
pub struct RawArgs<T> {
    raw: Value,
    _marker: PhantomData<fn() -> T>,
}

impl<T> RawArgs<T> {
    pub fn into_value(self) -> Value {
        self.raw
    }
}

impl<'de, T> Deserialize<'de> for RawArgs<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|raw| Self {
            raw,
            _marker: PhantomData,
        })
    }
}

impl<T: JsonSchema> JsonSchema for RawArgs<T> {
    fn inline_schema() -> bool {
        T::inline_schema()
    }

    fn schema_name() -> Cow<'static, str> {
        T::schema_name()
    }

    fn schema_id() -> Cow<'static, str> {
        T::schema_id()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        T::json_schema(generator)
    }
}

// === Pages ===

/// Parameters for `list_pages`.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListPagesRequest {
    /// Maximum pages to return (1-500, default: 50)
    #[serde(default = "default_page_limit")]
    #[schemars(range(min = 1, max = 500))]
    pub limit: u32,
    /// Number of pages to skip, for pagination (default: 0)
    #[serde(default)]
    pub offset: u32,
    /// Include journal pages in the listing (default: false)
    #[serde(default)]
    pub include_journals: bool,
}

impl Validate for ListPagesRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_range("limit", self.limit, 1, 500)
    }
}

/// Parameters for operations addressing one page by name.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PageRequest {
    /// Page name (case-insensitive) or page UUID
    #[schemars(length(min = 1))]
    pub name: String,
}

impl Validate for PageRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("name", &self.name)
    }
}

/// File format of a new page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    Markdown,
    Org,
}

impl PageFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Org => "org",
        }
    }
}

/// Parameters for `create_page`.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CreatePageRequest {
    /// Name of the new page
    #[schemars(length(min = 1))]
    pub name: String,
    /// Page properties, e.g. {"tags": "project", "status": "active"}
    #[serde(default)]
    pub properties: Option<BTreeMap<String, Value>>,
    /// Text of a first block to add to the page
    #[serde(default)]
    pub content: Option<String>,
    /// File format: markdown or org (default: the graph's preferred format)
    #[serde(default)]
    pub format: Option<PageFormat>,
    /// Create the page as a journal page (default: false)
    #[serde(default)]
    pub journal: bool,
}

impl Validate for CreatePageRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("name", &self.name)?;
        if let Some(content) = &self.content {
            require_non_empty("content", content)?;
        }
        Ok(())
    }
}

/// Parameters for `rename_page`.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RenamePageRequest {
    /// Current page name
    #[schemars(length(min = 1))]
    pub old_name: String,
    /// New page name
    #[schemars(length(min = 1))]
    pub new_name: String,
}

impl Validate for RenamePageRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("old_name", &self.old_name)?;
        require_non_empty("new_name", &self.new_name)?;
        if self.old_name.trim() == self.new_name.trim() {
            return Err(ValidationError::Invalid {
                field: "new_name",
                reason: "must differ from old_name".to_string(),
            });
        }
        Ok(())
    }
}

// === Blocks ===

/// Parameters for `get_block`.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetBlockRequest {
    /// Block UUID
    pub uuid: String,
    /// Expand the block's children recursively (default: true)
    #[serde(default = "default_true")]
    pub include_children: bool,
}

impl Validate for GetBlockRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_uuid("uuid", &self.uuid)
    }
}

/// Parameters for operations addressing one block by UUID.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BlockRequest {
    /// Block UUID
    pub uuid: String,
}

impl Validate for BlockRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_uuid("uuid", &self.uuid)
    }
}

/// Parameters for `insert_block`.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct InsertBlockRequest {
    /// Page name or block UUID to insert relative to
    #[schemars(length(min = 1))]
    pub target: String,
    /// Block text (Markdown, may contain [[links]] and #tags)
    #[schemars(length(min = 1))]
    pub content: String,
    /// Insert as a sibling of the target block instead of as a child (default: false)
    #[serde(default)]
    pub sibling: bool,
    /// Insert before the target instead of after it (default: false)
    #[serde(default)]
    pub before: bool,
    /// Block properties, e.g. {"priority": "high"}
    #[serde(default)]
    pub properties: Option<BTreeMap<String, Value>>,
}

impl Validate for InsertBlockRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("target", &self.target)?;
        require_non_empty("content", &self.content)
    }
}

/// Parameters for `update_block`.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateBlockRequest {
    /// Block UUID
    pub uuid: String,
    /// Replacement block text
    pub content: String,
    /// Block properties to set
    #[serde(default)]
    pub properties: Option<BTreeMap<String, Value>>,
}

impl Validate for UpdateBlockRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_uuid("uuid", &self.uuid)
    }
}

/// Parameters for `move_block`.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MoveBlockRequest {
    /// UUID of the block to move
    pub uuid: String,
    /// UUID of the block to move next to (or under)
    pub target_uuid: String,
    /// Place before the target instead of after it (default: false)
    #[serde(default)]
    pub before: bool,
    /// Place as the target's first child (default: false)
    #[serde(default)]
    pub as_child: bool,
}

impl Validate for MoveBlockRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_uuid("uuid", &self.uuid)?;
        require_uuid("target_uuid", &self.target_uuid)?;
        let (uuid, target) = (self.uuid.trim(), self.target_uuid.trim());
        if uuid.eq_ignore_ascii_case(target) {
            return Err(ValidationError::Invalid {
                field: "target_uuid",
                reason: "a block cannot be moved relative to itself".to_string(),
            });
        }
        if self.before && self.as_child {
            return Err(ValidationError::Invalid {
                field: "before",
                reason: "cannot be combined with as_child".to_string(),
            });
        }
        Ok(())
    }
}

// === Search, journals, tags ===

/// Parameters for `search`.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SearchRequest {
    /// Text to look for in block content (case-sensitive)
    #[schemars(length(min = 1))]
    pub query: String,
    /// Maximum results to return (1-100, default: 20)
    #[serde(default = "default_search_limit")]
    #[schemars(range(min = 1, max = 100))]
    pub limit: u32,
}

impl Validate for SearchRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("query", &self.query)?;
        require_range("limit", self.limit, 1, 100)
    }
}

/// Parameters for `list_journals`.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListJournalsRequest {
    /// Maximum journal pages to return, newest first (1-365, default: 30)
    #[serde(default = "default_journal_limit")]
    #[schemars(range(min = 1, max = 365))]
    pub limit: u32,
}

impl Validate for ListJournalsRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_range("limit", self.limit, 1, 365)
    }
}

/// Parameters for `get_journal`.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetJournalRequest {
    /// Journal date as YYYY-MM-DD
    pub date: String,
}

impl GetJournalRequest {
    /// The date as Logseq's integer journal day (`YYYYMMDD`).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDate`] if `date` is not a calendar date.
    pub fn journal_day(&self) -> Result<i64, ValidationError> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").map_err(|_| {
            ValidationError::InvalidDate {
                field: "date",
                value: self.date.clone(),
            }
        })?;
        let year = i64::from(date.year());
        let month_day = i64::from(date.month() * 100 + date.day());
        Ok(year * 10_000 + month_day)
    }
}

impl Validate for GetJournalRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        self.journal_day().map(|_| ())
    }
}

/// Parameters for `list_tags`.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListTagsRequest {
    /// Maximum tags to return (1-500, default: 100)
    #[serde(default = "default_tag_limit")]
    #[schemars(range(min = 1, max = 500))]
    pub limit: u32,
}

impl Validate for ListTagsRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_range("limit", self.limit, 1, 500)
    }
}

/// Parameters for `get_pages_by_tag`.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PagesByTagRequest {
    /// Tag name, with or without the leading '#'
    #[schemars(length(min = 1))]
    pub tag: String,
    /// Maximum pages to return (1-500, default: 50)
    #[serde(default = "default_page_limit")]
    #[schemars(range(min = 1, max = 500))]
    pub limit: u32,
}

impl PagesByTagRequest {
    /// Tag name without surrounding whitespace or a leading `#`.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        self.tag.trim().trim_start_matches('#')
    }
}

impl Validate for PagesByTagRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("tag", self.tag_name())?;
        require_range("limit", self.limit, 1, 500)
    }
}

// === Defaults and checks ===

fn default_page_limit() -> u32 {
    50
}

fn default_search_limit() -> u32 {
    20
}

fn default_journal_limit() -> u32 {
    30
}

fn default_tag_limit() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

fn require_range(
    field: &'static str,
    value: u32,
    min: u32,
    max: u32,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            min: u64::from(min),
            max: u64::from(max),
            value: u64::from(value),
        });
    }
    Ok(())
}

fn require_uuid(field: &'static str, value: &str) -> Result<(), ValidationError> {
    uuid::Uuid::parse_str(value.trim())
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidUuid {
            field,
            value: value.to_string(),
        })
}

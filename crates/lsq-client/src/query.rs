//! Datascript query builders.
//!
//! Search, journal lookup, and tag listing have no dedicated Logseq API
//! method, so they go through `logseq.DB.datascriptQuery`. User input only
//! ever enters a query as an escaped string literal.

/// Escape `s` for use inside a double-quoted EDN string.
#[must_use]
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Blocks whose content contains `needle` (case-sensitive), with the owning
/// page's names pulled alongside.
#[must_use]
pub fn content_search(needle: &str) -> String {
    format!(
        "[:find (pull ?b [:db/id :block/uuid :block/content \
         {{:block/page [:db/id :block/name :block/original-name]}}]) \
         :where [?b :block/content ?c] \
         [(clojure.string/includes? ?c \"{}\")]]",
        escape(needle)
    )
}

/// The page whose journal day is `day` (`YYYYMMDD`).
#[must_use]
pub fn journal_by_day(day: i64) -> String {
    format!("[:find (pull ?p [*]) :where [?p :block/journal-day {day}]]")
}

/// Every page used as a tag by at least one other page.
#[must_use]
pub fn all_tags() -> &'static str {
    "[:find (pull ?t [:db/id :block/name :block/original-name]) \
     :where [?p :block/tags ?t]]"
}

/// Pages tagged with `tag`. Logseq stores `:block/name` lower-cased.
#[must_use]
pub fn pages_by_tag(tag: &str) -> String {
    format!(
        "[:find (pull ?p [*]) \
         :where [?t :block/name \"{}\"] [?p :block/tags ?t]]",
        escape(&tag.trim().to_lowercase())
    )
}

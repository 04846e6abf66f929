//! Selector candidate table: ordered structural probes per logical field.
//!
//! Feed markup is third-party and unversioned, so every field maps to a
//! *list* of candidate CSS probes rather than a single selector. Order
//! encodes preference; how the list is consumed (first-match vs
//! longest-match) is the extractor's policy, not the table's. Markup-drift
//! fixes are edits to this data, not to the traversal code.
//!
//! The default table is embedded at compile time so there is no runtime
//! file I/O; an external JSON file with the same shape can override it.

use crate::error::TrawlError;
use serde::Deserialize;

/// Default probe configuration, embedded at compile time.
const PROBES_JSON: &str = include_str!("probes.json");

/// The logical fields the extractor resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// One rendered feed item.
    ItemContainer,
    /// The post body text.
    Body,
    /// The displayed post time.
    Date,
    /// The displayed reaction count.
    Reactions,
    /// The displayed comment summary.
    Comments,
    /// The displayed repost summary.
    Reposts,
}

impl Field {
    /// Stable name used in errors and logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::ItemContainer => "item_container",
            Self::Body => "body",
            Self::Date => "date",
            Self::Reactions => "reactions",
            Self::Comments => "comments",
            Self::Reposts => "reposts",
        }
    }
}

/// Immutable mapping from field to its ordered probe candidates.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeTable {
    /// Attribute on the item container carrying the opaque identifier.
    identifier_attribute: String,
    item_container: Vec<String>,
    body: Vec<String>,
    date: Vec<String>,
    reactions: Vec<String>,
    comments: Vec<String>,
    reposts: Vec<String>,
}

impl ProbeTable {
    /// The built-in table.
    ///
    /// The embedded JSON is validated in tests; a malformed build would be
    /// caught before it ships, so parsing here is infallible in practice.
    pub fn builtin() -> Self {
        Self::from_json(PROBES_JSON).expect("embedded probe table is valid")
    }

    /// Parse and validate a table from JSON. Fails if the document is
    /// malformed or any field's candidate list is empty — an empty list
    /// would silently disable a field, so it is rejected at construction,
    /// once, rather than discovered per use.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let table: Self = serde_json::from_str(json)?;
        for field in [
            Field::ItemContainer,
            Field::Body,
            Field::Date,
            Field::Reactions,
            Field::Comments,
            Field::Reposts,
        ] {
            if table.probes(field).is_empty() {
                return Err(TrawlError::EmptyProbeList {
                    field: field.name(),
                }
                .into());
            }
        }
        if table.identifier_attribute.trim().is_empty() {
            return Err(TrawlError::EmptyProbeList {
                field: "identifier_attribute",
            }
            .into());
        }
        Ok(table)
    }

    /// Ordered probe candidates for a field, most-preferred first.
    pub fn probes(&self, field: Field) -> &[String] {
        match field {
            Field::ItemContainer => &self.item_container,
            Field::Body => &self.body,
            Field::Date => &self.date,
            Field::Reactions => &self.reactions,
            Field::Comments => &self.comments,
            Field::Reposts => &self.reposts,
        }
    }

    /// Name of the attribute carrying the opaque item identifier.
    pub fn identifier_attribute(&self) -> &str {
        &self.identifier_attribute
    }
}

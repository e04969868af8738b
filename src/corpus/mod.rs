//! Loading the license corpus and its schema.
//!
//! - [`ContentSource`] — the site that owns the documents and data files.
//! - [`site`] — a [`ContentSource`] reading a site directory from disk.
//! - [`schema`] — the rule groups and field names records are checked against.

pub mod schema;
pub mod site;

use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Context};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::models::LicenseRecord;

pub use schema::{load_fields, load_rules, FieldSet, Rule, Ruleset};
pub use site::SiteDir;

/// Collection the license documents live in.
pub const LICENSES_COLLECTION: &str = "licenses";

/// Front matter keys holding rule tag lists.
pub const RULE_GROUPS: [&str; 3] = ["permissions", "conditions", "limitations"];

const IDENTIFIER_KEY: &str = "spdx-id";
const TITLE_KEY: &str = "title";
const HIDDEN_KEY: &str = "hidden";

/// A document of a site collection, reduced to plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// File name without extension.
    pub basename: String,
    pub front_matter: Map<String, Value>,
}

/// Queryable site content the corpus is read from.
pub trait ContentSource {
    /// Every document of `collection`, in a stable order.
    fn documents(&self, collection: &str) -> anyhow::Result<Vec<Document>>;

    /// A named data section, or `None` if the site has no such section.
    fn data(&self, section: &str) -> anyhow::Result<Option<Value>>;
}

/// Load every license document as a [`LicenseRecord`]; hidden ones included.
pub fn load_corpus<S: ContentSource + ?Sized>(source: &S) -> Result<Vec<LicenseRecord>> {
    let records = source
        .documents(LICENSES_COLLECTION)?
        .into_iter()
        .map(|doc| {
            let basename = doc.basename.clone();
            record_from_document(doc).with_context(|| format!("license document `{}`", basename))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    tracing::debug!(licenses = records.len(), "loaded license corpus");
    Ok(records)
}

/// Records not flagged `hidden`.
pub fn shown(records: &[LicenseRecord]) -> Vec<&LicenseRecord> {
    records.iter().filter(|r| !r.hidden).collect()
}

fn record_from_document(doc: Document) -> anyhow::Result<LicenseRecord> {
    let mut front_matter = doc.front_matter;

    let identifier = take_string(&mut front_matter, IDENTIFIER_KEY)?;
    let title = take_string(&mut front_matter, TITLE_KEY)?;
    let hidden = match front_matter.remove(HIDDEN_KEY) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(other) => bail!("`{}` must be a boolean, found {}", HIDDEN_KEY, other),
    };

    let mut rules = BTreeMap::new();
    for group in RULE_GROUPS {
        let tags = match front_matter.remove(group) {
            None | Some(Value::Null) => continue,
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(tag) => Ok(tag),
                    other => Err(anyhow!("`{}` entries must be strings, found {}", group, other)),
                })
                .collect::<anyhow::Result<Vec<_>>>()?,
            Some(other) => bail!("`{}` must be a list of tags, found {}", group, other),
        };
        rules.insert(group.to_string(), tags);
    }

    Ok(LicenseRecord {
        identifier,
        title,
        hidden,
        spdx_lcase: doc.basename,
        rules,
        fields: front_matter.into_iter().collect(),
    })
}

fn take_string(front_matter: &mut Map<String, Value>, key: &str) -> anyhow::Result<String> {
    match front_matter.remove(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s),
        Some(other) => bail!("`{}` must be a non-empty string, found {}", key, other),
        None => bail!("missing `{}`", key),
    }
}

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ContentSource;
use crate::error::{Error, Result};

/// A rule tag definition from the `rules` data section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub tag: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
}

/// Rule group name → rules defined in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ruleset {
    groups: BTreeMap<String, Vec<Rule>>,
}

impl Ruleset {
    pub fn new(groups: BTreeMap<String, Vec<Rule>>) -> Self {
        Self { groups }
    }

    /// Whether `group` defines `tag`.
    ///
    /// A tag missing from an existing group is `Ok(false)`; a missing group is
    /// [`Error::UnknownGroup`].
    pub fn rule(&self, tag: &str, group: &str) -> Result<bool> {
        let rules = self.groups.get(group).ok_or_else(|| Error::UnknownGroup {
            group: group.to_string(),
        })?;
        Ok(rules.iter().any(|r| r.tag == tag))
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn rules(&self, group: &str) -> Option<&[Rule]> {
        self.groups.get(group).map(Vec::as_slice)
    }
}

#[derive(Debug, Deserialize)]
struct FieldDef {
    name: String,
}

/// Names of the metadata fields a record may declare.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    names: BTreeSet<String>,
}

impl FieldSet {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FieldSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Load the `rules` data section.
pub fn load_rules<S: ContentSource + ?Sized>(source: &S) -> Result<Ruleset> {
    let data = required_section(source, "rules")?;
    let groups: BTreeMap<String, Vec<Rule>> =
        serde_json::from_value(data).context("data section `rules`")?;
    Ok(Ruleset::new(groups))
}

/// Load field names from the `fields` section plus the optional `meta` section.
pub fn load_fields<S: ContentSource + ?Sized>(source: &S) -> Result<FieldSet> {
    let mut names = field_names("fields", required_section(source, "fields")?)?;
    if let Some(meta) = source.data("meta")? {
        names.extend(field_names("meta", meta)?);
    }
    Ok(names.into_iter().collect())
}

fn required_section<S: ContentSource + ?Sized>(source: &S, section: &str) -> Result<Value> {
    Ok(source
        .data(section)?
        .ok_or_else(|| anyhow!("missing data section `{}`", section))?)
}

fn field_names(section: &str, data: Value) -> Result<Vec<String>> {
    let defs: Vec<FieldDef> =
        serde_json::from_value(data).with_context(|| format!("data section `{}`", section))?;
    Ok(defs.into_iter().map(|d| d.name).collect())
}

use std::collections::BTreeSet;

use crate::authority::{ApprovalList, Transport};
use crate::cache::AuthorityCache;
use crate::corpus::{FieldSet, Ruleset};
use crate::error::Result;
use crate::models::{Authority, Discrepancy, LicenseRecord};
use crate::normalize::normalize;

/// Joins the authority lists held by an [`AuthorityCache`] against the corpus.
pub struct Reconciler<T> {
    cache: AuthorityCache<T>,
}

impl<T: Transport> Reconciler<T> {
    pub fn new(cache: AuthorityCache<T>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &AuthorityCache<T> {
        &self.cache
    }

    /// Whether `authority` lists `record`, by identifier or else by title.
    pub async fn recognizes(&self, record: &LicenseRecord, authority: Authority) -> Result<bool> {
        let list = self.cache.get_or_fetch(authority).await?;
        Ok(list.lookup(record).is_some())
    }

    /// Every key approved by at least one authority, sorted and de-duplicated.
    pub async fn approved_licenses(&self) -> Result<Vec<String>> {
        let mut keys = BTreeSet::new();
        for authority in Authority::ALL {
            let list = self.cache.get_or_fetch(authority).await?;
            keys.extend(list.keys().map(str::to_string));
        }
        Ok(keys.into_iter().collect())
    }

    /// Check every record against the schema and the three authorities.
    ///
    /// All sources are fetched before any record is looked at; a failing
    /// source fails the whole pass.
    pub async fn verify(
        &self,
        records: &[LicenseRecord],
        rules: &Ruleset,
        fields: &FieldSet,
    ) -> Result<Vec<Discrepancy>> {
        self.cache.prefetch().await?;

        let catalog = self.cache.spdx_catalog().await?;
        let mut lists: Vec<&ApprovalList> = Vec::with_capacity(Authority::ALL.len());
        for authority in Authority::ALL {
            lists.push(self.cache.get_or_fetch(authority).await?);
        }

        let mut found = Vec::new();
        for record in records {
            check_schema(record, rules, fields, &mut found)?;

            if catalog.find(&record.identifier).is_none() {
                found.push(Discrepancy::UnknownIdentifier {
                    license: record.identifier.clone(),
                });
            }

            if !record.spdx_lcase.is_empty() && record.spdx_lcase != normalize(&record.identifier) {
                found.push(Discrepancy::FilenameMismatch {
                    license: record.identifier.clone(),
                    spdx_lcase: record.spdx_lcase.clone(),
                });
            }

            let mut recognized_by_any = false;
            for list in &lists {
                let recognized = list.lookup(record).is_some();
                recognized_by_any |= recognized;

                let authority = list.authority();
                if let Some(declared) = record.declared_approval(authority) {
                    if declared != recognized {
                        found.push(Discrepancy::ApprovalMismatch {
                            license: record.identifier.clone(),
                            authority,
                            declared,
                            recognized,
                        });
                    }
                }
            }

            if !record.hidden && !recognized_by_any {
                found.push(Discrepancy::Unapproved {
                    license: record.identifier.clone(),
                });
            }
        }

        tracing::info!(
            licenses = records.len(),
            discrepancies = found.len(),
            "verification pass complete"
        );
        Ok(found)
    }
}

/// Rule tags and metadata fields a record uses but the schema does not define.
fn check_schema(
    record: &LicenseRecord,
    rules: &Ruleset,
    fields: &FieldSet,
    found: &mut Vec<Discrepancy>,
) -> Result<()> {
    for (group, tags) in &record.rules {
        let mut seen = BTreeSet::new();
        for tag in tags {
            if seen.insert(tag.as_str()) && !rules.rule(tag, group)? {
                found.push(Discrepancy::UnknownRuleTag {
                    license: record.identifier.clone(),
                    group: group.clone(),
                    tag: tag.clone(),
                });
            }
        }
    }

    for field in record.fields.keys() {
        if !fields.contains(field) {
            found.push(Discrepancy::UnknownField {
                license: record.identifier.clone(),
                field: field.clone(),
            });
        }
    }

    Ok(())
}

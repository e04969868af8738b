use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{ApprovalList, Transport};
use crate::error::{Error, Result};
use crate::models::{Authority, Source};
use crate::normalize::normalize;

pub const SPDX_LICENSES_URL: &str = "https://spdx.org/licenses/licenses.json";

#[derive(Debug, Deserialize)]
struct LicenseList {
    licenses: Vec<SpdxLicense>,
}

/// One entry of the SPDX license list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxLicense {
    pub license_id: String,
    pub name: String,
    pub is_osi_approved: bool,
    /// Remaining properties (`reference`, `seeAlso`, `isDeprecatedLicenseId`, ...).
    #[serde(flatten)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

/// The SPDX license list keyed by `licenseId` as published.
///
/// This is the one place that answers "does this identifier exist at all".
#[derive(Debug, Clone)]
pub struct SpdxCatalog {
    licenses: Vec<SpdxLicense>,
    by_id: HashMap<String, usize>,
    by_key: HashMap<String, usize>,
}

impl SpdxCatalog {
    fn new(list: Vec<SpdxLicense>) -> Self {
        let mut licenses = Vec::with_capacity(list.len());
        let mut by_id = HashMap::new();
        let mut by_key = HashMap::new();

        for license in list {
            if by_id.contains_key(&license.license_id) {
                continue;
            }
            let idx = licenses.len();
            by_id.insert(license.license_id.clone(), idx);
            by_key.entry(normalize(&license.license_id)).or_insert(idx);
            licenses.push(license);
        }

        Self {
            licenses,
            by_id,
            by_key,
        }
    }

    /// Exact lookup by `licenseId`, preserving source casing.
    pub fn get(&self, license_id: &str) -> Option<&SpdxLicense> {
        self.by_id.get(license_id).map(|&i| &self.licenses[i])
    }

    /// Case-insensitive lookup.
    pub fn find(&self, id: &str) -> Option<&SpdxLicense> {
        self.by_key.get(&normalize(id)).map(|&i| &self.licenses[i])
    }

    /// Every `licenseId`, in list order.
    pub fn all_ids(&self) -> Vec<&str> {
        self.licenses.iter().map(|l| l.license_id.as_str()).collect()
    }

    /// OSI-approved licenses, keyed by lowercased `licenseId` → `name`.
    pub fn osi_approved(&self) -> ApprovalList {
        let mut list = ApprovalList::new(Authority::Osi);
        for license in self.licenses.iter().filter(|l| l.is_osi_approved) {
            list.insert(&license.license_id, &license.name);
        }
        list
    }

    pub fn len(&self) -> usize {
        self.licenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.licenses.is_empty()
    }
}

/// Fetch and parse the SPDX license list.
pub async fn fetch_catalog<T: Transport>(transport: &T, url: &str) -> Result<SpdxCatalog> {
    let body = transport.get(url).await.map_err(|cause| Error::Fetch {
        origin: Source::Spdx,
        cause,
    })?;
    parse_catalog(&body)
}

pub fn parse_catalog(body: &str) -> Result<SpdxCatalog> {
    let list: LicenseList =
        serde_json::from_str(body).map_err(|e| Error::parse(Source::Spdx, e))?;
    let catalog = SpdxCatalog::new(list.licenses);
    tracing::debug!(licenses = catalog.len(), "parsed SPDX license list");
    Ok(catalog)
}

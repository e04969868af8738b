use std::collections::BTreeMap;

use serde::Deserialize;

use super::{ApprovalList, Transport};
use crate::error::{Error, Result};
use crate::models::{Authority, Source};

pub const OD_LICENSES_URL: &str = "http://licenses.opendefinition.org/licenses/groups/od.json";

#[derive(Debug, Deserialize)]
struct OdLicense {
    title: String,
}

/// Fetch and parse the Open Definition conformant license group.
pub async fn fetch_open_definition<T: Transport>(transport: &T, url: &str) -> Result<ApprovalList> {
    let body = transport.get(url).await.map_err(|cause| Error::Fetch {
        origin: Source::OpenDefinition,
        cause,
    })?;
    parse_open_definition(&body)
}

/// Parse `{ "<id>": { "title": ..., ... }, ... }` into id → title.
pub fn parse_open_definition(body: &str) -> Result<ApprovalList> {
    let data: BTreeMap<String, OdLicense> =
        serde_json::from_str(body).map_err(|e| Error::parse(Source::OpenDefinition, e))?;

    let mut list = ApprovalList::new(Authority::OpenDefinition);
    for (id, license) in &data {
        list.insert(id, &license.title);
    }

    tracing::debug!(licenses = list.len(), "parsed Open Definition list");
    Ok(list)
}

//! Run-lifetime memoization of authority lists.
//!
//! Each source sits in its own [`OnceCell`]: the first successful fetch is
//! kept for the life of the cache, concurrent first callers wait on the same
//! initialization, and a failed fetch leaves the slot empty so the next call
//! retries.

use tokio::sync::OnceCell;

use crate::authority::spdx::{self, SpdxCatalog};
use crate::authority::{fsf, open_definition, ApprovalList, HttpTransport, Transport};
use crate::config::{Config, Endpoints};
use crate::error::{Error, Result};
use crate::models::Authority;

pub struct AuthorityCache<T> {
    transport: T,
    endpoints: Endpoints,
    spdx: OnceCell<SpdxCatalog>,
    osi: OnceCell<ApprovalList>,
    fsf: OnceCell<ApprovalList>,
    open_definition: OnceCell<ApprovalList>,
}

impl AuthorityCache<HttpTransport> {
    /// Cache over a real HTTP transport configured from `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let transport = HttpTransport::new(&config.http)?;
        Ok(Self::new(transport, config.endpoints.clone()))
    }
}

impl<T: Transport> AuthorityCache<T> {
    pub fn new(transport: T, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
            spdx: OnceCell::new(),
            osi: OnceCell::new(),
            fsf: OnceCell::new(),
            open_definition: OnceCell::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The full SPDX license list.
    pub async fn spdx_catalog(&self) -> Result<&SpdxCatalog> {
        self.spdx
            .get_or_try_init(|| spdx::fetch_catalog(&self.transport, &self.endpoints.spdx))
            .await
    }

    /// The approval list of `authority`, fetched on first use.
    pub async fn get_or_fetch(&self, authority: Authority) -> Result<&ApprovalList> {
        match authority {
            Authority::Osi => {
                self.osi
                    .get_or_try_init(|| async {
                        Ok::<_, Error>(self.spdx_catalog().await?.osi_approved())
                    })
                    .await
            }
            Authority::Fsf => {
                self.fsf
                    .get_or_try_init(|| fsf::fetch_approved(&self.transport, &self.endpoints.fsf))
                    .await
            }
            Authority::OpenDefinition => {
                self.open_definition
                    .get_or_try_init(|| {
                        open_definition::fetch_open_definition(
                            &self.transport,
                            &self.endpoints.open_definition,
                        )
                    })
                    .await
            }
        }
    }

    /// Fetch every source concurrently, failing on the first error.
    pub async fn prefetch(&self) -> Result<()> {
        futures::try_join!(
            self.get_or_fetch(Authority::Osi),
            self.get_or_fetch(Authority::Fsf),
            self.get_or_fetch(Authority::OpenDefinition),
        )?;
        Ok(())
    }
}

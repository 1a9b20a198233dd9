//! Remote access to the dashboard API
//!
//! Each operation is a single attempt: no retries, no caching. Callers
//! decide what a failure means for the user.
//!
//! | Operation           | Request               |
//! |---------------------|-----------------------|
//! | fetch settings      | `GET /settings`       |
//! | push settings       | `PUT /settings`       |
//! | fetch regular links | `GET /regular-links`  |
//! | push regular links  | `PUT /regular-links`  |
//! | fetch social links  | `GET /social-links`   |
//! | push social links   | `PUT /social-links`   |

mod error;
mod http;
#[cfg(test)]
pub(crate) mod mock;
mod session;

use async_trait::async_trait;

use crate::models::{LinkCollection, RegularLink, Settings, SettingsPatch, SocialLink};

pub use error::{RemoteError, RemoteResult};
pub use http::HttpBackend;
pub use session::{CredentialSource, Session};

/// Operations the sync layer needs from the API
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch the authoritative settings document
    async fn fetch_settings(&self) -> RemoteResult<Settings>;

    /// Write the fields carried by `patch`
    async fn push_settings(&self, patch: &SettingsPatch) -> RemoteResult<()>;

    async fn fetch_regular_links(&self) -> RemoteResult<Vec<RegularLink>>;

    async fn fetch_social_links(&self) -> RemoteResult<Vec<SocialLink>>;

    /// Replace the stored regular link list
    async fn push_regular_links(&self, links: &[RegularLink]) -> RemoteResult<()>;

    /// Replace the stored social link list
    async fn push_social_links(&self, links: &[SocialLink]) -> RemoteResult<()>;

    /// Fetch both link lists concurrently
    async fn fetch_links(&self) -> RemoteResult<LinkCollection> {
        let (regular_links, social_links) =
            tokio::try_join!(self.fetch_regular_links(), self.fetch_social_links())?;
        Ok(LinkCollection {
            regular_links,
            social_links,
        })
    }

    /// Push both link lists concurrently
    ///
    /// The two lists are separate resources, so one can land while the
    /// other fails; the error of the first failure is returned.
    async fn push_links(&self, links: &LinkCollection) -> RemoteResult<()> {
        tokio::try_join!(
            self.push_regular_links(&links.regular_links),
            self.push_social_links(&links.social_links)
        )?;
        Ok(())
    }
}

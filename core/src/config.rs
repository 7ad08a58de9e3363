//! Client configuration.
//!
//! Purely programmatic: the library reads no files and no environment
//! variables. Hosts that want those build a `ClientConfig` themselves.

use std::time::Duration;

/// Production endpoint of the postcodes.io API.
pub const DEFAULT_BASE_URL: &str = "https://api.postcodes.io";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_USER_AGENT: &str = concat!("postcodes-core/", env!("CARGO_PKG_VERSION"));

/// Settings used to build a `PostcodeClient` backed by `UreqTransport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL requests are resolved against.
    pub base_url: String,
    /// Overall per-request timeout enforced by the transport. `None` waits
    /// indefinitely.
    pub timeout: Option<Duration>,
    /// Value of the `user-agent` header.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Some(DEFAULT_TIMEOUT),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

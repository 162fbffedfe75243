//! Network topology: which nodes serve which role.
//!
//! # Data Flow
//! ```text
//! [network] section of the config
//!     → Network::new (parse & validate base URLs)
//!     → Arc<Network> shared by every QuorumEngine call
//! ```
//!
//! # Design Decisions
//! - Node lists are parsed once and never mutated
//! - Order is preserved; it only matters for tie-breaking in reduction

use std::fmt;
use thiserror::Error;
use url::Url;

use crate::config::schema::NetworkConfig;

/// Class of replicated service endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// Nodes accepting new transactions (miners).
    Transaction,
    /// Nodes serving ledger state and confirmations (sharders).
    Query,
}

impl NodeRole {
    /// Stable label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::Transaction => "miners",
            NodeRole::Query => "sharders",
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors building the role table.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("invalid {role} node URL '{url}': {reason}")]
    InvalidUrl {
        role: NodeRole,
        url: String,
        reason: String,
    },
}

/// Immutable role → node base URL table.
#[derive(Debug, Clone, Default)]
pub struct Network {
    miners: Vec<Url>,
    sharders: Vec<Url>,
}

impl Network {
    /// Build the table from raw base URLs.
    ///
    /// A trailing slash is added to every base so endpoint joins keep the
    /// node's path prefix (`https://host/miner01` + `v1/...`).
    pub fn new<M, S>(miners: M, sharders: S) -> Result<Self, NetworkError>
    where
        M: IntoIterator,
        M::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        Ok(Self {
            miners: parse_nodes(NodeRole::Transaction, miners)?,
            sharders: parse_nodes(NodeRole::Query, sharders)?,
        })
    }

    /// Build the table from the `[network]` config section.
    pub fn from_config(config: &NetworkConfig) -> Result<Self, NetworkError> {
        Self::new(&config.miners, &config.sharders)
    }

    /// Node base URLs for a role, in configured order.
    pub fn nodes(&self, role: NodeRole) -> &[Url] {
        match role {
            NodeRole::Transaction => &self.miners,
            NodeRole::Query => &self.sharders,
        }
    }
}

fn parse_nodes<I>(role: NodeRole, raw: I) -> Result<Vec<Url>, NetworkError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    raw.into_iter()
        .map(|s| parse_base_url(role, s.as_ref()))
        .collect()
}

pub(crate) fn parse_base_url(role: NodeRole, raw: &str) -> Result<Url, NetworkError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };

    let url = Url::parse(&with_slash).map_err(|e| NetworkError::InvalidUrl {
        role,
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(NetworkError::InvalidUrl {
            role,
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(url)
}

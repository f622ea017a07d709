//! Address handling module for Title-Scout
//!
//! Caller-supplied addresses may omit the scheme. This module turns them into
//! fully-qualified URLs before any network activity happens.

mod normalize;

pub use normalize::{normalize_address, NormalizedUrl, DEFAULT_SCHEME_PREFIX};

/// Transport used to reach a normalized URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    /// Plain-text HTTP
    Plain,
    /// HTTP over TLS
    Secure,
}

impl Transport {
    /// Standard port for this transport
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Plain => 80,
            Self::Secure => 443,
        }
    }

    /// URL scheme name for this transport
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Plain => "http",
            Self::Secure => "https",
        }
    }
}

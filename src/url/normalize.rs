use crate::url::Transport;
use crate::UrlError;
use std::fmt;
use url::Url;

/// Scheme prepended to addresses that do not carry one
pub const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// Scheme prefixes recognized as already present
const KNOWN_PREFIXES: &[&str] = &["http://", "https://"];

/// A fully-qualified URL derived from a caller-supplied address
///
/// Always carries a scheme, a host and a path (at least `/`). The query may
/// be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    url: Url,
    transport: Transport,
}

impl NormalizedUrl {
    /// The full URL string
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// The parsed URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Host name or IP literal
    pub fn host(&self) -> &str {
        // Construction guarantees a host.
        self.url.host_str().unwrap_or_default()
    }

    /// Explicit port, or the transport's standard port
    pub fn port(&self) -> u16 {
        self.url
            .port()
            .unwrap_or_else(|| self.transport.default_port())
    }

    /// Whether the URL is reached over plain or secure HTTP
    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Path plus query, as sent on the request line
    pub fn request_target(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{}", self.url.path(), query),
            None => self.url.path().to_string(),
        }
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Normalizes a caller-supplied address into a fully-qualified URL
///
/// # Normalization Steps
///
/// 1. If the address does not start with `http://` or `https://`
///    (ASCII case-insensitive), prepend `https://`
/// 2. Parse the result; reject if malformed
/// 3. Reject schemes other than HTTP and HTTPS
/// 4. Reject URLs without a host
///
/// This is purely textual; no DNS lookup or reachability check happens here.
///
/// # Examples
///
/// ```
/// use title_scout::url::{normalize_address, Transport};
///
/// let url = normalize_address("example.com/docs?page=2").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs?page=2");
/// assert_eq!(url.transport(), Transport::Secure);
/// assert_eq!(url.port(), 443);
/// ```
pub fn normalize_address(address: &str) -> Result<NormalizedUrl, UrlError> {
    let full = if has_known_prefix(address) {
        address.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME_PREFIX, address)
    };

    let url = Url::parse(&full).map_err(|e| UrlError::Parse(format!("{}: {}", full, e)))?;

    let transport = match url.scheme() {
        "https" => Transport::Secure,
        "http" => Transport::Plain,
        other => return Err(UrlError::InvalidScheme(other.to_string())),
    };

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingHost),
    }

    Ok(NormalizedUrl { url, transport })
}

// Case-insensitive on purpose: `HTTP://host` is taken as carrying a scheme
// instead of becoming `https://HTTP://host`.
fn has_known_prefix(address: &str) -> bool {
    KNOWN_PREFIXES.iter().any(|prefix| {
        address
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

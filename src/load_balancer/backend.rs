//! Backend address model.
//!
//! A backend registration payload is a single reachable address string.
//! Beyond being a forwardable http(s) target the address is opaque; in
//! particular the gateway attaches no health or weight state to it.

use std::fmt;

use thiserror::Error;
use url::Url;

/// Error type for address parsing.
#[derive(Debug, Error)]
pub enum AddressError {
    #[error("registration payload is not valid UTF-8")]
    Encoding,

    #[error("invalid backend address: {0}")]
    Invalid(#[from] url::ParseError),

    #[error("unsupported backend scheme {0:?}")]
    UnsupportedScheme(String),

    #[error("backend address has no host")]
    MissingHost,
}

/// A validated, reachable backend endpoint (scheme + host + port).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendAddress {
    url: Url,
}

impl BackendAddress {
    /// Parse an address string, e.g. `http://shelf-1:8000`.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let url = Url::parse(input.trim())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AddressError::UnsupportedScheme(url.scheme().to_string()));
        }
        if url.host_str().is_none() {
            return Err(AddressError::MissingHost);
        }
        Ok(Self { url })
    }

    /// Parse a raw registration payload (UTF-8 bytes, no structured encoding).
    pub fn from_payload(payload: &[u8]) -> Result<Self, AddressError> {
        let text = std::str::from_utf8(payload).map_err(|_| AddressError::Encoding)?;
        Self::parse(text)
    }

    /// The full address string.
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// URI scheme, `http` or `https`.
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// `host:port` form suitable for an HTTP authority. The port is omitted
    /// when the address did not carry an explicit one.
    pub fn authority(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }
}

impl fmt::Display for BackendAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Endpoint addresses.
//!
//! Addresses are immutable value types; the canonical connection URI is a
//! pure function of scheme, host, and port.

use std::fmt;

/// Connection scheme for an endpoint address.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Scheme {
    /// Raw TCP endpoint.
    Tcp,
    /// Plain websocket endpoint.
    Ws,
    /// TLS websocket endpoint.
    Wss,
}

impl Scheme {
    /// Returns the URI scheme string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Ws => "ws",
            Self::Wss => "wss",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A protocol/host/port endpoint.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RpcAddress {
    scheme: Scheme,
    host: String,
    port: u16,
}

impl RpcAddress {
    /// Creates an address with the default `tcp` scheme.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::with_scheme(Scheme::Tcp, host, port)
    }

    /// Creates an address with an explicit scheme.
    pub fn with_scheme(scheme: Scheme, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme,
            host: host.into(),
            port,
        }
    }

    /// Returns the connection scheme.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Returns the host name or address literal.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port number.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for RpcAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// A realm-scoped websocket endpoint.
///
/// The scheme is derived from `use_tls`: `wss` when set, `ws` otherwise.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WsAddress {
    addr: RpcAddress,
    realm: String,
}

impl WsAddress {
    /// Creates a websocket address scoped to `realm`.
    pub fn new(host: impl Into<String>, port: u16, realm: impl Into<String>, use_tls: bool) -> Self {
        let scheme = if use_tls { Scheme::Wss } else { Scheme::Ws };
        Self {
            addr: RpcAddress::with_scheme(scheme, host, port),
            realm: realm.into(),
        }
    }

    /// Returns the realm this endpoint is scoped to.
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Returns the underlying endpoint address.
    pub fn addr(&self) -> &RpcAddress {
        &self.addr
    }
}

impl fmt::Display for WsAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.addr.fmt(f)
    }
}

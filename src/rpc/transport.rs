//! The transport seam.
//!
//! The realm protocol stack (framing, serialization, TLS) is an external
//! collaborator. This module defines the traits the session layer drives:
//! [`Connect`] opens a realm-joined link, [`Transport`] exposes the
//! register/subscribe/call/publish primitives on that link.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::rpc::proto::{CallArgs, CloseReason, JoinDetails, LogLevel, SerializerId};

/// Local callable registered as a remote procedure.
///
/// Invoked by the transport when a peer calls the registered name.
pub type RpcHandler = Arc<dyn Fn(CallArgs) -> Result<Value, RpcError> + Send + Sync>;

/// Local callable subscribed to a topic.
///
/// Invoked by the transport when a matching event is published.
pub type EventHandler = Arc<dyn Fn(CallArgs) + Send + Sync>;

/// Errors produced by transport implementations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connection could not be established.
    #[error("connect failed: {0}")]
    Connect(String),

    /// The peer violated the protocol contract.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The link is no longer usable.
    #[error("transport closed")]
    Closed,
}

/// Errors carried by call result handles.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The session has not completed a realm join.
    #[error("session is not yet established")]
    NotEstablished,

    /// The friendly name is not present in the client's method map.
    #[error("unknown method '{0}'")]
    UnknownMethod(String),

    /// The remote side rejected or failed the call.
    #[error("remote error {uri}: {message}")]
    Remote {
        /// Error identifier, URI-style.
        uri: String,
        /// Human-readable message from the remote side.
        message: String,
    },

    /// The underlying transport failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// TLS behavior requested from the transport stack.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TlsMode {
    /// Derive from the address scheme (`wss` enables TLS).
    #[default]
    Auto,
    /// Force TLS on regardless of scheme.
    Enabled,
    /// Force TLS off regardless of scheme.
    Disabled,
}

/// Optional proxy the transport should connect through.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProxyConfig {
    /// Proxy host name or address literal.
    pub host: String,
    /// Proxy port.
    pub port: u16,
}

/// Everything a transport implementation needs to open a realm link.
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Canonical connection URI.
    pub uri: String,
    /// Realm to join after connecting.
    pub realm: String,
    /// Wire serializers offered during the handshake, in preference order.
    pub serializers: Vec<SerializerId>,
    /// TLS behavior.
    pub tls: TlsMode,
    /// Optional proxy descriptor.
    pub proxy: Option<ProxyConfig>,
    /// Custom headers sent with the connection upgrade.
    pub headers: BTreeMap<String, String>,
    /// Log verbosity requested from the stack.
    pub log_level: LogLevel,
}

/// A realm-joined transport link.
///
/// Produced by [`Connect::open`] once the realm handshake has completed.
pub struct TransportLink {
    /// Primitives for the established link.
    pub transport: Arc<dyn Transport>,
    /// Details from the completed realm join.
    pub details: JoinDetails,
    /// Resolves when the link drops; carries the close reason when known.
    pub closed: oneshot::Receiver<Option<CloseReason>>,
}

/// Opens realm-joined transport links.
///
/// Implemented by the external protocol stack; the runner calls `open` for
/// the initial connection and for every reconnect attempt.
#[async_trait]
pub trait Connect: Send + Sync {
    /// Connects, performs the realm handshake, and returns the joined link.
    async fn open(&self, config: &TransportConfig) -> Result<TransportLink, TransportError>;
}

/// Primitives exposed by an established transport link.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Registers a local callable as the remote procedure `procedure`.
    async fn register(&self, procedure: &str, handler: RpcHandler) -> Result<(), TransportError>;

    /// Subscribes a local callable to the topic `topic`.
    async fn subscribe(&self, topic: &str, handler: EventHandler) -> Result<(), TransportError>;

    /// Calls the remote procedure `procedure` and awaits its result.
    async fn call(&self, procedure: &str, args: CallArgs) -> Result<Value, RpcError>;

    /// Publishes an event to `topic`. Fire-and-forget; no result is returned.
    fn publish(&self, topic: &str, args: CallArgs);
}

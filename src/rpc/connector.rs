//! Connection policy and the transport runner.
//!
//! A `Connector` owns one `Session` and the configuration needed to open
//! realm links for it. `connect` spawns the runner task and returns
//! immediately; the runner drives join/leave on the session and reconnects
//! with backoff while the policy allows it.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::reconnect::ReconnectPolicy;
use crate::rpc::addr::WsAddress;
use crate::rpc::proto::{CloseReason, LogLevel, SerializerId};
use crate::rpc::session::Session;
use crate::rpc::transport::{Connect, ProxyConfig, TlsMode, TransportConfig};

/// Connection-policy options handed to the transport stack.
#[derive(Clone, Debug)]
pub struct ConnectOptions {
    /// Wire serializers offered during the handshake, in preference order.
    pub serializers: Vec<SerializerId>,
    /// TLS behavior.
    pub tls: TlsMode,
    /// Optional proxy descriptor.
    pub proxy: Option<ProxyConfig>,
    /// Custom headers sent with the connection upgrade.
    pub headers: BTreeMap<String, String>,
    /// Whether the runner reconnects after a dropped link.
    pub auto_reconnect: bool,
    /// Log verbosity requested from the stack.
    pub log_level: LogLevel,
    /// Backoff applied between reconnect attempts.
    pub reconnect: ReconnectPolicy,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            serializers: vec![SerializerId::Json],
            tls: TlsMode::Auto,
            proxy: None,
            headers: BTreeMap::new(),
            auto_reconnect: true,
            log_level: LogLevel::Info,
            reconnect: ReconnectPolicy::default(),
        }
    }
}

/// Builds and owns the transport runner for one session.
pub struct Connector {
    connect: Arc<dyn Connect>,
    session: Arc<Session>,
    address: WsAddress,
    options: ConnectOptions,
}

impl Connector {
    /// Creates a connector with a plain session bound to the address realm.
    pub fn new(connect: Arc<dyn Connect>, address: WsAddress, options: ConnectOptions) -> Self {
        Self::with_session(connect, address, options, |realm: &str| Session::new(realm))
    }

    /// Creates a connector with a session built by `factory`.
    ///
    /// The factory receives the realm from the address; use it to attach
    /// method and event tables via [`Session::with_handlers`].
    pub fn with_session<F>(
        connect: Arc<dyn Connect>,
        address: WsAddress,
        options: ConnectOptions,
        factory: F,
    ) -> Self
    where
        F: FnOnce(&str) -> Session,
    {
        let session = Arc::new(factory(address.realm()));
        Self {
            connect,
            session,
            address,
            options,
        }
    }

    /// Returns a shared reference to the owned session.
    pub fn session(&self) -> Arc<Session> {
        Arc::clone(&self.session)
    }

    /// Returns the endpoint address.
    pub fn address(&self) -> &WsAddress {
        &self.address
    }

    /// Spawns the transport runner and returns its handle.
    ///
    /// Never blocks; connect failures are observed through the session's
    /// readiness signal and `connected` flag, not through this call.
    pub fn connect(&self) -> JoinHandle<()> {
        let connect = Arc::clone(&self.connect);
        let session = Arc::clone(&self.session);
        let config = self.transport_config();
        let auto_reconnect = self.options.auto_reconnect;
        let policy = self.options.reconnect.clone();
        tokio::spawn(run_transport(
            connect,
            session,
            config,
            auto_reconnect,
            policy,
        ))
    }

    fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            uri: self.address.to_string(),
            realm: self.address.realm().to_string(),
            serializers: self.options.serializers.clone(),
            tls: self.options.tls,
            proxy: self.options.proxy.clone(),
            headers: self.options.headers.clone(),
            log_level: self.options.log_level,
        }
    }
}

async fn run_transport(
    connect: Arc<dyn Connect>,
    session: Arc<Session>,
    config: TransportConfig,
    auto_reconnect: bool,
    policy: ReconnectPolicy,
) {
    let mut attempt = 0usize;

    loop {
        match connect.open(&config).await {
            Ok(link) => {
                attempt = 0;
                session.on_join(link.transport, link.details).await;
                let reason = link.closed.await.ok().flatten();
                session.on_leave(reason);
            }
            Err(err) => {
                warn!(event = "connect_failed", uri = %config.uri, error = %err);
                session.on_leave(Some(CloseReason::transport_lost(err.to_string())));
            }
        }

        if !auto_reconnect {
            break;
        }

        attempt += 1;
        let delay = policy.delay_for_attempt(attempt);
        debug!(
            event = "reconnect_scheduled",
            attempt,
            delay_ms = delay.as_millis() as u64
        );
        tokio::time::sleep(delay).await;
    }
}

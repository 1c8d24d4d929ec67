//! Realm session state machine.
//!
//! A `Session` wraps one realm-scoped connection: the transport runner
//! drives it through join and leave, and on join it registers the method
//! and event tables it was constructed with. Readiness is a tri-state
//! single-assignment cell: only the first transition out of `Pending` is
//! observed, no matter how many joins and leaves follow.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, warn};

use crate::rpc::proto::{CallArgs, CloseReason, JoinDetails};
use crate::rpc::transport::{EventHandler, RpcError, RpcHandler, Transport};

const DEFAULT_LEAVE_MESSAGE: &str = "Unknown error occurred";

/// Failure payload carried by the readiness signal.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct SessionFailure {
    /// Human-readable failure description.
    pub message: String,
}

impl SessionFailure {
    /// Creates a failure from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Builds a failure from an optional close reason.
    ///
    /// A missing reason maps to the default "Unknown error occurred"
    /// message.
    pub fn from_close(reason: Option<CloseReason>) -> Self {
        match reason {
            Some(reason) => Self::new(reason.to_string()),
            None => Self::new(DEFAULT_LEAVE_MESSAGE),
        }
    }
}

/// Readiness of a session's first join.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Readiness {
    /// No join or leave has been observed yet.
    #[default]
    Pending,
    /// The first observed transition was a completed join.
    Joined(JoinDetails),
    /// The first observed transition was a failure.
    Failed(SessionFailure),
}

/// Client-side realm session.
///
/// Created by the connector and driven by the transport runner; `Client`
/// and `Publisher` hold shared references and only read connection state.
pub struct Session {
    realm: String,
    methods: Vec<(RpcHandler, String)>,
    events: Vec<(EventHandler, String)>,
    connected: AtomicBool,
    ready_tx: watch::Sender<Readiness>,
    transport: RwLock<Option<Arc<dyn Transport>>>,
}

impl Session {
    /// Creates a session for `realm` with empty method and event tables.
    pub fn new(realm: impl Into<String>) -> Self {
        Self::with_handlers(realm, Vec::new(), Vec::new())
    }

    /// Creates a session with method and event tables.
    ///
    /// On every join, each `(handler, name)` pair in `methods` is registered
    /// as a remote procedure and each pair in `events` is subscribed to its
    /// topic, in table order.
    pub fn with_handlers(
        realm: impl Into<String>,
        methods: Vec<(RpcHandler, String)>,
        events: Vec<(EventHandler, String)>,
    ) -> Self {
        let (ready_tx, _) = watch::channel(Readiness::Pending);
        Self {
            realm: realm.into(),
            methods,
            events,
            connected: AtomicBool::new(false),
            ready_tx,
            transport: RwLock::new(None),
        }
    }

    /// Returns the realm this session is scoped to.
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Returns whether the session has completed a join and not yet left.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Returns a receiver observing the readiness cell.
    pub fn readiness(&self) -> watch::Receiver<Readiness> {
        self.ready_tx.subscribe()
    }

    /// Waits for the first join or failure.
    pub async fn ready(&self) -> Result<JoinDetails, SessionFailure> {
        let mut rx = self.ready_tx.subscribe();
        let state = rx
            .wait_for(|state| !matches!(state, Readiness::Pending))
            .await
            .map_err(|_| SessionFailure::new(DEFAULT_LEAVE_MESSAGE))?;
        match &*state {
            Readiness::Joined(details) => Ok(details.clone()),
            Readiness::Failed(failure) => Err(failure.clone()),
            Readiness::Pending => Err(SessionFailure::new(DEFAULT_LEAVE_MESSAGE)),
        }
    }

    /// Handles a completed realm join.
    ///
    /// Registers the method table, subscribes the event table, marks the
    /// session connected, and resolves readiness if still pending.
    /// Registration failures are logged and do not abort the sequence.
    pub async fn on_join(&self, transport: Arc<dyn Transport>, details: JoinDetails) {
        debug!(
            event = "session_join",
            realm = %self.realm,
            session_id = details.session_id
        );
        if let Ok(mut slot) = self.transport.write() {
            *slot = Some(Arc::clone(&transport));
        }
        self.register_methods(&transport, &self.methods).await;
        self.register_events(&transport, &self.events).await;
        self.connected.store(true, Ordering::SeqCst);
        self.resolve_ready(Readiness::Joined(details));
    }

    /// Handles the end of a realm session.
    ///
    /// Marks the session disconnected and, if readiness is still pending,
    /// resolves it as a failure carrying `reason`.
    pub fn on_leave(&self, reason: Option<CloseReason>) {
        self.connected.store(false, Ordering::SeqCst);
        if let Ok(mut slot) = self.transport.write() {
            *slot = None;
        }
        debug!(
            event = "session_leave",
            realm = %self.realm,
            reason = reason.as_ref().map(ToString::to_string).as_deref()
        );
        self.resolve_ready(Readiness::Failed(SessionFailure::from_close(reason)));
    }

    /// Calls a remote procedure through the current transport.
    ///
    /// Fails with [`RpcError::NotEstablished`] when no join has completed;
    /// no transport contact is attempted in that case.
    pub async fn call(&self, procedure: &str, args: CallArgs) -> Result<Value, RpcError> {
        if !self.is_connected() {
            return Err(RpcError::NotEstablished);
        }
        let transport = self
            .transport
            .read()
            .ok()
            .and_then(|slot| slot.clone())
            .ok_or(RpcError::NotEstablished)?;
        transport.call(procedure, args).await
    }

    /// Publishes an event through the current transport, best effort.
    ///
    /// Dropped with a warning when no join has completed; never queued,
    /// never retried.
    pub fn publish(&self, topic: &str, args: CallArgs) {
        let transport = self.transport.read().ok().and_then(|slot| slot.clone());
        match transport {
            Some(transport) if self.is_connected() => transport.publish(topic, args),
            _ => {
                warn!(
                    event = "publish_dropped",
                    topic = %topic,
                    "cannot publish: session is not yet established"
                );
            }
        }
    }

    async fn register_methods(
        &self,
        transport: &Arc<dyn Transport>,
        methods: &[(RpcHandler, String)],
    ) {
        for (handler, procedure) in methods {
            if let Err(err) = transport.register(procedure, Arc::clone(handler)).await {
                error!(event = "register_failed", procedure = %procedure, error = %err);
            }
        }
    }

    async fn register_events(
        &self,
        transport: &Arc<dyn Transport>,
        events: &[(EventHandler, String)],
    ) {
        for (handler, topic) in events {
            if let Err(err) = transport.subscribe(topic, Arc::clone(handler)).await {
                error!(event = "subscribe_failed", topic = %topic, error = %err);
            }
        }
    }

    // Only the first transition out of Pending is observed.
    fn resolve_ready(&self, next: Readiness) {
        self.ready_tx.send_if_modified(|state| {
            if matches!(state, Readiness::Pending) {
                *state = next;
                true
            } else {
                false
            }
        });
    }
}

/// Binds object methods to an `Arc` receiver for the session method table.
///
/// Pure transformation: each `(method, alias)` pair becomes a handler
/// closure capturing a clone of `obj`, paired with its remote name.
pub fn object_method_map<T, I>(obj: &Arc<T>, methods: I) -> Vec<(RpcHandler, String)>
where
    T: Send + Sync + 'static,
    I: IntoIterator<Item = (fn(&T, CallArgs) -> Result<Value, RpcError>, String)>,
{
    methods
        .into_iter()
        .map(|(method, alias)| {
            let obj = Arc::clone(obj);
            let handler: RpcHandler = Arc::new(move |args| method(&obj, args));
            (handler, alias)
        })
        .collect()
}

/// Binds object methods to an `Arc` receiver for the session event table.
pub fn object_event_map<T, I>(obj: &Arc<T>, events: I) -> Vec<(EventHandler, String)>
where
    T: Send + Sync + 'static,
    I: IntoIterator<Item = (fn(&T, CallArgs), String)>,
{
    events
        .into_iter()
        .map(|(method, alias)| {
            let obj = Arc::clone(obj);
            let handler: EventHandler = Arc::new(move |args| method(&obj, args));
            (handler, alias)
        })
        .collect()
}

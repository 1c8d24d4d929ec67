//! Best-effort event publication.

use std::sync::Arc;

use crate::rpc::proto::CallArgs;
use crate::rpc::session::Session;

/// Publishes events through a shared session, best effort.
///
/// When the session is disconnected the event is dropped with a warning;
/// nothing is queued or retried.
pub struct Publisher {
    session: Arc<Session>,
}

impl Publisher {
    /// Creates a publisher over a shared session.
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// Publishes `args` to the topic `event_alias`.
    pub fn publish(&self, event_alias: &str, args: CallArgs) {
        self.session.publish(event_alias, args);
    }
}

//! Friendly-name call proxy.
//!
//! A `Client` maps caller-facing method names to remote procedure aliases
//! and forwards calls through a shared session. All failure is carried in
//! the returned result; nothing here panics or blocks.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::error;

use crate::rpc::proto::CallArgs;
use crate::rpc::session::Session;
use crate::rpc::transport::RpcError;

/// Call proxy over a shared session.
pub struct Client {
    session: Arc<Session>,
    methods: BTreeMap<String, String>,
}

impl Client {
    /// Creates a client from `(friendly name, remote alias)` pairs.
    pub fn new<I, K, V>(session: Arc<Session>, method_map: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let methods = method_map
            .into_iter()
            .map(|(name, alias)| (name.into(), alias.into()))
            .collect();
        Self { session, methods }
    }

    /// Returns the remote alias for a friendly name, when mapped.
    pub fn alias(&self, friendly: &str) -> Option<&str> {
        self.methods.get(friendly).map(String::as_str)
    }

    /// Returns the friendly-name table, ordered by name.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.methods
            .iter()
            .map(|(name, alias)| (name.as_str(), alias.as_str()))
    }

    /// Calls the remote procedure mapped to `friendly`.
    ///
    /// Fails with [`RpcError::UnknownMethod`] for unmapped names and with
    /// [`RpcError::NotEstablished`] when the session is disconnected; no
    /// transport contact happens in either case. Transport-level failures
    /// are logged once and still returned to the caller.
    pub async fn call(&self, friendly: &str, args: CallArgs) -> Result<Value, RpcError> {
        let Some(alias) = self.methods.get(friendly) else {
            return Err(RpcError::UnknownMethod(friendly.to_string()));
        };
        if !self.session.is_connected() {
            return Err(RpcError::NotEstablished);
        }
        match self.session.call(alias, args).await {
            Ok(value) => Ok(value),
            Err(err) => {
                error!(event = "call_failed", method = %alias, error = %err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::Client;
    use crate::rpc::proto::{CallArgs, JoinDetails};
    use crate::rpc::session::Session;
    use crate::rpc::testutil::MockTransport;
    use crate::rpc::transport::{RpcError, Transport};

    fn client_with(session: Arc<Session>) -> Client {
        Client::new(session, [("ping", "rpc.net.ping"), ("peers", "rpc.net.peers")])
    }

    #[tokio::test]
    async fn call_on_disconnected_session_short_circuits() {
        let session = Arc::new(Session::new("default_realm"));
        let client = client_with(Arc::clone(&session));

        let err = client
            .call("ping", CallArgs::empty())
            .await
            .expect_err("must fail");
        assert!(matches!(err, RpcError::NotEstablished));
        assert_eq!(err.to_string(), "session is not yet established");
    }

    #[tokio::test]
    async fn call_forwards_alias_and_arguments() {
        let session = Arc::new(Session::new("default_realm"));
        let transport = Arc::new(MockTransport::new().responding_with(json!("pong")));
        session
            .on_join(
                transport.clone() as Arc<dyn Transport>,
                JoinDetails::new(8, "default_realm"),
            )
            .await;

        let client = client_with(Arc::clone(&session));
        let value = client
            .call("ping", CallArgs::positional([json!(1)]))
            .await
            .expect("call succeeds");
        assert_eq!(value, json!("pong"));

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "rpc.net.ping");
        assert_eq!(calls[0].1, CallArgs::positional([json!(1)]));
    }

    #[tokio::test]
    async fn transport_failure_is_returned_to_the_caller() {
        let session = Arc::new(Session::new("default_realm"));
        let transport = Arc::new(MockTransport::new().failing_calls());
        session
            .on_join(
                transport.clone() as Arc<dyn Transport>,
                JoinDetails::new(9, "default_realm"),
            )
            .await;

        let client = client_with(Arc::clone(&session));
        let err = client
            .call("peers", CallArgs::empty())
            .await
            .expect_err("remote failure");
        assert!(matches!(err, RpcError::Remote { .. }));
        // The transport was contacted exactly once.
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn unknown_friendly_name_never_reaches_the_transport() {
        let session = Arc::new(Session::new("default_realm"));
        let transport = Arc::new(MockTransport::new());
        session
            .on_join(
                transport.clone() as Arc<dyn Transport>,
                JoinDetails::new(10, "default_realm"),
            )
            .await;

        let client = client_with(session);
        let err = client
            .call("reboot", CallArgs::empty())
            .await
            .expect_err("unmapped name");
        assert!(matches!(err, RpcError::UnknownMethod(name) if name == "reboot"));
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn alias_table_is_exposed_in_name_order() {
        let session = Arc::new(Session::new("default_realm"));
        let client = client_with(session);
        assert_eq!(client.alias("ping"), Some("rpc.net.ping"));
        assert_eq!(client.alias("missing"), None);
        let names: Vec<_> = client.aliases().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["peers", "ping"]);
    }
}

//! In-process transport double used by the unit tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::rpc::proto::CallArgs;
use crate::rpc::transport::{EventHandler, RpcError, RpcHandler, Transport, TransportError};

/// Records every primitive invocation; selected names can be made to fail.
pub(crate) struct MockTransport {
    registrations: Mutex<Vec<String>>,
    subscriptions: Mutex<Vec<String>>,
    calls: Mutex<Vec<(String, CallArgs)>>,
    publishes: Mutex<Vec<(String, CallArgs)>>,
    failing_registrations: HashSet<String>,
    failing_subscriptions: HashSet<String>,
    failing_calls: bool,
    call_response: Value,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self {
            registrations: Mutex::new(Vec::new()),
            subscriptions: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            publishes: Mutex::new(Vec::new()),
            failing_registrations: HashSet::new(),
            failing_subscriptions: HashSet::new(),
            failing_calls: false,
            call_response: json!(null),
        }
    }

    pub(crate) fn failing_registration(mut self, procedure: &str) -> Self {
        self.failing_registrations.insert(procedure.to_string());
        self
    }

    pub(crate) fn failing_subscription(mut self, topic: &str) -> Self {
        self.failing_subscriptions.insert(topic.to_string());
        self
    }

    pub(crate) fn failing_calls(mut self) -> Self {
        self.failing_calls = true;
        self
    }

    pub(crate) fn responding_with(mut self, value: Value) -> Self {
        self.call_response = value;
        self
    }

    pub(crate) fn registrations(&self) -> Vec<String> {
        self.registrations.lock().expect("lock").clone()
    }

    pub(crate) fn subscriptions(&self) -> Vec<String> {
        self.subscriptions.lock().expect("lock").clone()
    }

    pub(crate) fn calls(&self) -> Vec<(String, CallArgs)> {
        self.calls.lock().expect("lock").clone()
    }

    pub(crate) fn publishes(&self) -> Vec<(String, CallArgs)> {
        self.publishes.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn register(&self, procedure: &str, _handler: RpcHandler) -> Result<(), TransportError> {
        self.registrations
            .lock()
            .expect("lock")
            .push(procedure.to_string());
        if self.failing_registrations.contains(procedure) {
            return Err(TransportError::Protocol(format!(
                "procedure already exists: {procedure}"
            )));
        }
        Ok(())
    }

    async fn subscribe(&self, topic: &str, _handler: EventHandler) -> Result<(), TransportError> {
        self.subscriptions
            .lock()
            .expect("lock")
            .push(topic.to_string());
        if self.failing_subscriptions.contains(topic) {
            return Err(TransportError::Protocol(format!(
                "subscription rejected: {topic}"
            )));
        }
        Ok(())
    }

    async fn call(&self, procedure: &str, args: CallArgs) -> Result<Value, RpcError> {
        self.calls
            .lock()
            .expect("lock")
            .push((procedure.to_string(), args));
        if self.failing_calls {
            return Err(RpcError::Remote {
                uri: "realm.error.runtime_error".to_string(),
                message: "remote handler failed".to_string(),
            });
        }
        Ok(self.call_response.clone())
    }

    fn publish(&self, topic: &str, args: CallArgs) {
        self.publishes
            .lock()
            .expect("lock")
            .push((topic.to_string(), args));
    }
}

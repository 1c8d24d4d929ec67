//! Protocol types shared with the transport stack.
//!
//! These are the collaborator-facing shapes only; wire encoding is owned by
//! the transport implementation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Positional and keyword arguments for a call, event, or publication.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CallArgs {
    /// Positional arguments.
    pub args: Vec<Value>,
    /// Keyword arguments, ordered by key.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub kwargs: BTreeMap<String, Value>,
}

impl CallArgs {
    /// Creates an empty argument set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates an argument set from positional values only.
    pub fn positional(args: impl IntoIterator<Item = Value>) -> Self {
        Self {
            args: args.into_iter().collect(),
            kwargs: BTreeMap::new(),
        }
    }

    /// Adds a keyword argument.
    pub fn with_kwarg(mut self, key: impl Into<String>, value: Value) -> Self {
        self.kwargs.insert(key.into(), value);
        self
    }
}

/// Details delivered by the transport when a realm join completes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JoinDetails {
    /// Transport-assigned session identifier.
    pub session_id: u64,
    /// Realm the session joined.
    pub realm: String,
    /// Authentication id granted by the router, when any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub authid: Option<String>,
    /// Authentication role granted by the router, when any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub authrole: Option<String>,
}

impl JoinDetails {
    /// Creates join details for a realm with a transport session id.
    pub fn new(session_id: u64, realm: impl Into<String>) -> Self {
        Self {
            session_id,
            realm: realm.into(),
            authid: None,
            authrole: None,
        }
    }
}

/// Reason delivered by the transport when a session ends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CloseReason {
    /// Reason identifier, URI-style.
    pub reason: String,
    /// Optional human-readable message.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

impl CloseReason {
    /// Creates a close reason from a reason identifier.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            message: None,
        }
    }

    /// Creates a close reason with a human-readable message.
    pub fn with_message(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            message: Some(message.into()),
        }
    }

    /// Standard reason for a dropped transport connection.
    pub fn transport_lost(message: impl Into<String>) -> Self {
        Self::with_message("realm.close.transport_lost", message)
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.reason, message),
            None => f.write_str(&self.reason),
        }
    }
}

/// Wire serializer identifiers offered to the transport stack.
///
/// Selection only; the codec itself lives in the transport implementation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SerializerId {
    Json,
    Msgpack,
    Cbor,
}

impl SerializerId {
    /// Returns the serializer identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Msgpack => "msgpack",
            Self::Cbor => "cbor",
        }
    }
}

impl fmt::Display for SerializerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log verbosity requested from the transport stack.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Returns the level name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

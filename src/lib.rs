//! Client-side session layer for realm-scoped RPC and publish/subscribe.
//!
//! The crate is organized by surface:
//! - `rpc`: addresses, session state machine, connector, call proxy, and
//!   event publisher over an external transport stack.
//! - `reconnect`: backoff policy used by the transport runner.

/// Reconnect backoff policy used by the transport runner.
pub mod reconnect;
/// Session layer: addresses, protocol types, transport seam, session,
/// connector, client, and publisher.
pub mod rpc;

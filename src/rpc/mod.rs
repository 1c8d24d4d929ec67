//! Realm session modules.
//!
//! - `addr`: endpoint addresses and canonical connection URIs.
//! - `proto`: protocol types shared with the transport stack.
//! - `transport`: the external transport seam (traits, config, errors).
//! - `session`: realm session state machine and readiness signal.
//! - `connector`: connection policy and the transport runner.
//! - `client`: friendly-name call proxy.
//! - `publisher`: best-effort event publication.

/// Endpoint addresses and canonical URIs.
pub mod addr;
/// Friendly-name call proxy over a shared session.
pub mod client;
/// Connection policy options and the transport runner.
pub mod connector;
/// Protocol types handed to and received from the transport stack.
pub mod proto;
/// Best-effort event publication over a shared session.
pub mod publisher;
/// Realm session state machine and method/event registration.
pub mod session;
/// Transport traits, configuration, and error types.
pub mod transport;

#[cfg(test)]
pub(crate) mod testutil;

//! # Front Desk Client
//!
//! REST client for the hospital front-desk backend.
//!
//! [`FrontDeskClient`] implements the `frontdesk-core` backend traits over HTTP:
//! - bearer token taken from a shared [`SessionContext`]
//! - silent token refresh and single replay on 401, with concurrent refreshes coalesced
//! - insert answered with 201, update with 202, anything else is a failure

pub mod client;
pub mod config;
pub mod error;
pub mod session;
mod transport;

pub use client::FrontDeskClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use session::SessionContext;

//! Claims gateway for the KRISHI RAKSHA frontend.
//!
//! Forwards `/api/claims/*` requests single-hop to the claims backend and
//! provides the async key-value storage shim used by application code.

pub mod api;
pub mod config;
pub mod state;
pub mod storage;

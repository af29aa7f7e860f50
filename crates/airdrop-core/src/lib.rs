//! # Airdrop Core
//!
//! Data models, the endpoint registry and the scoring heuristics behind
//! Airdrop Radar.
//!
//! Everything in this crate is pure: no network I/O, no clocks except where
//! a date is passed in. The server crate does the fetching and feeds the
//! results through here.

pub mod address;
pub mod error;
pub mod metrics;
pub mod models;
pub mod registry;
pub mod scoring;
pub mod units;

pub use address::*;
pub use error::*;
pub use models::*;
pub use registry::EndpointRegistry;

//! projection-core: marketing ROI and financial projection model.
//!
//! Pure computation over one campaign's settings. The session in
//! `engine` is the only writer; everything else is a function of its
//! inputs.

pub mod campaign;
pub mod channel;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod metrics;
pub mod optimization;
pub mod record;
pub mod rng;
pub mod scenario;
pub mod segment;
pub mod sensitivity;
pub mod snapshot;
pub mod timeline;
pub mod types;
pub mod validation;

//! Driftsync: declarative reconciliation of remote cloud resources
//!
//! This crate converges remote resources — managed filesystem mount
//! targets and CDN services — to a desired state described in a manifest.
//! Reconcilers consume provider capabilities through traits; HTTP clients
//! for the two provider APIs live in [`provider`].

pub mod config;
pub mod error;
pub mod manifest;
pub mod provider;
pub mod reconcile;
pub mod spec;
pub mod telemetry;

pub use crate::error::{Error, Result};

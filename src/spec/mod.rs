//! Desired-state model for managed resources
//!
//! This module defines the specs callers hand to the reconcilers: what a
//! resource should look like, and whether it should exist at all.

mod cdn_service;
mod mount_target;
mod types;


pub use cdn_service::{BackendSpec, CdnServiceSpec};
pub use mount_target::MountTargetSpec;
pub use types::{DesiredState, SpecValidationError};

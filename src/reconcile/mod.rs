//! Reconciliation of desired specs against provider state
//!
//! Each reconciler compares one desired spec with what the provider
//! reports and issues the calls needed to converge, reporting whether
//! anything changed. Calls are independent: nothing is cached between
//! invocations.

mod cdn_service;
mod mount_target;


pub use cdn_service::reconcile_cdn_service;
pub use mount_target::reconcile_mount_target;

/// Outcome of one reconcile call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconciliation<H> {
    /// True when any provider mutation was applied
    pub changed: bool,
    /// Resulting resource attributes, when the resource exists after the call
    pub resource: Option<H>,
}

impl<H> Reconciliation<H> {
    /// The remote side already matched the desired state
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            resource: None,
        }
    }

    /// The resource was removed
    pub fn deleted() -> Self {
        Self {
            changed: true,
            resource: None,
        }
    }

    /// The resource was created or brought up to date
    pub fn converged(resource: H) -> Self {
        Self {
            changed: true,
            resource: Some(resource),
        }
    }
}

//! CDN service reconciliation
//!
//! The composite-resource flow: look the service up by name, then either
//! delete it or replay the full desired configuration into a fresh draft
//! version and activate it. Steps run strictly in order; the first failure
//! aborts the call and whatever was already applied stays on the provider
//! side. There is no rollback: an aborted apply leaves a partially
//! configured, inactive draft behind, and the previously active version
//! keeps serving traffic.

use tracing::{info, instrument};

use crate::error::{Error, Result};
use crate::provider::{CdnProvider, ServiceHandle};
use crate::spec::{CdnServiceSpec, DesiredState};

use super::Reconciliation;

/// Converge a CDN service to the desired state
///
/// Re-applying `present` against an existing service drafts a new version
/// and re-applies every domain and backend before activating it, even when
/// the live configuration already matches. The end state is idempotent;
/// the provider calls are not.
#[instrument(skip_all, fields(service = %spec.name, state = %desired))]
pub async fn reconcile_cdn_service<P>(
    desired: DesiredState,
    spec: &CdnServiceSpec,
    provider: &P,
) -> Result<Reconciliation<ServiceHandle>>
where
    P: CdnProvider + Sync,
{
    spec.validate(desired)
        .map_err(|e| Error::InvalidSpec(e.to_string()))?;

    let existing = provider
        .find_service_by_name(&spec.name)
        .await
        .map_err(|e| e.at_step("find_service"))?;

    match desired {
        DesiredState::Absent => match existing {
            None => {
                info!("Service {} already absent", spec.name);
                Ok(Reconciliation::unchanged())
            }
            Some(service) => {
                provider
                    .delete_service(&service.id)
                    .await
                    .map_err(|e| e.at_step("delete_service"))?;
                info!("Deleted service {} ({})", spec.name, service.id);
                Ok(Reconciliation::deleted())
            }
        },
        DesiredState::Present => {
            let service = match existing {
                Some(service) => service,
                None => {
                    let account = provider
                        .current_account()
                        .await
                        .map_err(|e| e.at_step("current_account"))?;
                    let created = provider
                        .create_service(&account.id, &spec.name)
                        .await
                        .map_err(|e| e.at_step("create_service"))?;
                    info!("Created service {} ({})", spec.name, created.id);
                    created
                }
            };

            // Always draft a fresh version; the active configuration keeps
            // serving until the activate call below.
            let version = provider
                .create_version(&service.id)
                .await
                .map_err(|e| e.at_step("create_version"))?;

            for domain in &spec.domains {
                provider
                    .create_domain(&service.id, version.number, domain)
                    .await
                    .map_err(|e| Error::ProviderError {
                        step: "create_domain",
                        message: format!("domain {domain}: {e}"),
                    })?;
            }

            for backend in &spec.backends {
                provider
                    .create_backend(&service.id, version.number, backend)
                    .await
                    .map_err(|e| Error::ProviderError {
                        step: "create_backend",
                        message: format!("{}: {e}", backend.describe()),
                    })?;
            }

            provider
                .activate_version(&service.id, version.number)
                .await
                .map_err(|e| e.at_step("activate_version"))?;
            info!(
                "Activated version {} of service {}",
                version.number, spec.name
            );

            let refreshed = provider
                .find_service_by_name(&spec.name)
                .await
                .map_err(|e| e.at_step("refresh_service"))?
                .ok_or_else(|| Error::ProviderError {
                    step: "refresh_service",
                    message: format!("service {} disappeared after activation", spec.name),
                })?;

            Ok(Reconciliation::converged(refreshed))
        }
    }
}

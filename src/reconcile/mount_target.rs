//! Mount target reconciliation
//!
//! The simple-resource flow: no lookup before mutating. Deletion is
//! idempotent (a target that is already gone is a no-op); creation is not.
//! The provider offers no cheap "find target for this subnet" call, so
//! re-applying `present` creates a second target. Callers that need
//! create-once semantics must keep the returned id and switch to `absent`
//! with it when tearing down.

use tracing::{info, instrument};

use crate::error::{Error, Result};
use crate::provider::{CreateMountTarget, MountTargetHandle, MountTargetProvider};
use crate::spec::{DesiredState, MountTargetSpec};

use super::Reconciliation;

/// Converge a mount target to the desired state
#[instrument(skip_all, fields(state = %desired))]
pub async fn reconcile_mount_target<P>(
    desired: DesiredState,
    spec: &MountTargetSpec,
    provider: &P,
) -> Result<Reconciliation<MountTargetHandle>>
where
    P: MountTargetProvider + Sync,
{
    spec.validate(desired)
        .map_err(|e| Error::InvalidSpec(e.to_string()))?;

    match desired {
        DesiredState::Absent => {
            // validate() guarantees the id is present
            let Some(id) = spec.mount_target_id.as_deref() else {
                return Err(Error::InvalidSpec(
                    "mountTargetId is required when state is absent".to_string(),
                ));
            };

            match provider.delete_mount_target(id).await {
                Ok(()) => {
                    info!("Deleted mount target {}", id);
                    Ok(Reconciliation::deleted())
                }
                Err(e) if e.is_not_found() => {
                    info!("Mount target {} already absent", id);
                    Ok(Reconciliation::unchanged())
                }
                Err(e) => Err(e.at_step("delete_mount_target")),
            }
        }
        DesiredState::Present => {
            // validate() guarantees both ids are present
            let (Some(filesystem_id), Some(subnet_id)) =
                (spec.filesystem_id.as_deref(), spec.subnet_id.as_deref())
            else {
                return Err(Error::InvalidSpec(
                    "filesystemId and subnetId are required when state is present".to_string(),
                ));
            };

            let params = CreateMountTarget {
                filesystem_id: filesystem_id.to_string(),
                subnet_id: subnet_id.to_string(),
                ip_address: spec.ip_address.clone(),
                security_group_ids: spec.security_group_ids.clone(),
            };

            let handle = provider
                .create_mount_target(&params)
                .await
                .map_err(|e| e.at_step("create_mount_target"))?;

            info!(
                "Created mount target {} on filesystem {}",
                handle.id, handle.filesystem_id
            );
            Ok(Reconciliation::converged(handle))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Fake filestore provider with a scripted delete outcome and a call log
    struct FakeFilestore {
        delete_result: Option<Error>,
        calls: Mutex<Vec<String>>,
        created: AtomicU32,
    }

    impl FakeFilestore {
        fn new() -> Self {
            Self {
                delete_result: None,
                calls: Mutex::new(Vec::new()),
                created: AtomicU32::new(0),
            }
        }

        fn failing_delete(error: Error) -> Self {
            Self {
                delete_result: Some(error),
                ..Self::new()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MountTargetProvider for FakeFilestore {
        async fn create_mount_target(
            &self,
            params: &CreateMountTarget,
        ) -> Result<MountTargetHandle> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("create {}", params.filesystem_id));
            let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(MountTargetHandle {
                id: format!("fsmt-{n}"),
                filesystem_id: params.filesystem_id.clone(),
                subnet_id: params.subnet_id.clone(),
                ip_address: params.ip_address.clone(),
                security_group_ids: params.security_group_ids.clone().unwrap_or_default(),
                lifecycle_state: Some("creating".to_string()),
            })
        }

        async fn delete_mount_target(&self, mount_target_id: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("delete {mount_target_id}"));
            match &self.delete_result {
                None => Ok(()),
                Some(Error::NotFound) => Err(Error::NotFound),
                Some(e) => Err(Error::ApiError {
                    status: 500,
                    message: e.to_string(),
                }),
            }
        }
    }

    fn deletion_spec(id: &str) -> MountTargetSpec {
        MountTargetSpec {
            mount_target_id: Some(id.to_string()),
            ..Default::default()
        }
    }

    fn creation_spec() -> MountTargetSpec {
        MountTargetSpec {
            mount_target_id: None,
            filesystem_id: Some("fs-1".to_string()),
            subnet_id: Some("subnet-1".to_string()),
            ip_address: None,
            security_group_ids: Some(vec!["sg-1".to_string()]),
        }
    }

    /// Deleting a target that is already gone reports no change
    #[tokio::test]
    async fn test_delete_not_found_is_noop() {
        let provider = FakeFilestore::failing_delete(Error::NotFound);
        let result =
            reconcile_mount_target(DesiredState::Absent, &deletion_spec("fsmt-1"), &provider)
                .await
                .unwrap();

        assert!(!result.changed);
        assert!(result.resource.is_none());
        assert_eq!(provider.calls(), vec!["delete fsmt-1"]);
    }

    #[tokio::test]
    async fn test_delete_reports_change() {
        let provider = FakeFilestore::new();
        let result =
            reconcile_mount_target(DesiredState::Absent, &deletion_spec("fsmt-1"), &provider)
                .await
                .unwrap();

        assert!(result.changed);
        assert!(result.resource.is_none());
    }

    #[tokio::test]
    async fn test_delete_failure_is_provider_error() {
        let provider = FakeFilestore::failing_delete(Error::ApiError {
            status: 500,
            message: "internal".to_string(),
        });
        let err =
            reconcile_mount_target(DesiredState::Absent, &deletion_spec("fsmt-1"), &provider)
                .await
                .unwrap_err();

        match err {
            Error::ProviderError { step, .. } => assert_eq!(step, "delete_mount_target"),
            other => panic!("expected ProviderError, got {other:?}"),
        }
    }

    /// Supplying both an id and creation attributes fails before any call
    #[tokio::test]
    async fn test_mutual_exclusivity_rejected_without_provider_calls() {
        let provider = FakeFilestore::new();
        let mut spec = creation_spec();
        spec.mount_target_id = Some("fsmt-1".to_string());

        let err = reconcile_mount_target(DesiredState::Present, &spec, &provider)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidSpec(_)));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_returns_handle() {
        let provider = FakeFilestore::new();
        let result = reconcile_mount_target(DesiredState::Present, &creation_spec(), &provider)
            .await
            .unwrap();

        assert!(result.changed);
        let handle = result.resource.unwrap();
        assert_eq!(handle.id, "fsmt-1");
        assert_eq!(handle.filesystem_id, "fs-1");
        assert_eq!(handle.security_group_ids, vec!["sg-1"]);
    }

    /// Re-applying `present` creates a second target: creation does not
    /// dedup, as there is no lookup before the create call.
    #[tokio::test]
    async fn test_create_twice_creates_two_targets() {
        let provider = FakeFilestore::new();
        let spec = creation_spec();

        let first = reconcile_mount_target(DesiredState::Present, &spec, &provider)
            .await
            .unwrap();
        let second = reconcile_mount_target(DesiredState::Present, &spec, &provider)
            .await
            .unwrap();

        let first_id = first.resource.unwrap().id;
        let second_id = second.resource.unwrap().id;
        assert_ne!(first_id, second_id);
        assert_eq!(provider.calls(), vec!["create fs-1", "create fs-1"]);
    }
}

//! Mount target specification for managed network filesystems

use serde::{Deserialize, Serialize};

use super::types::{DesiredState, SpecValidationError};

/// Desired state of a filesystem mount target
///
/// Identity and creation attributes are mutually exclusive inputs:
/// `mount_target_id` addresses an existing target for deletion, while the
/// remaining fields describe a fresh target to create. Supplying both is a
/// caller error, rejected before any provider call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountTargetSpec {
    /// ID of an existing mount target (used for state `absent`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_target_id: Option<String>,

    /// ID of the filesystem the target attaches to (used for state `present`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filesystem_id: Option<String>,

    /// Subnet the target is created in (used for state `present`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,

    /// Fixed IP address for the target; assigned by the provider when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    /// Security groups applied to the target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_group_ids: Option<Vec<String>>,
}

impl MountTargetSpec {
    /// Validate the spec against the requested state
    ///
    /// `mount_target_id` is pairwise exclusive with every creation
    /// attribute. Deletion requires the id; creation requires
    /// `filesystem_id` and `subnet_id` and forbids the id.
    pub fn validate(&self, desired: DesiredState) -> Result<(), SpecValidationError> {
        if self.mount_target_id.is_some() {
            let creation_fields = [
                ("filesystemId", self.filesystem_id.is_some()),
                ("subnetId", self.subnet_id.is_some()),
                ("ipAddress", self.ip_address.is_some()),
                ("securityGroupIds", self.security_group_ids.is_some()),
            ];
            for (field, supplied) in creation_fields {
                if supplied {
                    return Err(SpecValidationError::new(
                        field,
                        "cannot be combined with mountTargetId",
                        "supply mountTargetId alone to delete a target, or creation attributes alone to create one",
                    ));
                }
            }
        }

        match desired {
            DesiredState::Absent => {
                if self.mount_target_id.is_none() {
                    return Err(SpecValidationError::new(
                        "mountTargetId",
                        "required when state is absent",
                        "set mountTargetId to the id of the target to delete",
                    ));
                }
            }
            DesiredState::Present => {
                if self.mount_target_id.is_some() {
                    return Err(SpecValidationError::new(
                        "mountTargetId",
                        "cannot be supplied when state is present",
                        "creation always provisions a fresh target; drop mountTargetId",
                    ));
                }
                if self.filesystem_id.is_none() {
                    return Err(SpecValidationError::new(
                        "filesystemId",
                        "required when state is present",
                        "set filesystemId to the filesystem the target attaches to",
                    ));
                }
                if self.subnet_id.is_none() {
                    return Err(SpecValidationError::new(
                        "subnetId",
                        "required when state is present",
                        "set subnetId to the subnet the target is created in",
                    ));
                }
            }
        }

        Ok(())
    }
}

//! Desired-state manifest loading
//!
//! A manifest is a YAML document listing the resources to converge. Each
//! entry pairs a spec with a target state; `state` defaults to `present`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::spec::{CdnServiceSpec, DesiredState, MountTargetSpec};

/// One mount target entry in a manifest
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountTargetEntry {
    #[serde(default)]
    pub state: DesiredState,
    #[serde(flatten)]
    pub spec: MountTargetSpec,
}

/// One CDN service entry in a manifest
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdnServiceEntry {
    #[serde(default)]
    pub state: DesiredState,
    #[serde(flatten)]
    pub spec: CdnServiceSpec,
}

/// Full desired-state manifest
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub mount_targets: Vec<MountTargetEntry>,
    #[serde(default)]
    pub cdn_services: Vec<CdnServiceEntry>,
}

impl Manifest {
    /// Load a manifest from a YAML file
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("cannot read manifest {}: {e}", path.display()))
        })?;
        Self::from_yaml(&raw)
    }

    /// Parse a manifest from a YAML string
    pub fn from_yaml(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).map_err(|e| Error::ConfigError(format!("malformed manifest: {e}")))
    }

    pub fn is_empty(&self) -> bool {
        self.mount_targets.is_empty() && self.cdn_services.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_manifest() {
        let yaml = r#"
mountTargets:
  - filesystemId: fs-12345678
    subnetId: subnet-d32632bb
    securityGroupIds: [sg-1234567]
  - state: absent
    mountTargetId: fsmt-00112233
cdnServices:
  - name: my-service
    domains: [uk.example.com, example.com]
    backends:
      - name: elb
        address: myelb.us-east-1.example.com
        port: 80
        weight: 100
  - state: absent
    name: retired-service
"#;
        let manifest = Manifest::from_yaml(yaml).unwrap();

        assert_eq!(manifest.mount_targets.len(), 2);
        assert_eq!(manifest.mount_targets[0].state, DesiredState::Present);
        assert_eq!(
            manifest.mount_targets[0].spec.filesystem_id.as_deref(),
            Some("fs-12345678")
        );
        assert_eq!(manifest.mount_targets[1].state, DesiredState::Absent);
        assert_eq!(
            manifest.mount_targets[1].spec.mount_target_id.as_deref(),
            Some("fsmt-00112233")
        );

        assert_eq!(manifest.cdn_services.len(), 2);
        assert_eq!(manifest.cdn_services[0].state, DesiredState::Present);
        assert_eq!(manifest.cdn_services[0].spec.domains.len(), 2);
        assert_eq!(manifest.cdn_services[0].spec.backends[0].weight, Some(100));
        assert_eq!(manifest.cdn_services[1].state, DesiredState::Absent);
    }

    #[test]
    fn test_state_defaults_to_present() {
        let manifest = Manifest::from_yaml("cdnServices:\n  - name: svc\n").unwrap();
        assert_eq!(manifest.cdn_services[0].state, DesiredState::Present);
    }

    #[test]
    fn test_empty_document_is_empty_manifest() {
        let manifest = Manifest::from_yaml("{}").unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        let err = Manifest::from_yaml("cdnServices: [missing").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_unknown_state_rejected() {
        let err = Manifest::from_yaml("cdnServices:\n  - name: svc\n    state: paused\n")
            .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }
}

//! Wire types for the Nebula REST API.
//!
//! Field names follow the fixed JSON layout of the remote API, so serde
//! renames are load-bearing here.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A tenant-scoping organization, identified by (provider, name).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Org {
    /// Numeric organization id.
    pub id: i64,
    /// Organization name within the provider.
    pub name: String,
    /// Source provider, e.g. `GITHUB`.
    pub provider: String,
}

impl Org {
    /// The `provider/name` form used on the command line.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.provider, self.name)
    }
}

/// Managed-cluster placement descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ske {
    /// Cluster-engine identifier.
    #[serde(rename = "name")]
    pub id: String,
    /// Cloud the cluster runs in.
    pub cloud: String,
    /// Cloud region.
    pub region: String,
}

/// A managed compute cluster owned by one organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    /// Numeric cluster id.
    pub id: i64,
    /// Cluster name, unique within the organization.
    pub name: String,
    /// Placement descriptor.
    pub ske: Ske,
    /// Owning organization id.
    #[serde(rename = "orgId")]
    pub org_id: i64,
    /// Cluster type.
    #[serde(rename = "type", default)]
    pub cluster_type: String,
}

/// Fine-grained namespace lifecycle state, driven entirely server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Queued for placement.
    Scheduled,
    /// Containers coming up.
    Starting,
    /// Fully up.
    Running,
    /// Pause requested, winding down.
    Pausing,
    /// Paused.
    Paused,
    /// Delete requested, tearing down.
    Removing,
    /// Gone.
    Removed,
    /// A phase this client version does not know.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Scheduled => "SCHEDULED",
            Self::Starting => "STARTING",
            Self::Running => "RUNNING",
            Self::Pausing => "PAUSING",
            Self::Paused => "PAUSED",
            Self::Removing => "REMOVING",
            Self::Removed => "REMOVED",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Coarse user-facing namespace state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Running or on its way up.
    Active,
    /// Paused by the user.
    Pause,
    /// Deleted; cannot be started again.
    Inactive,
    /// A status this client version does not know.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Active => "ACTIVE",
            Self::Pause => "PAUSE",
            Self::Inactive => "INACTIVE",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// An isolated running environment created from a source commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Namespace {
    /// Numeric namespace id.
    pub id: i64,
    /// Kubernetes namespace name.
    #[serde(rename = "name")]
    pub namespace: String,
    /// User-chosen alias ("instance name").
    #[serde(rename = "instanceName")]
    pub alias: String,
    /// Namespace type.
    #[serde(rename = "type", default)]
    pub ns_type: String,
    /// Fine-grained lifecycle state.
    pub phase: Phase,
    /// Coarse user-facing state.
    pub status: Status,
    /// Access level.
    #[serde(default)]
    pub access: String,
    /// Public base URL of the namespace.
    #[serde(default)]
    pub url: String,
}

impl Namespace {
    /// Derive the public hostname of a service exposed in this namespace.
    ///
    /// The scheme prefix of [`Namespace::url`] is replaced by a
    /// `p{port}-{service}--` host prefix, matching the platform's ingress
    /// naming.
    #[must_use]
    pub fn service_url(&self, service_name: &str, port: u16) -> String {
        let rest = self.url.strip_prefix("https://").unwrap_or(&self.url);
        format!("https://p{port}-{service_name}--{rest}")
    }
}

/// Minimal mirror of the Kubernetes object metadata we consume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectMeta {
    /// Resource name.
    #[serde(default)]
    pub name: String,
    /// Resource labels.
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

/// A Kubernetes service inside a namespace; only metadata is consumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Service {
    /// Object metadata (name, labels).
    #[serde(default)]
    pub metadata: ObjectMeta,
}

/// Kubernetes-style service list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceList {
    /// Services in the namespace.
    #[serde(default)]
    pub items: Vec<Service>,
}

/// Resources exposed by `/namespace/{name}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamespaceResources {
    /// Services in the namespace.
    #[serde(default)]
    pub services: ServiceList,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn namespace(phase: Phase, status: Status) -> Namespace {
        Namespace {
            id: 42,
            namespace: "ns-42".into(),
            alias: "myalias".into(),
            ns_type: "dev".into(),
            phase,
            status,
            access: "private".into(),
            url: "https://ns-42.nebula.cloud".into(),
        }
    }

    #[test]
    fn namespace_decodes_wire_names() {
        let json = r#"{
            "id": 7,
            "name": "ns-7",
            "instanceName": "demo",
            "type": "dev",
            "phase": "RUNNING",
            "status": "ACTIVE",
            "access": "private",
            "url": "https://ns-7.nebula.cloud"
        }"#;
        let ns: Namespace = serde_json::from_str(json).expect("decodes");
        assert_eq!(ns.alias, "demo");
        assert_eq!(ns.namespace, "ns-7");
        assert_eq!(ns.phase, Phase::Running);
        assert_eq!(ns.status, Status::Active);
    }

    #[test]
    fn unknown_phase_is_tolerated() {
        let json = r#"{
            "id": 7,
            "name": "ns-7",
            "instanceName": "demo",
            "phase": "HIBERNATING",
            "status": "ACTIVE"
        }"#;
        let ns: Namespace = serde_json::from_str(json).expect("decodes");
        assert_eq!(ns.phase, Phase::Unknown);
    }

    #[test]
    fn cluster_decodes_ske() {
        let json = r#"{
            "id": 3,
            "name": "prod",
            "orgId": 11,
            "type": "standard",
            "ske": {"name": "ske-1", "cloud": "gcp", "region": "us-west2"}
        }"#;
        let cluster: Cluster = serde_json::from_str(json).expect("decodes");
        assert_eq!(cluster.org_id, 11);
        assert_eq!(cluster.ske.cloud, "gcp");
        assert_eq!(cluster.ske.region, "us-west2");
    }

    #[test]
    fn service_url_prefixes_port_and_name() {
        let ns = namespace(Phase::Running, Status::Active);
        assert_eq!(
            ns.service_url("shell-5xq", 57682),
            "https://p57682-shell-5xq--ns-42.nebula.cloud"
        );
    }

    #[test]
    fn org_qualified_name() {
        let org = Org {
            id: 1,
            name: "acme".into(),
            provider: "GITHUB".into(),
        };
        assert_eq!(org.qualified_name(), "GITHUB/acme");
    }

    #[test]
    fn service_list_decodes_labels() {
        let json = r#"{
            "services": {"items": [
                {"metadata": {"name": "web", "labels": {}}},
                {"metadata": {"name": "shell-5xq",
                              "labels": {"resource.nebula.cloud/system": "shell"}}}
            ]}
        }"#;
        let res: NamespaceResources = serde_json::from_str(json).expect("decodes");
        assert_eq!(res.services.items.len(), 2);
        assert_eq!(res.services.items[1].metadata.name, "shell-5xq");
    }

    #[test]
    fn phase_display_round_trip() {
        assert_eq!(Phase::Scheduled.to_string(), "SCHEDULED");
        assert_eq!(Phase::Removed.to_string(), "REMOVED");
        let p: Phase = serde_json::from_str("\"PAUSING\"").expect("decodes");
        assert_eq!(p, Phase::Pausing);
    }
}

//! Authenticated REST client for organizations, clusters, and namespaces.

use std::collections::HashMap;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::auth::Credentials;
use crate::commit::CommitRef;
use crate::error::{check_status, ApiError};
use crate::constants::{LABEL_KEY_RESOURCE_SYSTEM, LABEL_VALUE_SYSTEM_SHELL};
use crate::types::{Cluster, Namespace, NamespaceResources, Org, Service};

/// Organization path parameters, validated at construction.
///
/// Replaces accumulate-then-check builder state: a scope that exists is a
/// scope that is complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgScope {
    provider: String,
    org: String,
}

impl OrgScope {
    /// Create an organization scope.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParams`] if either part is empty.
    pub fn new(provider: impl Into<String>, org: impl Into<String>) -> Result<Self, ApiError> {
        let provider = provider.into();
        let org = org.into();
        if provider.is_empty() || org.is_empty() {
            return Err(ApiError::InvalidParams(
                "org information is not set, both provider and org are required".into(),
            ));
        }
        Ok(Self { provider, org })
    }

    /// Scope for an already-fetched organization.
    #[must_use]
    pub fn of(org: &Org) -> Self {
        Self {
            provider: org.provider.clone(),
            org: org.name.clone(),
        }
    }

    /// Provider part of the scope.
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Organization name part of the scope.
    #[must_use]
    pub fn org(&self) -> &str {
        &self.org
    }

    fn clusters_path(&self) -> String {
        format!("/orgs/{}/{}/vc", self.provider, self.org)
    }
}

/// Cluster path parameters: an org scope plus a cluster id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterScope {
    org: OrgScope,
    cluster_id: i64,
}

impl ClusterScope {
    /// Create a cluster scope.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParams`] if the cluster id is zero.
    pub fn new(org: OrgScope, cluster_id: i64) -> Result<Self, ApiError> {
        if cluster_id == 0 {
            return Err(ApiError::InvalidParams("cluster id is not set".into()));
        }
        Ok(Self { org, cluster_id })
    }

    /// The enclosing organization scope.
    #[must_use]
    pub fn org(&self) -> &OrgScope {
        &self.org
    }

    /// Numeric cluster id.
    #[must_use]
    pub fn cluster_id(&self) -> i64 {
        self.cluster_id
    }

    fn instances_path(&self) -> String {
        format!("{}/{}/instance", self.org.clusters_path(), self.cluster_id)
    }

    fn instance_path(&self, namespace_id: i64, op: Option<&str>) -> String {
        match op {
            Some(op) => format!("{}/{namespace_id}/{op}", self.instances_path()),
            None => format!("{}/{namespace_id}", self.instances_path()),
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateNamespaceBody<'a> {
    #[serde(flatten)]
    commit: &'a CommitRef,
    #[serde(rename = "instanceName")]
    instance_name: &'a str,
}

/// REST client for the Nebula API.
///
/// Every call attaches the `Authorization: token …` header and decodes the
/// JSON response into a typed value.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    credentials: Credentials,
}

impl ApiClient {
    /// Create a client with explicit credentials.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
        }
    }

    /// Create a client from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the access token is unset.
    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self::new(Credentials::from_env()?))
    }

    /// Credentials backing this client.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        overrides: &HashMap<u16, &str>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.credentials.api_server());
        debug!(%method, %url, "api request");

        let mut req = self
            .http
            .request(method, &url)
            .header("Authorization", self.credentials.authorization_header());
        if let Some(body) = body {
            req = req.json(&body);
        }

        let resp = req.send().await?;
        check_status(resp.status(), overrides)?;

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None, &HashMap::new()).await
    }

    // ------------------------------------------------------------------
    // Organizations
    // ------------------------------------------------------------------

    /// List organizations the token has access to.
    pub async fn list_orgs(&self) -> Result<Vec<Org>, ApiError> {
        self.get("/orgs/").await
    }

    /// Find an organization by its `provider/name` form.
    ///
    /// Linear scan over the full list: O(n), first match, case-sensitive
    /// exact match.
    pub async fn find_org(&self, qualified_name: &str) -> Result<Org, ApiError> {
        let orgs = self.list_orgs().await?;
        orgs.into_iter()
            .find(|o| o.qualified_name() == qualified_name)
            .ok_or_else(|| ApiError::NotFound(format!("org '{qualified_name}'")))
    }

    // ------------------------------------------------------------------
    // Clusters
    // ------------------------------------------------------------------

    /// List clusters of an organization.
    pub async fn list_clusters(&self, scope: &OrgScope) -> Result<Vec<Cluster>, ApiError> {
        self.get(&scope.clusters_path()).await
    }

    /// Find a cluster by name within an organization.
    ///
    /// Linear scan over the full list: O(n), first match, case-sensitive
    /// exact match.
    pub async fn find_cluster(&self, scope: &OrgScope, name: &str) -> Result<Cluster, ApiError> {
        let clusters = self.list_clusters(scope).await?;
        clusters
            .into_iter()
            .find(|c| c.name == name)
            .ok_or_else(|| ApiError::NotFound(format!("cluster '{name}'")))
    }

    // ------------------------------------------------------------------
    // Namespaces
    // ------------------------------------------------------------------

    /// List namespaces of a cluster.
    pub async fn list_namespaces(&self, scope: &ClusterScope) -> Result<Vec<Namespace>, ApiError> {
        self.get(&scope.instances_path()).await
    }

    /// Find a namespace by alias within a cluster.
    ///
    /// Linear scan over the full list: O(n), first match, case-sensitive
    /// exact match.
    pub async fn find_namespace(
        &self,
        scope: &ClusterScope,
        alias: &str,
    ) -> Result<Namespace, ApiError> {
        let namespaces = self.list_namespaces(scope).await?;
        namespaces
            .into_iter()
            .find(|n| n.alias == alias)
            .ok_or_else(|| ApiError::NotFound(format!("namespace alias '{alias}'")))
    }

    /// Create a namespace bound to a source commit.
    ///
    /// A conflicting alias surfaces as "Already exists" (HTTP 409).
    pub async fn create_namespace(
        &self,
        scope: &ClusterScope,
        alias: &str,
        commit: &CommitRef,
    ) -> Result<Namespace, ApiError> {
        let body = serde_json::to_value(CreateNamespaceBody {
            commit,
            instance_name: alias,
        })
        .map_err(|e| ApiError::Decode(e.to_string()))?;

        let overrides = HashMap::from([(409u16, "Already exists")]);
        self.request(Method::POST, &scope.instances_path(), Some(body), &overrides)
            .await
    }

    /// Fetch a namespace by id.
    pub async fn get_namespace(
        &self,
        scope: &ClusterScope,
        namespace_id: i64,
    ) -> Result<Namespace, ApiError> {
        self.get(&scope.instance_path(namespace_id, None)).await
    }

    /// Delete a namespace by id. The server transitions it through
    /// REMOVING to REMOVED.
    pub async fn delete_namespace(
        &self,
        scope: &ClusterScope,
        namespace_id: i64,
    ) -> Result<Namespace, ApiError> {
        self.request(
            Method::DELETE,
            &scope.instance_path(namespace_id, None),
            None,
            &HashMap::new(),
        )
        .await
    }

    /// Resume a paused namespace.
    pub async fn resume_namespace(
        &self,
        scope: &ClusterScope,
        namespace_id: i64,
    ) -> Result<Namespace, ApiError> {
        self.request(
            Method::PUT,
            &scope.instance_path(namespace_id, Some("resume")),
            None,
            &HashMap::new(),
        )
        .await
    }

    /// Pause an active namespace.
    pub async fn pause_namespace(
        &self,
        scope: &ClusterScope,
        namespace_id: i64,
    ) -> Result<Namespace, ApiError> {
        self.request(
            Method::PUT,
            &scope.instance_path(namespace_id, Some("pause")),
            None,
            &HashMap::new(),
        )
        .await
    }

    // ------------------------------------------------------------------
    // Shell service
    // ------------------------------------------------------------------

    /// Start the shell service inside a namespace.
    pub async fn start_shell(
        &self,
        scope: &ClusterScope,
        namespace_id: i64,
    ) -> Result<(), ApiError> {
        let url = format!(
            "{}{}",
            self.credentials.api_server(),
            scope.instance_path(namespace_id, Some("shell"))
        );
        let resp = self
            .http
            .post(&url)
            .header("Authorization", self.credentials.authorization_header())
            .send()
            .await?;
        check_status(resp.status(), &HashMap::new())
    }

    /// Stop the shell service inside a namespace.
    pub async fn stop_shell(
        &self,
        scope: &ClusterScope,
        namespace_id: i64,
    ) -> Result<(), ApiError> {
        let url = format!(
            "{}{}",
            self.credentials.api_server(),
            scope.instance_path(namespace_id, Some("shell"))
        );
        let resp = self
            .http
            .delete(&url)
            .header("Authorization", self.credentials.authorization_header())
            .send()
            .await?;
        check_status(resp.status(), &HashMap::new())
    }

    // ------------------------------------------------------------------
    // Namespace resources
    // ------------------------------------------------------------------

    /// Fetch the Kubernetes resources of a namespace by its k8s name.
    pub async fn namespace_resources(&self, name: &str) -> Result<NamespaceResources, ApiError> {
        if name.is_empty() {
            return Err(ApiError::InvalidParams("namespace name is not set".into()));
        }
        self.get(&format!("/namespace/{name}")).await
    }

    /// Resolve the shell system service of a namespace.
    ///
    /// Scans the namespace's services for the
    /// `resource.nebula.cloud/system: shell` label.
    pub async fn shell_service(&self, name: &str) -> Result<Service, ApiError> {
        let resources = self.namespace_resources(name).await?;
        find_shell_service(&resources)
            .ok_or_else(|| ApiError::NotFound(format!("shell service in namespace '{name}'")))
    }
}

/// First service carrying the shell system label, if any.
#[must_use]
pub fn find_shell_service(resources: &NamespaceResources) -> Option<Service> {
    resources
        .services
        .items
        .iter()
        .find(|s| {
            s.metadata.labels.get(LABEL_KEY_RESOURCE_SYSTEM).map(String::as_str)
                == Some(LABEL_VALUE_SYSTEM_SHELL)
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ObjectMeta, ServiceList};

    fn org_scope() -> OrgScope {
        OrgScope::new("GITHUB", "acme").expect("valid scope")
    }

    #[test]
    fn org_scope_requires_both_parts() {
        assert!(OrgScope::new("", "acme").is_err());
        assert!(OrgScope::new("GITHUB", "").is_err());
        assert!(OrgScope::new("GITHUB", "acme").is_ok());
    }

    #[test]
    fn cluster_scope_rejects_zero_id() {
        let err = ClusterScope::new(org_scope(), 0).unwrap_err();
        assert!(matches!(err, ApiError::InvalidParams(_)));
    }

    #[test]
    fn cluster_paths() {
        let scope = ClusterScope::new(org_scope(), 12).expect("valid scope");
        assert_eq!(scope.instances_path(), "/orgs/GITHUB/acme/vc/12/instance");
        assert_eq!(
            scope.instance_path(7, None),
            "/orgs/GITHUB/acme/vc/12/instance/7"
        );
        assert_eq!(
            scope.instance_path(7, Some("resume")),
            "/orgs/GITHUB/acme/vc/12/instance/7/resume"
        );
        assert_eq!(
            scope.instance_path(7, Some("shell")),
            "/orgs/GITHUB/acme/vc/12/instance/7/shell"
        );
    }

    #[test]
    fn org_clusters_path() {
        assert_eq!(org_scope().clusters_path(), "/orgs/GITHUB/acme/vc");
    }

    #[test]
    fn create_body_flattens_commit() {
        let commit: CommitRef = "GITHUB/acme/app:main#abc1".parse().expect("parses");
        let body = serde_json::to_value(CreateNamespaceBody {
            commit: &commit,
            instance_name: "myalias",
        })
        .expect("serializes");

        assert_eq!(body["provider"], "GITHUB");
        assert_eq!(body["owner"], "acme");
        assert_eq!(body["repo"], "app");
        assert_eq!(body["branch"], "main");
        assert_eq!(body["commit"], "abc1");
        assert_eq!(body["instanceName"], "myalias");
    }

    fn service(name: &str, labels: &[(&str, &str)]) -> Service {
        Service {
            metadata: ObjectMeta {
                name: name.into(),
                labels: labels
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
            },
        }
    }

    #[test]
    fn shell_service_found_by_label() {
        let resources = NamespaceResources {
            services: ServiceList {
                items: vec![
                    service("web", &[("app", "web")]),
                    service("shell-5xq", &[(LABEL_KEY_RESOURCE_SYSTEM, LABEL_VALUE_SYSTEM_SHELL)]),
                ],
            },
        };
        let shell = find_shell_service(&resources).expect("found");
        assert_eq!(shell.metadata.name, "shell-5xq");
    }

    #[test]
    fn shell_service_missing_label_is_none() {
        let resources = NamespaceResources {
            services: ServiceList {
                items: vec![service("web", &[("app", "web")])],
            },
        };
        assert!(find_shell_service(&resources).is_none());
    }

    #[tokio::test]
    async fn empty_namespace_name_is_invalid() {
        let creds = Credentials::new("tok", "https://example.invalid").expect("valid");
        let client = ApiClient::new(creds);
        let err = client.namespace_resources("").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidParams(_)));
    }
}

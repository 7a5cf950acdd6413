//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`cluster`] - cluster enumeration
//! - [`namespace`] - namespace lifecycle
//! - [`shell`] - shell service control
//! - [`tunnel`] - reverse tunnel into a namespace

pub mod cluster;
pub mod namespace;
pub mod shell;
pub mod tunnel;

pub use cluster::ClusterCommand;
pub use namespace::NamespaceCommand;
pub use shell::ShellCommand;
pub use tunnel::TunnelCommand;

use nebula_api::{ApiClient, ClusterScope, OrgScope};

use crate::cli::ScopeArgs;
use crate::error::CliError;

/// Resolve `--org`/`--cluster` flags to a validated cluster scope.
///
/// Two lookups over full list fetches, as the API has no filtered query:
/// org by `provider/name`, then cluster by name within the org.
pub(crate) async fn resolve_scope(
    client: &ApiClient,
    args: &ScopeArgs,
) -> Result<ClusterScope, CliError> {
    let org = client.find_org(&args.org).await?;
    let org_scope = OrgScope::of(&org);
    let cluster = client.find_cluster(&org_scope, &args.cluster).await?;
    Ok(ClusterScope::new(org_scope, cluster.id)?)
}

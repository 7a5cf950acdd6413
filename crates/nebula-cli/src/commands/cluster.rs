//! Cluster command implementation.

use std::collections::HashMap;
use std::io::Write;

use nebula_api::{ApiClient, Cluster, Org, OrgScope};
use tracing::warn;

use crate::cli::ClusterCommands;
use crate::error::CliError;
use crate::output::{ClusterRow, ClusterTable, OutputFormat};

/// Handler for cluster subcommands.
pub struct ClusterCommand {
    client: ApiClient,
}

impl ClusterCommand {
    /// Creates a new cluster command handler.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Executes the cluster subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if a remote call or output fails.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        command: &ClusterCommands,
    ) -> Result<(), CliError> {
        match command {
            ClusterCommands::List => self.list(out, format).await,
        }
    }

    /// List clusters across every organization the token can see.
    async fn list<W: Write>(&self, out: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let orgs = self.client.list_orgs().await?;

        let mut clusters = Vec::new();
        for org in &orgs {
            match self.client.list_clusters(&OrgScope::of(org)).await {
                Ok(mut found) => clusters.append(&mut found),
                // one unreadable org must not hide the others
                Err(e) => warn!(org = %org.qualified_name(), error = %e, "skipping org"),
            }
        }

        format.write(out, &cluster_table(&clusters, &orgs))?;
        Ok(())
    }
}

/// Join clusters with their owning orgs into display rows.
fn cluster_table(clusters: &[Cluster], orgs: &[Org]) -> ClusterTable {
    let by_id: HashMap<i64, &Org> = orgs.iter().map(|o| (o.id, o)).collect();
    ClusterTable {
        clusters: clusters
            .iter()
            .map(|c| ClusterRow::new(c, by_id.get(&c.org_id).copied()))
            .collect(),
    }
}

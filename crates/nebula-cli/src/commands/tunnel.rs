//! Tunnel command implementation.
//!
//! Resolves the namespace's shell service endpoint and hands the
//! connection parameters to the tunnel transport. Runs until terminated.

use std::io::Write;

use nebula_api::constants::{KUBE_PROXY_PORT, TUNNEL_SERVICE_PORT};
use nebula_api::ApiClient;
use tracing::info;

use crate::cli::TunnelArgs;
use crate::commands::resolve_scope;
use crate::error::CliError;
use crate::tunnel::{RemoteSpec, TunnelClient, TunnelConfig};

/// Handler for the tunnel command.
pub struct TunnelCommand {
    client: ApiClient,
}

impl TunnelCommand {
    /// Creates a new tunnel command handler.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Executes the tunnel command. Blocks until the process is
    /// terminated.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid remotes, a missing shell service, or
    /// transport failure.
    pub async fn execute<W: Write>(&self, out: &mut W, args: &TunnelArgs) -> Result<(), CliError> {
        let remotes = build_remotes(args)?;

        let scope = resolve_scope(&self.client, &args.scope).await?;
        let ns = self.client.find_namespace(&scope, &args.ns_alias).await?;
        let shell = self.client.shell_service(&ns.namespace).await?;
        let server_url = ns.service_url(&shell.metadata.name, TUNNEL_SERVICE_PORT);

        if args.kube_proxy {
            writeln!(out, "--------------------")?;
            writeln!(
                out,
                "Kubernetes API proxy localhost:{} configured\n",
                args.kube_proxy_port
            )?;
            writeln!(
                out,
                "Try 'kubectl --server localhost:{} -n {} <kubectl command>'",
                args.kube_proxy_port, ns.namespace
            )?;
            writeln!(out, "--------------------")?;
        }

        info!(server = %server_url, remotes = remotes.len(), "starting tunnel");
        let tunnel = TunnelClient::new(TunnelConfig {
            server_url,
            auth_header: self.client.credentials().authorization_header(),
            remotes,
        })?;
        tunnel.run().await
    }
}

/// Parse the remote arguments, appending the kube-proxy forward when
/// requested. At least one remote must result.
fn build_remotes(args: &TunnelArgs) -> Result<Vec<RemoteSpec>, CliError> {
    let mut remotes = args
        .remotes
        .iter()
        .map(|s| s.parse())
        .collect::<Result<Vec<RemoteSpec>, CliError>>()?;

    if args.kube_proxy {
        remotes.push(RemoteSpec {
            local_port: args.kube_proxy_port,
            remote_host: "localhost".into(),
            remote_port: KUBE_PROXY_PORT,
        });
    }

    if remotes.is_empty() {
        return Err(CliError::Command(
            "set at least one [remote] argument or the --kube-proxy flag".into(),
        ));
    }
    Ok(remotes)
}

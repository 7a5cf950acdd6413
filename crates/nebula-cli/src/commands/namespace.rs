//! Namespace lifecycle command implementation.
//!
//! Create, list, get, start, stop, and delete namespaces. With `--wait`
//! the command polls the namespace until the requested transition settles
//! and fails with a timeout error when it does not.

use std::io::Write;
use std::time::Duration;

use indicatif::ProgressBar;

use nebula_api::constants::{NS_SETTLE_TIMEOUT, STATUS_POLL_INTERVAL};
use nebula_api::poll::{self, WaitOutcome};
use nebula_api::{ApiClient, ClusterScope, CommitRef, Namespace, Phase, Status};

use crate::cli::{NamespaceCommands, ScopeArgs};
use crate::commands::resolve_scope;
use crate::error::CliError;
use crate::output::{NamespaceRow, NamespaceTable, OutputFormat};

/// Handler for namespace subcommands.
pub struct NamespaceCommand {
    client: ApiClient,
}

impl NamespaceCommand {
    /// Creates a new namespace command handler.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Executes the namespace subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails or the wait deadline passes.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        command: &NamespaceCommands,
    ) -> Result<(), CliError> {
        match command {
            NamespaceCommands::Create {
                alias,
                scope,
                project,
                wait,
            } => self.create(out, format, alias, scope, project, *wait).await,
            NamespaceCommands::List { scope } => self.list(out, format, scope).await,
            NamespaceCommands::Get { alias, scope } => self.get(out, format, alias, scope).await,
            NamespaceCommands::Start { alias, scope, wait } => {
                self.start(out, format, alias, scope, *wait).await
            }
            NamespaceCommands::Stop { alias, scope, wait } => {
                self.stop(out, format, alias, scope, *wait).await
            }
            NamespaceCommands::Delete { alias, scope, wait } => {
                self.delete(out, format, alias, scope, *wait).await
            }
        }
    }

    async fn create<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        alias: &str,
        scope_args: &ScopeArgs,
        project: &str,
        wait: bool,
    ) -> Result<(), CliError> {
        let commit: CommitRef = project.parse()?;
        let scope = resolve_scope(&self.client, scope_args).await?;

        let mut ns = self.client.create_namespace(&scope, alias, &commit).await?;
        if wait {
            ns = self
                .wait(&scope, ns, poll::start_settled, format!("{alias} created, starting ..."))
                .await?;
        }

        format.write(out, &NamespaceTable::single(&ns))?;
        Ok(())
    }

    async fn list<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        scope_args: &ScopeArgs,
    ) -> Result<(), CliError> {
        let scope = resolve_scope(&self.client, scope_args).await?;
        let namespaces = self.client.list_namespaces(&scope).await?;

        let table = NamespaceTable {
            namespaces: namespaces.iter().map(NamespaceRow::from).collect(),
        };
        format.write(out, &table)?;
        Ok(())
    }

    async fn get<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        alias: &str,
        scope_args: &ScopeArgs,
    ) -> Result<(), CliError> {
        let scope = resolve_scope(&self.client, scope_args).await?;
        let ns = self.client.find_namespace(&scope, alias).await?;
        format.write(out, &NamespaceTable::single(&ns))?;
        Ok(())
    }

    async fn start<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        alias: &str,
        scope_args: &ScopeArgs,
        wait: bool,
    ) -> Result<(), CliError> {
        let scope = resolve_scope(&self.client, scope_args).await?;
        let mut ns = self.client.find_namespace(&scope, alias).await?;
        guard_not_deleted(&ns, "start")?;

        if ns.status == Status::Pause {
            ns = self.client.resume_namespace(&scope, ns.id).await?;
        }
        if wait {
            ns = self
                .wait(&scope, ns, poll::resume_settled, format!("{alias} starting ..."))
                .await?;
        }

        format.write(out, &NamespaceTable::single(&ns))?;
        Ok(())
    }

    async fn stop<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        alias: &str,
        scope_args: &ScopeArgs,
        wait: bool,
    ) -> Result<(), CliError> {
        let scope = resolve_scope(&self.client, scope_args).await?;
        let mut ns = self.client.find_namespace(&scope, alias).await?;
        guard_not_deleted(&ns, "stop")?;

        if ns.status == Status::Active {
            ns = self.client.pause_namespace(&scope, ns.id).await?;
        }
        if wait {
            ns = self
                .wait(&scope, ns, poll::stopped, format!("{alias} stopping ..."))
                .await?;
        }

        format.write(out, &NamespaceTable::single(&ns))?;
        Ok(())
    }

    async fn delete<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        alias: &str,
        scope_args: &ScopeArgs,
        wait: bool,
    ) -> Result<(), CliError> {
        let scope = resolve_scope(&self.client, scope_args).await?;
        let ns = self.client.find_namespace(&scope, alias).await?;

        let mut ns = self.client.delete_namespace(&scope, ns.id).await?;
        if wait {
            ns = self
                .wait(&scope, ns, poll::removed, format!("deleting {alias} ..."))
                .await?;
        }

        format.write(out, &NamespaceTable::single(&ns))?;
        Ok(())
    }

    /// Poll under a spinner until `target` holds or the deadline passes.
    async fn wait(
        &self,
        scope: &ClusterScope,
        ns: Namespace,
        target: impl Fn(Phase) -> bool,
        message: String,
    ) -> Result<Namespace, CliError> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));

        let id = ns.id;
        let outcome = poll::wait_for(
            ns,
            || self.client.get_namespace(scope, id),
            target,
            STATUS_POLL_INTERVAL,
            NS_SETTLE_TIMEOUT,
        )
        .await;
        spinner.finish_and_clear();

        match outcome? {
            WaitOutcome::Reached(ns) => Ok(ns),
            WaitOutcome::TimedOut(ns) => Err(CliError::WaitTimeout {
                alias: ns.alias,
                phase: ns.phase,
            }),
        }
    }
}

/// A deleted namespace cannot be started or stopped again.
fn guard_not_deleted(ns: &Namespace, verb: &str) -> Result<(), CliError> {
    if ns.status == Status::Inactive {
        return Err(CliError::Command(format!(
            "cannot {verb} '{}' once deleted",
            ns.alias
        )));
    }
    Ok(())
}

//! Shell service command implementation.
//!
//! The shell service only exists inside a running namespace; both
//! subcommands refuse anything that is not in phase RUNNING.

use std::io::Write;

use nebula_api::{ApiClient, Namespace, Phase};

use crate::cli::{ScopeArgs, ShellCommands};
use crate::commands::resolve_scope;
use crate::error::CliError;
use crate::output::{Message, OutputFormat};

/// Handler for shell subcommands.
pub struct ShellCommand {
    client: ApiClient,
}

impl ShellCommand {
    /// Creates a new shell command handler.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Executes the shell subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace is not running or a remote call
    /// fails.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        command: &ShellCommands,
    ) -> Result<(), CliError> {
        match command {
            ShellCommands::Start { alias, scope } => self.start(out, format, alias, scope).await,
            ShellCommands::Stop { alias, scope } => self.stop(out, format, alias, scope).await,
        }
    }

    async fn start<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        alias: &str,
        scope_args: &ScopeArgs,
    ) -> Result<(), CliError> {
        let scope = resolve_scope(&self.client, scope_args).await?;
        let ns = self.client.find_namespace(&scope, alias).await?;
        guard_running(&ns)?;

        self.client.start_shell(&scope, ns.id).await?;
        format.write(out, &Message::success(format!("shell started in '{alias}'")))?;
        Ok(())
    }

    async fn stop<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        alias: &str,
        scope_args: &ScopeArgs,
    ) -> Result<(), CliError> {
        let scope = resolve_scope(&self.client, scope_args).await?;
        let ns = self.client.find_namespace(&scope, alias).await?;
        guard_running(&ns)?;

        self.client.stop_shell(&scope, ns.id).await?;
        format.write(out, &Message::success(format!("shell stopped in '{alias}'")))?;
        Ok(())
    }
}

fn guard_running(ns: &Namespace) -> Result<(), CliError> {
    if ns.phase != Phase::Running {
        return Err(CliError::Command(format!(
            "namespace '{}' is not running (phase {})",
            ns.alias, ns.phase
        )));
    }
    Ok(())
}

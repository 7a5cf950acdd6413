//! Nebula CLI binary entrypoint.
//!
//! This is the main entry point for the `nebulactl` command-line tool.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use nebula_api::ApiClient;
use nebula_cli::cli::{Cli, Commands};
use nebula_cli::commands::{ClusterCommand, NamespaceCommand, ShellCommand, TunnelCommand};
use nebula_cli::output::OutputFormat;

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), nebula_cli::CliError> {
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Version => {
            writeln!(stdout, "nebulactl v{}", env!("CARGO_PKG_VERSION"))?;
        }
        Commands::Cluster { command } => {
            let cmd = ClusterCommand::new(ApiClient::from_env()?);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
        Commands::Namespace { command } => {
            let cmd = NamespaceCommand::new(ApiClient::from_env()?);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
        Commands::Shell { command } => {
            let cmd = ShellCommand::new(ApiClient::from_env()?);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
        Commands::Tunnel(args) => {
            let cmd = TunnelCommand::new(ApiClient::from_env()?);
            cmd.execute(&mut stdout, &args).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_cli::cli::Format;

    #[test]
    fn cli_parses_version() {
        let cli = Cli::parse_from(["nebulactl", "version"]);
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn cli_respects_format_flag() {
        let cli = Cli::parse_from(["nebulactl", "--format", "json", "cluster", "list"]);
        assert_eq!(cli.format, Format::Json);
    }

    #[tokio::test]
    async fn run_version_prints_without_credentials() {
        std::env::remove_var("NEBULA_ACCESS_TOKEN");
        let cli = Cli::parse_from(["nebulactl", "version"]);
        assert!(run(cli).await.is_ok());
    }
}

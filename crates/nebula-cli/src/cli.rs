//! Command-line argument parsing with clap.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Nebula CLI - multi-tenant cluster management.
#[derive(Parser, Debug, Clone)]
#[command(name = "nebulactl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Organization and cluster selection shared by most commands.
#[derive(Args, Debug, Clone)]
pub struct ScopeArgs {
    /// Organization (e.g. GITHUB/acme).
    #[arg(long)]
    pub org: String,

    /// Name of the cluster.
    #[arg(long)]
    pub cluster: String,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Cluster management commands.
    Cluster {
        /// Cluster subcommand to execute.
        #[command(subcommand)]
        command: ClusterCommands,
    },

    /// Namespace lifecycle commands.
    Namespace {
        /// Namespace subcommand to execute.
        #[command(subcommand)]
        command: NamespaceCommands,
    },

    /// Shell service control inside a namespace.
    Shell {
        /// Shell subcommand to execute.
        #[command(subcommand)]
        command: ShellCommands,
    },

    /// Open a reverse tunnel into a running namespace.
    Tunnel(TunnelArgs),

    /// Print the client version.
    Version,
}

/// Cluster subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ClusterCommands {
    /// List all clusters across your organizations.
    List,
}

/// Namespace subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum NamespaceCommands {
    /// Create a namespace from a source commit.
    Create {
        /// Namespace alias.
        alias: String,

        #[command(flatten)]
        scope: ScopeArgs,

        /// Source commit: provider/owner/repo:branch(#commit)
        /// (e.g. GITHUB/acme/app:main, GITHUB/acme/app:trunk#d10abcd).
        #[arg(long)]
        project: String,

        /// Wait until the namespace settles.
        #[arg(long)]
        wait: bool,
    },

    /// List namespaces in a cluster.
    List {
        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Show a namespace by alias.
    Get {
        /// Namespace alias.
        alias: String,

        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Start (resume) a paused namespace.
    Start {
        /// Namespace alias.
        alias: String,

        #[command(flatten)]
        scope: ScopeArgs,

        /// Wait until the namespace settles.
        #[arg(long)]
        wait: bool,
    },

    /// Stop (pause) an active namespace.
    Stop {
        /// Namespace alias.
        alias: String,

        #[command(flatten)]
        scope: ScopeArgs,

        /// Wait until the namespace is paused.
        #[arg(long)]
        wait: bool,
    },

    /// Delete a namespace.
    Delete {
        /// Namespace alias.
        alias: String,

        #[command(flatten)]
        scope: ScopeArgs,

        /// Wait until the namespace is removed.
        #[arg(long)]
        wait: bool,
    },
}

/// Shell subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ShellCommands {
    /// Start the shell service in a running namespace.
    Start {
        /// Namespace alias.
        alias: String,

        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Stop the shell service.
    Stop {
        /// Namespace alias.
        alias: String,

        #[command(flatten)]
        scope: ScopeArgs,
    },
}

/// Arguments for the tunnel command.
#[derive(Parser, Debug, Clone)]
pub struct TunnelArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Namespace alias.
    #[arg(long = "ns-alias")]
    pub ns_alias: String,

    /// Also tunnel the Kubernetes API proxy.
    #[arg(long = "kube-proxy")]
    pub kube_proxy: bool,

    /// Local port for the Kubernetes API proxy.
    #[arg(long = "kube-proxy-port", default_value_t = 8001)]
    pub kube_proxy_port: u16,

    /// Port-forward specs: [local-port:]remote-host:remote-port.
    pub remotes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_help_does_not_panic() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_cluster_list() {
        let cli = Cli::parse_from(["nebulactl", "cluster", "list"]);
        assert!(matches!(
            cli.command,
            Commands::Cluster {
                command: ClusterCommands::List
            }
        ));
        assert_eq!(cli.format, Format::Table);
    }

    #[test]
    fn parse_namespace_create() {
        let cli = Cli::parse_from([
            "nebulactl",
            "namespace",
            "create",
            "myalias",
            "--org",
            "GITHUB/acme",
            "--cluster",
            "prod",
            "--project",
            "GITHUB/acme/app:main",
        ]);
        match cli.command {
            Commands::Namespace {
                command:
                    NamespaceCommands::Create {
                        alias,
                        scope,
                        project,
                        wait,
                    },
            } => {
                assert_eq!(alias, "myalias");
                assert_eq!(scope.org, "GITHUB/acme");
                assert_eq!(scope.cluster, "prod");
                assert_eq!(project, "GITHUB/acme/app:main");
                assert!(!wait);
            }
            _ => panic!("expected namespace create command"),
        }
    }

    #[test]
    fn parse_namespace_create_requires_project() {
        let result = Cli::try_parse_from([
            "nebulactl",
            "namespace",
            "create",
            "myalias",
            "--org",
            "GITHUB/acme",
            "--cluster",
            "prod",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_namespace_start_with_wait() {
        let cli = Cli::parse_from([
            "nebulactl",
            "namespace",
            "start",
            "demo",
            "--org",
            "GITHUB/acme",
            "--cluster",
            "prod",
            "--wait",
        ]);
        match cli.command {
            Commands::Namespace {
                command: NamespaceCommands::Start { alias, wait, .. },
            } => {
                assert_eq!(alias, "demo");
                assert!(wait);
            }
            _ => panic!("expected namespace start command"),
        }
    }

    #[test]
    fn parse_namespace_requires_org_flag() {
        let result =
            Cli::try_parse_from(["nebulactl", "namespace", "list", "--cluster", "prod"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_shell_start() {
        let cli = Cli::parse_from([
            "nebulactl", "shell", "start", "demo", "--org", "GITHUB/acme", "--cluster", "prod",
        ]);
        match cli.command {
            Commands::Shell {
                command: ShellCommands::Start { alias, scope },
            } => {
                assert_eq!(alias, "demo");
                assert_eq!(scope.cluster, "prod");
            }
            _ => panic!("expected shell start command"),
        }
    }

    #[test]
    fn parse_tunnel_with_remotes() {
        let cli = Cli::parse_from([
            "nebulactl",
            "tunnel",
            "--org",
            "GITHUB/acme",
            "--cluster",
            "prod",
            "--ns-alias",
            "demo",
            "8080:localhost:80",
            "2222:localhost:22",
        ]);
        match cli.command {
            Commands::Tunnel(args) => {
                assert_eq!(args.ns_alias, "demo");
                assert!(!args.kube_proxy);
                assert_eq!(args.kube_proxy_port, 8001);
                assert_eq!(args.remotes, vec!["8080:localhost:80", "2222:localhost:22"]);
            }
            _ => panic!("expected tunnel command"),
        }
    }

    #[test]
    fn parse_tunnel_kube_proxy_port() {
        let cli = Cli::parse_from([
            "nebulactl",
            "tunnel",
            "--org",
            "GITHUB/acme",
            "--cluster",
            "prod",
            "--ns-alias",
            "demo",
            "--kube-proxy",
            "--kube-proxy-port",
            "9001",
        ]);
        match cli.command {
            Commands::Tunnel(args) => {
                assert!(args.kube_proxy);
                assert_eq!(args.kube_proxy_port, 9001);
                assert!(args.remotes.is_empty());
            }
            _ => panic!("expected tunnel command"),
        }
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["nebulactl", "version"]);
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::parse_from(["nebulactl", "--format", "json", "cluster", "list"]);
        assert_eq!(cli.format, Format::Json);
    }
}

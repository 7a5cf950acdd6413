//! Shared constants for the Nebula API and tooling.

use std::time::Duration;

/// Default API server when `NEBULA_API_SERVER` is unset.
pub const DEFAULT_API_SERVER: &str = "https://nebula.cloud/api";

/// Environment variable holding the access token.
pub const ENV_ACCESS_TOKEN: &str = "NEBULA_ACCESS_TOKEN";

/// Environment variable overriding the API server URL.
pub const ENV_API_SERVER: &str = "NEBULA_API_SERVER";

/// Port the in-namespace tunnel service listens on.
pub const TUNNEL_SERVICE_PORT: u16 = 57682;

/// In-namespace port of the Kubernetes API proxy.
pub const KUBE_PROXY_PORT: u16 = 57683;

/// Label key marking system resources inside a namespace.
pub const LABEL_KEY_RESOURCE_SYSTEM: &str = "resource.nebula.cloud/system";

/// Label value of the shell system service.
pub const LABEL_VALUE_SYSTEM_SHELL: &str = "shell";

/// Interval between lifecycle status polls.
pub const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Deadline for a namespace to settle after create/start/stop/delete.
pub const NS_SETTLE_TIMEOUT: Duration = Duration::from_secs(10 * 60);

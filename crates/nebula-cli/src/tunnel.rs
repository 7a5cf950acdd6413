//! Tunnel transport.
//!
//! The bridge in `commands::tunnel` resolves the in-namespace shell
//! endpoint; this module carries the bytes. Each accepted local TCP
//! connection gets its own authenticated websocket to the tunnel server
//! and the two streams are copied into each other verbatim - no framing
//! of our own on top of the websocket messages.

use std::fmt;
use std::str::FromStr;

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::connect_async;
use tracing::{debug, info, warn};

use crate::error::CliError;

/// A local-to-remote port-forward specification.
///
/// Parsed from `[local-port:]remote-host:remote-port`; when the local
/// port is omitted it defaults to the remote port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSpec {
    /// Local port to listen on.
    pub local_port: u16,
    /// Host to reach inside the namespace.
    pub remote_host: String,
    /// Port to reach inside the namespace.
    pub remote_port: u16,
}

impl FromStr for RemoteSpec {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let (local, host, remote) = match parts[..] {
            [local, host, remote] => (Some(local), host, remote),
            [host, remote] => (None, host, remote),
            _ => {
                return Err(CliError::Tunnel(format!(
                    "invalid remote '{s}': expected [local-port:]remote-host:remote-port"
                )))
            }
        };

        let remote_port: u16 = remote
            .parse()
            .map_err(|_| CliError::Tunnel(format!("invalid remote port in '{s}'")))?;
        let local_port: u16 = match local {
            Some(p) => p
                .parse()
                .map_err(|_| CliError::Tunnel(format!("invalid local port in '{s}'")))?,
            None => remote_port,
        };
        if host.is_empty() {
            return Err(CliError::Tunnel(format!("invalid remote '{s}': empty host")));
        }

        Ok(Self {
            local_port,
            remote_host: host.to_string(),
            remote_port,
        })
    }
}

impl fmt::Display for RemoteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.local_port, self.remote_host, self.remote_port)
    }
}

/// Connection parameters handed to the tunnel client.
#[derive(Debug, Clone)]
pub struct TunnelConfig {
    /// Tunnel server URL (https, converted to wss for the transport).
    pub server_url: String,
    /// Full `Authorization` header value.
    pub auth_header: String,
    /// Port-forward specifications.
    pub remotes: Vec<RemoteSpec>,
}

/// Point-to-point tunnel client.
#[derive(Debug)]
pub struct TunnelClient {
    ws_url: String,
    auth_header: String,
    remotes: Vec<RemoteSpec>,
}

impl TunnelClient {
    /// Validate the configuration and build a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the server URL scheme is unsupported or no
    /// remotes were supplied.
    pub fn new(config: TunnelConfig) -> Result<Self, CliError> {
        if config.remotes.is_empty() {
            return Err(CliError::Tunnel("no remotes configured".into()));
        }
        Ok(Self {
            ws_url: websocket_url(&config.server_url)?,
            auth_header: config.auth_header,
            remotes: config.remotes,
        })
    }

    /// Serve all configured remotes until the process is terminated.
    ///
    /// # Errors
    ///
    /// Returns an error if a local listener cannot be bound or the
    /// transport fails irrecoverably.
    pub async fn run(self) -> Result<(), CliError> {
        let listeners = self
            .remotes
            .iter()
            .map(|remote| serve_remote(self.ws_url.clone(), self.auth_header.clone(), remote.clone()));
        futures::future::try_join_all(listeners).await?;
        Ok(())
    }
}

/// Convert the server URL to its websocket form.
fn websocket_url(server_url: &str) -> Result<String, CliError> {
    if let Some(rest) = server_url.strip_prefix("https://") {
        Ok(format!("wss://{rest}"))
    } else if let Some(rest) = server_url.strip_prefix("http://") {
        Ok(format!("ws://{rest}"))
    } else if server_url.starts_with("ws://") || server_url.starts_with("wss://") {
        Ok(server_url.to_string())
    } else {
        Err(CliError::Tunnel(format!(
            "unsupported tunnel server URL: {server_url}"
        )))
    }
}

async fn serve_remote(
    ws_url: String,
    auth_header: String,
    remote: RemoteSpec,
) -> Result<(), CliError> {
    let listener = TcpListener::bind(("127.0.0.1", remote.local_port))
        .await
        .map_err(|e| {
            CliError::Tunnel(format!("cannot listen on 127.0.0.1:{}: {e}", remote.local_port))
        })?;
    info!(remote = %remote, "tunnel listening");

    loop {
        let (stream, peer) = listener.accept().await?;
        debug!(%peer, remote = %remote, "tunnel connection accepted");
        let ws_url = ws_url.clone();
        let auth_header = auth_header.clone();
        let remote = remote.clone();
        tokio::spawn(async move {
            if let Err(e) = forward(stream, &ws_url, &auth_header, &remote).await {
                warn!(remote = %remote, error = %e, "tunnel connection closed with error");
            }
        });
    }
}

/// Shuttle one TCP connection over one websocket.
async fn forward(
    tcp: TcpStream,
    ws_url: &str,
    auth_header: &str,
    remote: &RemoteSpec,
) -> Result<(), CliError> {
    let mut request = ws_url
        .into_client_request()
        .map_err(|e| CliError::Tunnel(format!("invalid tunnel URL: {e}")))?;
    request.headers_mut().insert(
        "Authorization",
        HeaderValue::from_str(auth_header)
            .map_err(|e| CliError::Tunnel(format!("invalid auth header: {e}")))?,
    );
    request.headers_mut().insert(
        "X-Tunnel-Remote",
        HeaderValue::from_str(&format!("{}:{}", remote.remote_host, remote.remote_port))
            .map_err(|e| CliError::Tunnel(format!("invalid remote header: {e}")))?,
    );

    let (ws, _response) = connect_async(request)
        .await
        .map_err(|e| CliError::Tunnel(format!("tunnel connect failed: {e}")))?;
    let (mut ws_tx, mut ws_rx) = ws.split();
    let (mut tcp_rx, mut tcp_tx) = tcp.into_split();

    let upstream = async {
        let mut buf = vec![0u8; 16 * 1024];
        loop {
            let n = tcp_rx.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            ws_tx
                .send(Message::Binary(buf[..n].to_vec()))
                .await
                .map_err(|e| CliError::Tunnel(e.to_string()))?;
        }
        let _ = ws_tx.send(Message::Close(None)).await;
        Ok::<(), CliError>(())
    };

    let downstream = async {
        while let Some(msg) = ws_rx.next().await {
            match msg.map_err(|e| CliError::Tunnel(e.to_string()))? {
                Message::Binary(data) => tcp_tx.write_all(&data).await?,
                Message::Text(text) => tcp_tx.write_all(text.as_bytes()).await?,
                Message::Close(_) => break,
                _ => {}
            }
        }
        tcp_tx.shutdown().await?;
        Ok::<(), CliError>(())
    };

    tokio::try_join!(upstream, downstream)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_part_remote() {
        let spec: RemoteSpec = "8080:localhost:80".parse().expect("parses");
        assert_eq!(spec.local_port, 8080);
        assert_eq!(spec.remote_host, "localhost");
        assert_eq!(spec.remote_port, 80);
    }

    #[test]
    fn two_part_remote_defaults_local_to_remote_port() {
        let spec: RemoteSpec = "localhost:22".parse().expect("parses");
        assert_eq!(spec.local_port, 22);
        assert_eq!(spec.remote_port, 22);
    }

    #[test]
    fn malformed_remotes_fail() {
        assert!("".parse::<RemoteSpec>().is_err());
        assert!("80".parse::<RemoteSpec>().is_err());
        assert!("a:b:c:d".parse::<RemoteSpec>().is_err());
        assert!("8080:localhost:notaport".parse::<RemoteSpec>().is_err());
        assert!("notaport:localhost:80".parse::<RemoteSpec>().is_err());
        assert!("8080::80".parse::<RemoteSpec>().is_err());
    }

    #[test]
    fn remote_spec_display_round_trips() {
        let spec: RemoteSpec = "9001:localhost:57683".parse().expect("parses");
        assert_eq!(spec.to_string(), "9001:localhost:57683");
        let again: RemoteSpec = spec.to_string().parse().expect("parses");
        assert_eq!(again, spec);
    }

    #[test]
    fn websocket_url_schemes() {
        assert_eq!(
            websocket_url("https://p57682-shell--ns.nebula.cloud").expect("converts"),
            "wss://p57682-shell--ns.nebula.cloud"
        );
        assert_eq!(websocket_url("http://localhost:8080").expect("converts"), "ws://localhost:8080");
        assert_eq!(websocket_url("wss://x").expect("converts"), "wss://x");
        assert!(websocket_url("ftp://x").is_err());
    }

    #[test]
    fn client_requires_remotes() {
        let result = TunnelClient::new(TunnelConfig {
            server_url: "https://example.com".into(),
            auth_header: "token t".into(),
            remotes: vec![],
        });
        assert!(result.is_err());
    }

    #[test]
    fn client_rejects_bad_scheme() {
        let result = TunnelClient::new(TunnelConfig {
            server_url: "ftp://example.com".into(),
            auth_header: "token t".into(),
            remotes: vec!["8080:localhost:80".parse().expect("parses")],
        });
        assert!(result.is_err());
    }
}

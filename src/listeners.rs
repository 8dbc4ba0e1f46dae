use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Binds the server socket for the given host and port. A host of "*"
/// requests a wildcard listener: IPv6 dual-stack where available, with an
/// IPv4-only fallback.
pub async fn create_listener(host: &str, port: u16) -> std::io::Result<(String, TcpListener)> {
    if host != "*" {
        let addr = format!("{}:{}", host, port);
        tracing::info!("Attempting to bind server to {}...", addr);
        let listener = TcpListener::bind(&addr).await?;
        return Ok((addr, listener));
    }

    match bind_wildcard(Domain::IPV6, format!("[::]:{}", port)) {
        Ok(bound) => Ok(bound),
        Err(err) => {
            tracing::warn!(
                "Failed to bind IPv6 dual-stack listener ({}). Attempting IPv4 only.",
                err
            );
            bind_wildcard(Domain::IPV4, format!("0.0.0.0:{}", port))
        }
    }
}

fn bind_wildcard(domain: Domain, str_addr: String) -> std::io::Result<(String, TcpListener)> {
    tracing::info!("Attempting to bind server to {} (wildcard)...", str_addr);
    let addr: SocketAddr = str_addr.parse().unwrap();

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    if domain == Domain::IPV6 {
        // Dual-stack mode can fail on some systems; an IPv6-only socket
        // still serves most clients, so keep going.
        if let Err(err) = socket.set_only_v6(false) {
            tracing::warn!(
                "Failed to set dual-stack mode for IPv6 socket: {}. Continuing anyway.",
                err
            );
        }
    }

    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(1024)?;

    // Make it non-blocking for tokio
    socket.set_nonblocking(true)?;

    let listener = TcpListener::from_std(socket.into())?;
    Ok((str_addr, listener))
}

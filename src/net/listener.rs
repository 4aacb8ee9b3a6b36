//! TCP listener setup with dual-stack support.
//!
//! # Responsibilities
//! - Resolve the configured bind address to socket address candidates
//! - Bind the first workable candidate, preferring dual-stack IPv6
//! - Render the reachable URL printed at startup
//!
//! # Design Decisions
//! - `IPV6_V6ONLY` is cleared on IPv6 sockets so one socket accepts both
//!   families; the setsockopt failure is ignored where unsupported
//! - `SO_REUSEADDR` avoids bind failures against sockets in TIME_WAIT

use socket2::{Domain, Protocol, Socket, Type};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs};
use tokio::net::TcpListener;

/// Error type for listener setup.
#[derive(Debug)]
pub enum ListenerError {
    /// Failed to resolve the bind address.
    Resolve(std::io::Error),
    /// Failed to bind to any resolved address.
    Bind(std::io::Error),
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerError::Resolve(e) => write!(f, "Failed to resolve bind address: {}", e),
            ListenerError::Bind(e) => write!(f, "Failed to bind: {}", e),
        }
    }
}

impl std::error::Error for ListenerError {}

/// Bind a TCP listener for the given address and port.
///
/// With no explicit address, listens on all interfaces: the IPv6 unspecified
/// address with `V6ONLY` cleared (dual-stack), falling back to IPv4 when the
/// platform has no IPv6 support. An explicit address is resolved and the
/// first bindable candidate wins.
pub fn bind(addr: Option<&str>, port: u16) -> Result<TcpListener, ListenerError> {
    let candidates: Vec<SocketAddr> = match addr {
        Some(host) => {
            let resolved: Vec<SocketAddr> = (host, port)
                .to_socket_addrs()
                .map_err(ListenerError::Resolve)?
                .collect();
            if resolved.is_empty() {
                return Err(ListenerError::Resolve(std::io::Error::new(
                    std::io::ErrorKind::AddrNotAvailable,
                    format!("no addresses found for {}", host),
                )));
            }
            resolved
        }
        None => vec![
            SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), port),
            SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port),
        ],
    };

    let mut last_error = None;
    for candidate in candidates {
        match bind_socket(candidate) {
            Ok(listener) => {
                tracing::debug!(address = %candidate, "Listener bound");
                return Ok(listener);
            }
            Err(e) => {
                tracing::debug!(address = %candidate, error = %e, "Bind candidate failed");
                last_error = Some(e);
            }
        }
    }

    Err(ListenerError::Bind(last_error.unwrap_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::AddrNotAvailable, "no bind candidates")
    })))
}

fn bind_socket(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    if addr.is_ipv6() {
        // Dual-stack where supported; some platforms refuse the option.
        let _ = socket.set_only_v6(false);
    }

    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

/// Render the URL printed at startup for a bound address.
///
/// IPv6 hosts are bracketed; the all-interfaces hosts are rewritten to
/// `localhost` so the printed URL is directly clickable.
pub fn reachable_url(addr: &SocketAddr) -> String {
    let host = match addr.ip() {
        IpAddr::V6(ip) if ip.is_unspecified() => "localhost".to_string(),
        IpAddr::V4(ip) if ip.is_unspecified() => "localhost".to_string(),
        IpAddr::V6(ip) => format!("[{}]", ip),
        IpAddr::V4(ip) => ip.to_string(),
    };
    format!("http://{}:{}/", host, addr.port())
}

//! Utilities for spinning up a prometheus metrics server.

use crate::PrometheusError;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{IpAddr, SocketAddr};
use tracing::info;

/// Starts a Prometheus metrics server on `addr:port` and returns the requested address.
///
/// The exporter binds the listener itself, exactly once. Port `0` leaves the choice
/// of port to the OS.
pub fn init_prometheus_server(addr: IpAddr, port: u16) -> Result<SocketAddr, PrometheusError> {
    let listen = SocketAddr::from((addr, port));
    PrometheusBuilder::new().with_http_listener(listen).install()?;

    info!(target: "prometheus", "Serving metrics at: http://{listen}");
    Ok(listen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, TcpListener};

    #[test]
    fn test_port_in_use_is_reported() {
        let taken = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let port = taken.local_addr().unwrap().port();

        let err = init_prometheus_server(IpAddr::V4(Ipv4Addr::LOCALHOST), port).unwrap_err();

        assert!(matches!(err, PrometheusError::Build(_)));
    }
}

//! Volume module server endpoints (Axum skeleton).
//! This module can be expanded to provide REST API endpoints for blob/volume management.

use std::net::SocketAddr;

/// Starts the volume server.
/// This function serves as an entrypoint for a dedicated volume process.
///
/// Example usage:
///    let addr = ([127,0,0,1], 9002).into();
///    start_volume_server(addr);
pub async fn start_volume_server(_bind_addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    // TODO: Add Axum/HTTP server implementation here.
    println!("Volume server placeholder running at {:?}", _bind_addr);
    Ok(())
}

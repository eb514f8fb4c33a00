//! Coordinator binary: starts a basic Axum HTTP API for metadata.

use axum::{routing::get, Router};
use std::net::SocketAddr;

async fn root() -> &'static str {
    "mini-kvstore-v2 Coordinator: alive!"
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let app = Router::new().route("/", get(root));

    let addr = SocketAddr::from(([127, 0, 0, 1], 9001));
    log::info!("Coordinator listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind coordinator address");
    axum::serve(listener, app)
        .await
        .expect("Coordinator server failed");
}

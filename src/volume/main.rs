//! Volume binary: starts a minimal Axum HTTP server for blob storage simulation.

use axum::{routing::get, Router};
use std::net::SocketAddr;

async fn root() -> &'static str {
    "mini-kvstore-v2 Volume: running!"
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let app = Router::new().route("/", get(root));

    let addr = SocketAddr::from(([127, 0, 0, 1], 9002));
    log::info!("Volume listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind volume address");
    axum::serve(listener, app)
        .await
        .expect("Volume server failed");
}

// Volume module: HTTP server for blob storage
pub mod config;
pub mod handlers;
pub mod server;
pub mod storage;

pub use config::VolumeConfig;
pub use server::start_volume_server;
pub use storage::BlobStorage;

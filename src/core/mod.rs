pub mod config;
pub mod service;

pub use config::ReconcilerConfig;
pub use service::ReconcilerService;

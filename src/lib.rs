pub mod ai;
pub mod cache;
pub mod core;
pub mod error;
pub mod extract;
pub mod facts;
pub mod numeric;
pub mod recon;
pub mod table;
pub mod taxonomy;

// Re-exports
pub use crate::core::config::ReconcilerConfig;
pub use crate::core::service::ReconcilerService;
pub use crate::error::ReconcileError;

pub mod config;
pub mod gateway;
pub mod kernel;
pub mod services;

// Re-export the entry points a binary needs
pub use config::AssistantConfig;
pub use kernel::router::{Assistant, Services};
pub use kernel::session::SessionLoop;

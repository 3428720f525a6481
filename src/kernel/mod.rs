pub mod intent;
pub mod resolver;
pub mod router;
pub mod scheduler;
pub mod session;
pub mod time;

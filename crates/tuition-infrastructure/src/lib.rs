pub mod config_service;
pub mod paths;
pub mod session_store;

pub use crate::config_service::ConfigService;
pub use crate::paths::TuitionPaths;
pub use crate::session_store::MemorySessionStore;

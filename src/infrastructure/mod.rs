//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Store connection and table setup (db)
//! - HTTP server setup (server)
//! - Configuration loading (config)
//! - Demo catalog seeding (seed)
//! - Repository implementations (repositories)
//! - Application state (state)

pub mod config;
pub mod db;
pub mod repositories;
pub mod seed;
pub mod server;
pub mod state;

pub use repositories::*;
pub use state::AppState;

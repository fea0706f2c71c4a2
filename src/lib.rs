// hotelsql - interactive console front-end for a hotel management database

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

// Shared types: errors and statement parameters
pub mod core;

// Database gateway (trait + PostgreSQL implementation)
pub mod gateway;

// Field input loop (line sources, validating prompts)
pub mod input;

// Result-set rendering (tab-delimited protocol format, pretty grid)
pub mod render;

// Startup arguments and layered configuration
pub mod config;

// Menu dispatcher and the sixteen operation handlers
pub mod session;

// Re-export commonly used types for convenience
pub use crate::config::{AppConfig, Args};
pub use crate::core::{HotelError, SqlValue};
pub use crate::gateway::{Gateway, PgGateway, ResultSet};
pub use crate::input::{Console, LineSource};
pub use crate::render::RenderMode;
pub use crate::session::{EXIT_CODE, Session};

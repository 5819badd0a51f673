//! Handlers 模块

pub mod auth;
pub mod metrics;
pub mod nodes;
pub mod server;
pub mod settings;

pub use auth::*;
pub use metrics::*;
pub use nodes::*;
pub use server::*;
pub use settings::*;

mod auth_service;
mod pipeline;

pub use auth_service::*;
pub use pipeline::*;

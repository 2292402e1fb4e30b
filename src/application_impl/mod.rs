mod auth_service_impl;
mod refresh_coordinator;
mod request_pipeline;

#[cfg(test)]
mod test_support;

pub use auth_service_impl::*;
pub use refresh_coordinator::*;
pub use request_pipeline::*;

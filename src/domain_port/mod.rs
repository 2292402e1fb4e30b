// store

mod token_store;

pub use token_store::*;

// transport

mod http_transport;

pub use http_transport::*;

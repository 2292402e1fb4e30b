mod auth_failure;
mod request;
mod response;
mod routes;
mod session;
mod token;

pub use auth_failure::*;
pub use request::*;
pub use response::*;
pub use routes::*;
pub use session::*;
pub use token::*;

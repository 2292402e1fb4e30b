//! Process-wide tracing setup. The filter starts from `RUST_LOG` and can be
//! swapped once settings are loaded; `bin/logger_demo.rs` shows both steps.

mod logger;
pub use logger::*;

pub use tracing::{debug, error, info, trace, warn};

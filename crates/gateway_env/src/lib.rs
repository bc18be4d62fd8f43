#![forbid(unsafe_code)]
#![warn(missing_debug_implementations)]

//!
//! Environment of the card gateway: logger, basic config, its environment awareness.
//!

pub mod env;
pub mod logger;

#[doc(inline)]
pub use logger::*;
pub use tracing;
pub use tracing_appender;

#[doc(inline)]
pub use self::env::*;

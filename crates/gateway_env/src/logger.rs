//!
//! Logger of the card gateway.
//!
//! Card data must never be passed to these macros. Log the detected card type, masked values
//! or record identifiers instead.
//!

pub use tracing::{debug, error, event as log, info, instrument, warn, Level};

pub mod config;
mod setup;
pub mod types;

#[doc(inline)]
pub use self::{
    config::Config,
    setup::{setup, TelemetryGuard},
    types::{Flow, Tag},
};

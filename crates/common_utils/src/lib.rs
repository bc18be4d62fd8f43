#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::expect_used,
    clippy::missing_panics_doc,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::panicking_unwrap,
    clippy::unreachable,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]

//!
//! Utilities shared by the card gateway crates: error types, date-time helpers, cryptographic
//! primitives and id generation.
//!

pub mod consts;
pub mod crypto;
pub mod encryption;
pub mod errors;
pub mod pii;

/// Date-time utilities.
pub mod date_time {
    use time::{OffsetDateTime, PrimitiveDateTime};

    /// Create a new [`PrimitiveDateTime`] with the current date and time in UTC.
    pub fn now() -> PrimitiveDateTime {
        let utc_date_time = OffsetDateTime::now_utc();
        PrimitiveDateTime::new(utc_date_time.date(), utc_date_time.time())
    }
}

/// Functional programming utilities
pub mod fp_utils {
    /// Run `f` only when `predicate` holds, otherwise succeed.
    pub fn when<E, F>(predicate: bool, f: F) -> Result<(), E>
    where
        F: FnOnce() -> Result<(), E>,
    {
        if predicate {
            f()
        } else {
            Ok(())
        }
    }
}

/// Generate a nanoid with the given prefix and a default length
#[inline]
pub fn generate_id_with_default_len(prefix: &str) -> String {
    let len = consts::ID_LENGTH;
    format!("{}_{}", prefix, nanoid::nanoid!(len, &consts::ALPHABETS))
}

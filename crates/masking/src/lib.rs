#![forbid(unsafe_code)]
#![warn(missing_docs)]

//!
//! Protection for cardholder data. Wrapper types and traits for secret management which help
//! ensure card numbers, expiry dates and security codes aren't accidentally copied, logged, or
//! otherwise exposed, and that the strongest of them are wiped from memory when dropped.
//!

pub use zeroize::Zeroize as ZeroizableSecret;

mod strategy;
pub use strategy::{Strategy, WithType};

mod abs;
pub use abs::{ExposeInterface, PeekInterface};

mod secret;
mod strong_secret;
pub use secret::Secret;
pub use strong_secret::StrongSecret;

mod serde;
pub use crate::serde::{Deserialize, SerializableSecret, Serialize};

mod string;

pub mod codec;
pub mod errors;
pub mod payment_methods;
pub mod payments;

//!
//! Abstract data types.
//!

use crate::{Secret, Strategy, StrongSecret, ZeroizableSecret};

/// Interface to expose a reference to an inner secret
pub trait PeekInterface<S> {
    /// Only method providing access to the secret value.
    fn peek(&self) -> &S;
}

/// Interface that consumes a secret and returns the inner value.
pub trait ExposeInterface<S> {
    /// Consume the secret and return the inner value
    fn expose(self) -> S;
}

impl<S, I> ExposeInterface<S> for Secret<S, I>
where
    I: Strategy<S>,
{
    fn expose(self) -> S {
        self.inner_secret
    }
}

impl<S, I> ExposeInterface<S> for StrongSecret<S, I>
where
    S: ZeroizableSecret + Clone,
    I: Strategy<S>,
{
    fn expose(self) -> S {
        // The wrapper zeroizes on drop, so hand back a copy.
        self.inner_secret.clone()
    }
}

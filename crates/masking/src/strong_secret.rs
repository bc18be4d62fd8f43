//!
//! Structure describing secret which is zeroized on drop.
//!

use std::{fmt, marker::PhantomData};

use crate::{strategy::Strategy, PeekInterface, ZeroizableSecret};

///
/// Secret thing that is wiped from memory as soon as it goes out of scope.
///
/// Card numbers and security codes live in this wrapper for the short window between form
/// submission and encryption.
///
pub struct StrongSecret<S: ZeroizableSecret, I = crate::WithType>
where
    I: Strategy<S>,
{
    /// Inner secret value
    pub(crate) inner_secret: S,
    pub(crate) marker: PhantomData<I>,
}

impl<S: ZeroizableSecret, I> StrongSecret<S, I>
where
    I: Strategy<S>,
{
    /// Take ownership of a secret value
    pub fn new(secret: S) -> Self {
        Self {
            inner_secret: secret,
            marker: PhantomData,
        }
    }
}

impl<S: ZeroizableSecret, I> PeekInterface<S> for StrongSecret<S, I>
where
    I: Strategy<S>,
{
    fn peek(&self) -> &S {
        &self.inner_secret
    }
}

impl<S: ZeroizableSecret, I> From<S> for StrongSecret<S, I>
where
    I: Strategy<S>,
{
    fn from(secret: S) -> Self {
        Self::new(secret)
    }
}

impl<S: Clone + ZeroizableSecret, I> Clone for StrongSecret<S, I>
where
    I: Strategy<S>,
{
    fn clone(&self) -> Self {
        Self {
            inner_secret: self.inner_secret.clone(),
            marker: PhantomData,
        }
    }
}

impl<S, I> PartialEq for StrongSecret<S, I>
where
    S: PartialEq + ZeroizableSecret,
    I: Strategy<S>,
{
    fn eq(&self, other: &Self) -> bool {
        self.peek().eq(other.peek())
    }
}

impl<S, I> Eq for StrongSecret<S, I>
where
    S: Eq + ZeroizableSecret,
    I: Strategy<S>,
{
}

impl<S: ZeroizableSecret, I> fmt::Debug for StrongSecret<S, I>
where
    I: Strategy<S>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        I::fmt(&self.inner_secret, f)
    }
}

impl<S: ZeroizableSecret + Default, I> Default for StrongSecret<S, I>
where
    I: Strategy<S>,
{
    fn default() -> Self {
        S::default().into()
    }
}

impl<S: ZeroizableSecret, I> Drop for StrongSecret<S, I>
where
    I: Strategy<S>,
{
    fn drop(&mut self) {
        self.inner_secret.zeroize();
    }
}

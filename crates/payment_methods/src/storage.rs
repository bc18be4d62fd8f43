//!
//! Persistence of payment methods and payments. The gateway only depends on the interfaces;
//! [`MockDb`] keeps records in memory.
//!

pub mod errors;
pub mod mock_db;

use common_utils::errors::CustomResult;
use time::PrimitiveDateTime;

pub use self::{errors::StorageError, mock_db::MockDb};
use crate::types::{Payment, PaymentMethod, PaymentState};

pub trait PaymentMethodInterface {
    fn insert_payment_method(
        &self,
        payment_method: PaymentMethod,
    ) -> CustomResult<PaymentMethod, StorageError>;

    fn find_payment_method(
        &self,
        payment_method_id: &str,
    ) -> CustomResult<PaymentMethod, StorageError>;

    fn delete_payment_method(
        &self,
        payment_method_id: &str,
    ) -> CustomResult<PaymentMethod, StorageError>;
}

pub trait PaymentInterface {
    fn insert_payment(&self, payment: Payment) -> CustomResult<Payment, StorageError>;

    fn find_payment(&self, payment_id: &str) -> CustomResult<Payment, StorageError>;

    /// Move a payment from `from` to `to` as a single step.
    ///
    /// Fails with [`StorageError::StateConflict`] and leaves the record untouched when the
    /// stored state is not `from`.
    fn update_payment_state(
        &self,
        payment_id: &str,
        from: PaymentState,
        to: PaymentState,
        modified_at: PrimitiveDateTime,
    ) -> CustomResult<Payment, StorageError>;
}

pub trait StorageInterface: PaymentMethodInterface + PaymentInterface + Send + Sync {}

impl<T> StorageInterface for T where T: PaymentMethodInterface + PaymentInterface + Send + Sync {}

use std::sync::{Arc, Mutex, MutexGuard};

use common_utils::errors::CustomResult;
use error_stack::report;
use time::PrimitiveDateTime;

use super::{PaymentInterface, PaymentMethodInterface, StorageError};
use crate::types::{Payment, PaymentMethod, PaymentState};

#[derive(Clone, Debug, Default)]
pub struct MockDb {
    pub payment_methods: Arc<Mutex<Vec<PaymentMethod>>>,
    pub payments: Arc<Mutex<Vec<Payment>>>,
}

impl MockDb {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<T>(records: &Mutex<Vec<T>>) -> CustomResult<MutexGuard<'_, Vec<T>>, StorageError> {
    records
        .lock()
        .map_err(|_| report!(StorageError::MockDbError))
}

impl PaymentMethodInterface for MockDb {
    fn insert_payment_method(
        &self,
        payment_method: PaymentMethod,
    ) -> CustomResult<PaymentMethod, StorageError> {
        let mut payment_methods = lock(&self.payment_methods)?;
        if payment_methods
            .iter()
            .any(|pm| pm.payment_method_id == payment_method.payment_method_id)
        {
            return Err(report!(StorageError::DuplicateValue {
                entity: "payment_method",
                key: Some(payment_method.payment_method_id),
            }));
        }
        payment_methods.push(payment_method.clone());
        Ok(payment_method)
    }

    fn find_payment_method(
        &self,
        payment_method_id: &str,
    ) -> CustomResult<PaymentMethod, StorageError> {
        lock(&self.payment_methods)?
            .iter()
            .find(|pm| pm.payment_method_id == payment_method_id)
            .cloned()
            .ok_or_else(|| {
                report!(StorageError::ValueNotFound(format!(
                    "cannot find payment method {payment_method_id}"
                )))
            })
    }

    fn delete_payment_method(
        &self,
        payment_method_id: &str,
    ) -> CustomResult<PaymentMethod, StorageError> {
        let mut payment_methods = lock(&self.payment_methods)?;
        let position = payment_methods
            .iter()
            .position(|pm| pm.payment_method_id == payment_method_id)
            .ok_or_else(|| {
                report!(StorageError::ValueNotFound(format!(
                    "cannot find payment method {payment_method_id} to delete"
                )))
            })?;
        Ok(payment_methods.remove(position))
    }
}

impl PaymentInterface for MockDb {
    fn insert_payment(&self, payment: Payment) -> CustomResult<Payment, StorageError> {
        let mut payments = lock(&self.payments)?;
        if payments.iter().any(|p| p.payment_id == payment.payment_id) {
            return Err(report!(StorageError::DuplicateValue {
                entity: "payment",
                key: Some(payment.payment_id),
            }));
        }
        payments.push(payment.clone());
        Ok(payment)
    }

    fn find_payment(&self, payment_id: &str) -> CustomResult<Payment, StorageError> {
        lock(&self.payments)?
            .iter()
            .find(|p| p.payment_id == payment_id)
            .cloned()
            .ok_or_else(|| {
                report!(StorageError::ValueNotFound(format!(
                    "cannot find payment {payment_id}"
                )))
            })
    }

    fn update_payment_state(
        &self,
        payment_id: &str,
        from: PaymentState,
        to: PaymentState,
        modified_at: PrimitiveDateTime,
    ) -> CustomResult<Payment, StorageError> {
        let mut payments = lock(&self.payments)?;
        let stored = payments
            .iter_mut()
            .find(|p| p.payment_id == payment_id)
            .ok_or_else(|| {
                report!(StorageError::ValueNotFound(format!(
                    "cannot find payment {payment_id} to update"
                )))
            })?;

        if stored.state != from {
            return Err(report!(StorageError::StateConflict {
                current: stored.state,
                expected: from,
            }));
        }

        stored.state = to;
        stored.modified_at = modified_at;
        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use common_utils::date_time;

    use super::*;

    #[test]
    fn state_transition_requires_expected_state() {
        let db = MockDb::new();
        let payment = db.insert_payment(Payment::new(100, "USD", None)).unwrap();
        let now = date_time::now();

        let completed = db
            .update_payment_state(
                &payment.payment_id,
                PaymentState::New,
                PaymentState::Completed,
                now,
            )
            .unwrap();
        assert_eq!(completed.state, PaymentState::Completed);
        assert_eq!(completed.modified_at, now);

        let error = db
            .update_payment_state(
                &payment.payment_id,
                PaymentState::New,
                PaymentState::Completed,
                now,
            )
            .unwrap_err();
        assert!(matches!(
            error.current_context(),
            StorageError::StateConflict {
                current: PaymentState::Completed,
                expected: PaymentState::New,
            }
        ));

        let error = db
            .update_payment_state("pay_missing", PaymentState::New, PaymentState::Completed, now)
            .unwrap_err();
        assert!(error.current_context().is_db_not_found());
    }
}

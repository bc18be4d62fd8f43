use common_utils::date_time;
use error_stack::report;
use gateway_env::{instrument, logger, tracing, Flow, Tag};

use crate::{
    controller::OnsiteGateway,
    core::errors::{PaymentMethodsError, PmResult, StorageErrorExt},
    types::{Payment, PaymentState},
};

/// Mark a new payment as completed.
///
/// No processor is contacted: the gateway only captures card details, and store administrators
/// capture the funds themselves. The stored payment is authoritative for the state check.
#[instrument(skip_all, fields(flow = %Flow::PaymentsComplete))]
pub fn complete_payment(gateway: &OnsiteGateway, payment: &Payment) -> PmResult<Payment> {
    let storage = gateway.storage();

    let payment = storage.find_payment(&payment.payment_id).map_err(|error| {
        logger::error!(tag = ?Tag::DbRead, ?error, "failed to fetch payment");
        error.to_storage_failed_response()
    })?;

    if payment.state != PaymentState::New {
        logger::error!(
            payment_id = %payment.payment_id,
            state = %payment.state,
            "payment cannot be completed from its current state"
        );
        return Err(report!(PaymentMethodsError::InvalidPaymentState {
            current: payment.state,
            expected: PaymentState::New,
        }));
    }

    let payment_method_id = payment
        .payment_method_id
        .as_deref()
        .ok_or_else(|| report!(PaymentMethodsError::PaymentMethodNotAttached))?;

    let payment_method = storage
        .find_payment_method(payment_method_id)
        .map_err(|error| {
            error.to_not_found_response(PaymentMethodsError::PaymentMethodNotAttached)
        })?;

    let now = date_time::now();
    if payment_method.is_expired_at(now) {
        return Err(report!(PaymentMethodsError::PaymentMethodExpired));
    }

    // A concurrent completion may have won since the read above; the transition decides.
    let payment = storage
        .update_payment_state(
            &payment.payment_id,
            PaymentState::New,
            PaymentState::Completed,
            now,
        )
        .map_err(|error| {
            logger::error!(tag = ?Tag::DbUpdate, ?error, "failed to complete payment");
            error.to_state_conflict_response()
        })?;

    logger::info!(payment_id = %payment.payment_id, "payment completed");
    Ok(payment)
}

use std::collections::HashMap;

use cards::{classify, CardType, CardValidationError};
use common_utils::{date_time, generate_id_with_default_len};
use error_stack::{report, ResultExt};
use gateway_env::{instrument, logger, tracing, Flow, Tag};
use masking::PeekInterface;

use crate::{
    consts,
    controller::OnsiteGateway,
    core::{
        codec,
        errors::{PaymentMethodsError, PmResult, StorageErrorExt},
    },
    types::{CardDisplayDetails, PaymentDetails, PaymentMethod, PaymentMethodCreate},
};

/// Validate submitted form fields, encrypt them and store the resulting payment method.
#[instrument(skip_all, fields(flow = %Flow::PaymentMethodsCreate))]
pub fn create_payment_method(
    gateway: &OnsiteGateway,
    req: PaymentMethodCreate,
    fields: &HashMap<String, String>,
) -> PmResult<PaymentMethod> {
    let details = PaymentDetails::try_from(fields).map_err(|error| {
        logger::error!(?error, "card details do not match the form contract");
        error
    })?;

    create_payment_method_from_details(gateway, req, details)
}

/// Consumes `details`; the plaintext card data is dropped once encrypted.
#[instrument(skip_all, fields(flow = %Flow::PaymentMethodsCreate))]
pub fn create_payment_method_from_details(
    gateway: &OnsiteGateway,
    req: PaymentMethodCreate,
    details: PaymentDetails,
) -> PmResult<PaymentMethod> {
    let card = cards::validate_card(&details.as_card_details(), gateway.allowed_card_types())
        .map_err(|errors| {
            let fields = errors
                .iter()
                .map(|error| error.field().to_string())
                .collect::<Vec<_>>();
            logger::info!(?fields, "card details failed validation");
            report!(PaymentMethodsError::ValidationFailed { errors })
        })?;

    let expires_at = card.expiration.expires_at().change_context(
        PaymentMethodsError::ValidationFailed {
            errors: vec![CardValidationError::InvalidExpiration],
        },
    )?;

    let encrypted = codec::encode_for_storage(
        gateway.encryption(),
        gateway.encryption_profile(),
        &details,
        &card,
    )?;
    drop(details);

    let payment_method = PaymentMethod {
        payment_method_id: generate_id_with_default_len(consts::PAYMENT_METHOD_ID_PREFIX),
        payment_method_type: consts::PAYMENT_METHOD_TYPE.to_string(),
        payment_gateway: consts::GATEWAY_ID.to_string(),
        owner_id: req.owner_id,
        billing_profile_id: req.billing_profile_id,
        card: encrypted,
        reusable: false,
        expires_at,
        created_at: date_time::now(),
    };

    let payment_method = gateway
        .storage()
        .insert_payment_method(payment_method)
        .map_err(|error| {
            logger::error!(tag = ?Tag::DbCreate, ?error, "failed to store payment method");
            error.to_storage_failed_response()
        })?;

    logger::info!(
        payment_method_id = %payment_method.payment_method_id,
        card_type = %card.card_type,
        "payment method created"
    );

    Ok(payment_method)
}

#[instrument(skip_all, fields(flow = %Flow::PaymentMethodsDelete))]
pub fn delete_payment_method(gateway: &OnsiteGateway, payment_method_id: &str) -> PmResult<()> {
    gateway
        .storage()
        .delete_payment_method(payment_method_id)
        .map_err(|error| {
            logger::error!(tag = ?Tag::DbDelete, ?error, "failed to delete payment method");
            error.to_storage_failed_response()
        })?;

    logger::info!(payment_method_id, "payment method deleted");
    Ok(())
}

/// Label such as `Visa ending in 1111`.
///
/// Never fails: a record that cannot be decrypted is shown with a generic label.
#[instrument(skip_all, fields(flow = %Flow::PaymentMethodsLabel))]
pub fn render_label(gateway: &OnsiteGateway, payment_method: &PaymentMethod) -> String {
    match codec::decode_for_display(
        gateway.encryption(),
        gateway.encryption_profile(),
        payment_method,
    ) {
        Ok(details) => build_label(&details),
        Err(error) => {
            logger::warn!(
                payment_method_id = %payment_method.payment_method_id,
                ?error,
                "unable to read card details for label"
            );
            consts::UNREADABLE_CARD_LABEL.to_string()
        }
    }
}

/// The brand comes from the decrypted number, falling back to the stored brand.
fn build_label(details: &CardDisplayDetails) -> String {
    let last4 = details.card_number.get_last4();
    match classify(details.card_number.peek(), &CardType::ALL).or(details.card_type) {
        Some(card_type) => format!("{} ending in {last4}", card_type.label()),
        None => format!("Card ending in {last4}"),
    }
}

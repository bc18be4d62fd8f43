use std::collections::HashMap;

use cards::{CardDetails, CardNumber, CardSecurityCode, CardType};
use common_utils::{date_time, encryption::Encryption, generate_id_with_default_len};
use error_stack::report;
use masking::{PeekInterface, Secret};
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use crate::{
    consts::{self, form_fields},
    core::errors::PaymentMethodsError,
};

/// Card details exactly as submitted on the checkout form.
///
/// Lives only for the duration of a create request and is never persisted or serialized.
#[derive(Debug)]
pub struct PaymentDetails {
    /// Brand picked by the customer, if any. Detection from the number takes precedence.
    pub card_type: Option<String>,
    pub card_number: CardNumber,
    pub card_exp_month: Secret<String>,
    pub card_exp_year: Secret<String>,
    pub card_cvc: CardSecurityCode,
}

impl PaymentDetails {
    pub fn as_card_details(&self) -> CardDetails<'_> {
        CardDetails {
            number: &self.card_number,
            expiration_month: self.card_exp_month.peek(),
            expiration_year: self.card_exp_year.peek(),
            security_code: &self.card_cvc,
        }
    }
}

impl TryFrom<&HashMap<String, String>> for PaymentDetails {
    type Error = error_stack::Report<PaymentMethodsError>;

    fn try_from(fields: &HashMap<String, String>) -> Result<Self, Self::Error> {
        if let Some(unexpected) = fields
            .keys()
            .filter(|key| !form_fields::ALL.contains(&key.as_str()))
            .min()
        {
            return Err(report!(PaymentMethodsError::UnexpectedField {
                field_name: unexpected.clone(),
            }));
        }

        let present = |field_name: &'static str| {
            fields
                .get(field_name)
                .ok_or_else(|| report!(PaymentMethodsError::MissingRequiredField { field_name }))
        };
        let non_empty = |field_name: &'static str| {
            present(field_name).and_then(|value| {
                if value.trim().is_empty() {
                    Err(report!(PaymentMethodsError::MissingRequiredField {
                        field_name
                    }))
                } else {
                    Ok(value)
                }
            })
        };

        let card_type = present(form_fields::TYPE)?;

        Ok(Self {
            card_type: Some(card_type.trim().to_string()).filter(|ty| !ty.is_empty()),
            card_number: CardNumber::new(non_empty(form_fields::NUMBER)?),
            card_exp_month: Secret::new(non_empty(form_fields::EXPIRATION_MONTH)?.trim().to_string()),
            card_exp_year: Secret::new(non_empty(form_fields::EXPIRATION_YEAR)?.trim().to_string()),
            card_cvc: CardSecurityCode::new(non_empty(form_fields::SECURITY_CODE)?),
        })
    }
}

/// References the new payment method is attached to.
#[derive(Clone, Debug, Default)]
pub struct PaymentMethodCreate {
    pub owner_id: Option<String>,
    pub billing_profile_id: Option<String>,
}

/// Cardholder fields, each encrypted on its own under the same profile.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncryptedCardFields {
    pub card_type: Encryption,
    pub card_number: Encryption,
    pub card_exp_month: Encryption,
    pub card_exp_year: Encryption,
    pub card_cvv: Encryption,
}

/// Stored payment method. Cardholder data is only ever held encrypted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub payment_method_id: String,
    pub payment_method_type: String,
    pub payment_gateway: String,
    pub owner_id: Option<String>,
    pub billing_profile_id: Option<String>,
    pub card: EncryptedCardFields,
    pub reusable: bool,
    /// Last second of the card's expiration month, UTC.
    pub expires_at: PrimitiveDateTime,
    pub created_at: PrimitiveDateTime,
}

impl PaymentMethod {
    pub fn is_expired_at(&self, now: PrimitiveDateTime) -> bool {
        now > self.expires_at
    }
}

/// The two decrypted fields needed to label a stored card.
#[derive(Debug)]
pub struct CardDisplayDetails {
    pub card_type: Option<CardType>,
    pub card_number: CardNumber,
}

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentState {
    New,
    Authorization,
    Completed,
    Voided,
    Refunded,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: String,
    /// Amount in the currency's minor unit.
    pub amount: i64,
    pub currency: String,
    pub state: PaymentState,
    pub payment_method_id: Option<String>,
    pub modified_at: PrimitiveDateTime,
}

impl Payment {
    pub fn new(amount: i64, currency: impl Into<String>, payment_method_id: Option<String>) -> Self {
        Self {
            payment_id: generate_id_with_default_len(consts::PAYMENT_ID_PREFIX),
            amount,
            currency: currency.into(),
            state: PaymentState::New,
            payment_method_id,
            modified_at: date_time::now(),
        }
    }
}

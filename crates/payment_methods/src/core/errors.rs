use cards::{CardField, CardValidationError};
pub use common_utils::errors::CustomResult;

use crate::{storage::errors::StorageError, types::PaymentState};

pub type PmResult<T> = CustomResult<T, PaymentMethodsError>;

/// Shown for failures caused by the submitted data not matching the form contract.
pub const DECLINE_MESSAGE: &str =
    "We encountered an error processing your payment method. Please verify your details and try again.";

/// Shown for every failure the customer cannot fix.
pub const GATEWAY_ERROR_MESSAGE: &str =
    "We encountered an unexpected error processing your payment method. Please try again later.";

#[derive(Debug, thiserror::Error)]
pub enum PaymentMethodsError {
    #[error("Missing required field: {field_name}")]
    MissingRequiredField { field_name: &'static str },
    #[error("Unexpected field: {field_name}")]
    UnexpectedField { field_name: String },
    #[error("Card details failed validation on {} field(s)", errors.len())]
    ValidationFailed { errors: Vec<CardValidationError> },
    #[error("Failed to encrypt card details")]
    EncryptionFailed,
    #[error("Failed to decrypt card details")]
    DecryptionFailed,
    #[error("Storage operation failed")]
    StorageFailed,
    #[error("Payment is in state {current}, expected {expected}")]
    InvalidPaymentState {
        current: PaymentState,
        expected: PaymentState,
    },
    #[error("Payment has no usable payment method attached")]
    PaymentMethodNotAttached,
    #[error("Payment method has expired")]
    PaymentMethodExpired,
    #[error("Invalid gateway configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Coarse classification of [`PaymentMethodsError`], deciding how a failure is reported.
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Contract,
    Validation,
    Crypto,
    Storage,
    Precondition,
    Configuration,
}

impl PaymentMethodsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingRequiredField { .. } | Self::UnexpectedField { .. } => ErrorKind::Contract,
            Self::ValidationFailed { .. } => ErrorKind::Validation,
            Self::EncryptionFailed | Self::DecryptionFailed => ErrorKind::Crypto,
            Self::StorageFailed => ErrorKind::Storage,
            Self::InvalidPaymentState { .. }
            | Self::PaymentMethodNotAttached
            | Self::PaymentMethodExpired => ErrorKind::Precondition,
            Self::InvalidConfiguration { .. } => ErrorKind::Configuration,
        }
    }

    /// Field scoped messages for a failed validation, empty for every other error.
    pub fn field_errors(&self) -> Vec<(CardField, String)> {
        match self {
            Self::ValidationFailed { errors } => errors
                .iter()
                .map(|error| (error.field(), error.to_string()))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Message safe to show the customer. Details of anything but validation failures stay in
    /// the logs.
    pub fn customer_message(&self) -> String {
        match self {
            Self::ValidationFailed { errors } => errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" "),
            Self::MissingRequiredField { .. } | Self::UnexpectedField { .. } => {
                DECLINE_MESSAGE.to_string()
            }
            _ => GATEWAY_ERROR_MESSAGE.to_string(),
        }
    }
}

pub trait StorageErrorExt {
    fn to_not_found_response(
        self,
        not_found_response: PaymentMethodsError,
    ) -> error_stack::Report<PaymentMethodsError>;

    fn to_storage_failed_response(self) -> error_stack::Report<PaymentMethodsError>;

    /// A lost state transition becomes [`PaymentMethodsError::InvalidPaymentState`].
    fn to_state_conflict_response(self) -> error_stack::Report<PaymentMethodsError>;
}

impl StorageErrorExt for error_stack::Report<StorageError> {
    fn to_not_found_response(
        self,
        not_found_response: PaymentMethodsError,
    ) -> error_stack::Report<PaymentMethodsError> {
        if self.current_context().is_db_not_found() {
            self.change_context(not_found_response)
        } else {
            self.change_context(PaymentMethodsError::StorageFailed)
        }
    }

    fn to_storage_failed_response(self) -> error_stack::Report<PaymentMethodsError> {
        self.change_context(PaymentMethodsError::StorageFailed)
    }

    fn to_state_conflict_response(self) -> error_stack::Report<PaymentMethodsError> {
        let conflict = match self.current_context() {
            StorageError::StateConflict { current, expected } => Some((*current, *expected)),
            _ => None,
        };
        match conflict {
            Some((current, expected)) => {
                self.change_context(PaymentMethodsError::InvalidPaymentState { current, expected })
            }
            None => self.change_context(PaymentMethodsError::StorageFailed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failures_keep_field_messages() {
        let error = PaymentMethodsError::ValidationFailed {
            errors: vec![
                CardValidationError::InvalidNumber,
                CardValidationError::InvalidSecurityCode,
            ],
        };

        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(
            error.field_errors(),
            vec![
                (
                    CardField::Number,
                    "You have entered an invalid credit card number.".to_string()
                ),
                (
                    CardField::SecurityCode,
                    "You have entered an invalid CVV.".to_string()
                ),
            ]
        );
        assert_eq!(
            error.customer_message(),
            "You have entered an invalid credit card number. You have entered an invalid CVV."
        );
    }

    #[test]
    fn internal_details_are_not_shown_to_customers() {
        let contract = PaymentMethodsError::MissingRequiredField {
            field_name: "security_code",
        };
        assert_eq!(contract.kind(), ErrorKind::Contract);
        assert_eq!(contract.customer_message(), DECLINE_MESSAGE);

        for error in [
            PaymentMethodsError::DecryptionFailed,
            PaymentMethodsError::StorageFailed,
            PaymentMethodsError::PaymentMethodNotAttached,
            PaymentMethodsError::InvalidConfiguration {
                message: "unknown profile".to_string(),
            },
        ] {
            assert_eq!(error.customer_message(), GATEWAY_ERROR_MESSAGE);
            assert!(error.field_errors().is_empty());
        }
    }

    #[test]
    fn storage_errors_map_to_gateway_errors() {
        let conflict = error_stack::report!(StorageError::StateConflict {
            current: PaymentState::Completed,
            expected: PaymentState::New,
        })
        .to_state_conflict_response();
        assert!(matches!(
            conflict.current_context(),
            PaymentMethodsError::InvalidPaymentState {
                current: PaymentState::Completed,
                expected: PaymentState::New,
            }
        ));
        assert_eq!(conflict.current_context().kind(), ErrorKind::Precondition);

        let not_found = error_stack::report!(StorageError::ValueNotFound("pay_1".to_string()));
        assert!(matches!(
            not_found.to_state_conflict_response().current_context(),
            PaymentMethodsError::StorageFailed
        ));

        let not_found = error_stack::report!(StorageError::ValueNotFound("pm_1".to_string()))
            .to_not_found_response(PaymentMethodsError::PaymentMethodNotAttached);
        assert!(matches!(
            not_found.current_context(),
            PaymentMethodsError::PaymentMethodNotAttached
        ));
    }
}

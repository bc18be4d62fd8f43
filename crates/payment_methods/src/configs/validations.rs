use common_utils::fp_utils::when;
use error_stack::report;

use crate::{
    consts::NO_ENCRYPTION_PROFILE,
    core::errors::{PaymentMethodsError, PmResult},
};

impl super::settings::GatewayConfig {
    pub fn validate(&self) -> PmResult<()> {
        when(
            self.encryption_profile.trim().is_empty()
                || self.encryption_profile == NO_ENCRYPTION_PROFILE,
            || {
                Err(report!(PaymentMethodsError::InvalidConfiguration {
                    message: "An Encryption Profile must be selected.".into(),
                }))
            },
        )?;

        when(self.card_types.is_empty(), || {
            Err(report!(PaymentMethodsError::InvalidConfiguration {
                message: "At least one card type must be accepted".into(),
            }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::settings::GatewayConfig;

    #[test]
    fn profile_must_be_selected() {
        for profile in ["", "_none_"] {
            let config = GatewayConfig {
                encryption_profile: profile.to_string(),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn card_types_must_not_be_empty() {
        let config = GatewayConfig {
            encryption_profile: "card_data".to_string(),
            card_types: Vec::new(),
            reusable: false,
        };
        assert!(config.validate().is_err());
    }
}

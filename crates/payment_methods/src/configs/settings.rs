use std::path::PathBuf;

use cards::{CardType, DEFAULT_ALLOWED_CARD_TYPES};
use error_stack::ResultExt;
use gateway_env::{
    config::{Config as LoggerConfig, Log, ENV_PREFIX},
    env,
};
use serde::Deserialize;

use crate::{
    core::errors::{PaymentMethodsError, PmResult},
    encryption::EncryptionProfile,
};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub log: Log,
    pub gateway: GatewayConfig,
}

/// Merchant configuration of the on-site gateway.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GatewayConfig {
    /// Profile every cardholder field is encrypted under.
    pub encryption_profile: String,
    /// Card brands accepted at checkout.
    pub card_types: Vec<CardType>,
    /// Accepted for completeness; payment methods of this gateway are never reusable.
    pub reusable: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            encryption_profile: String::new(),
            card_types: DEFAULT_ALLOWED_CARD_TYPES.to_vec(),
            reusable: false,
        }
    }
}

impl GatewayConfig {
    pub fn encryption_profile(&self) -> PmResult<EncryptionProfile> {
        EncryptionProfile::new(self.encryption_profile.clone()).change_context(
            PaymentMethodsError::InvalidConfiguration {
                message: "An Encryption Profile must be selected.".to_string(),
            },
        )
    }
}

impl Settings {
    pub fn new() -> PmResult<Self> {
        Self::with_config_path(None)
    }

    /// Layer `config/<env>.toml` (or `config_path`) under `GATEWAY__*` environment variables.
    pub fn with_config_path(config_path: Option<PathBuf>) -> PmResult<Self> {
        let environment = env::which();
        let config_path = LoggerConfig::config_path(environment, config_path);

        let config = LoggerConfig::builder(environment)
            .and_then(|builder| {
                builder
                    .add_source(config::File::from(config_path).required(false))
                    .add_source(
                        config::Environment::with_prefix(ENV_PREFIX)
                            .try_parsing(true)
                            .separator("__")
                            .list_separator(",")
                            .with_list_parse_key("gateway.card_types"),
                    )
                    .build()
            })
            .change_context(PaymentMethodsError::InvalidConfiguration {
                message: "Unable to load configuration".to_string(),
            })?;

        let settings: Self = config
            .try_deserialize()
            .change_context(PaymentMethodsError::InvalidConfiguration {
                message: "Unable to deserialize configuration".to_string(),
            })?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> PmResult<()> {
        self.gateway.validate()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn defaults_accept_the_three_major_brands() {
        let config = GatewayConfig::default();
        assert_eq!(
            config.card_types,
            vec![
                CardType::AmericanExpress,
                CardType::MasterCard,
                CardType::Visa
            ]
        );
        assert!(!config.reusable);
    }

    #[test]
    fn deserializes_card_type_ids() {
        let config = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [gateway]
                encryption_profile = "card_data"
                card_types = ["visa", "maestro"]
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let settings: Settings = config.try_deserialize().unwrap();
        assert_eq!(settings.gateway.encryption_profile, "card_data");
        assert_eq!(
            settings.gateway.card_types,
            vec![CardType::Visa, CardType::Maestro]
        );
        assert!(settings.validate().is_ok());
        assert_eq!(
            settings.gateway.encryption_profile().unwrap().id(),
            "card_data"
        );
    }

    #[test]
    fn missing_file_leaves_profile_unset() {
        let error =
            Settings::with_config_path(Some(PathBuf::from("/nonexistent/gateway.toml"))).unwrap_err();
        assert!(matches!(
            error.current_context(),
            PaymentMethodsError::InvalidConfiguration { .. }
        ));
    }
}

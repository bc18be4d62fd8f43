use std::{collections::HashMap, fmt, sync::Arc};

use cards::CardType;
use error_stack::report;
use gateway_env::{logger, Flow};

use crate::{
    configs::settings::GatewayConfig,
    core::{
        errors::{PaymentMethodsError, PmResult},
        payment_methods, payments,
    },
    encryption::{EncryptionManagementInterface, EncryptionProfile},
    storage::StorageInterface,
    types::{Payment, PaymentMethod, PaymentMethodCreate},
};

/// Operations the on-site gateway offers to checkout and order management.
pub trait PaymentMethodsController {
    /// Create a payment method from the submitted card form fields.
    fn create_payment_method(
        &self,
        req: PaymentMethodCreate,
        fields: &HashMap<String, String>,
    ) -> PmResult<PaymentMethod>;

    fn delete_payment_method(&self, payment_method_id: &str) -> PmResult<()>;

    fn render_label(&self, payment_method: &PaymentMethod) -> String;

    fn complete_payment(&self, payment: &Payment) -> PmResult<Payment>;
}

/// The on-site, encrypted credit card gateway with its collaborators.
pub struct OnsiteGateway {
    config: GatewayConfig,
    encryption_profile: EncryptionProfile,
    encryption: Arc<dyn EncryptionManagementInterface>,
    storage: Arc<dyn StorageInterface>,
}

impl fmt::Debug for OnsiteGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnsiteGateway")
            .field("config", &self.config)
            .field("encryption_profile", &self.encryption_profile)
            .finish_non_exhaustive()
    }
}

impl OnsiteGateway {
    /// Refuses configurations without a usable encryption profile.
    pub fn new(
        config: GatewayConfig,
        encryption: Arc<dyn EncryptionManagementInterface>,
        storage: Arc<dyn StorageInterface>,
    ) -> PmResult<Self> {
        let flow = Flow::GatewayConfigure;

        config.validate().map_err(|error| {
            logger::error!(%flow, ?error, "invalid gateway configuration");
            error
        })?;
        let encryption_profile = config.encryption_profile()?;

        if !encryption.has_profile(&encryption_profile) {
            logger::error!(
                %flow,
                encryption_profile = encryption_profile.id(),
                "encryption profile is not known to the encryption service"
            );
            return Err(report!(PaymentMethodsError::InvalidConfiguration {
                message: format!("Unknown encryption profile {}", encryption_profile.id()),
            }));
        }

        if config.reusable {
            logger::warn!(%flow, "reusable payment methods are not supported, ignoring setting");
        }

        Ok(Self {
            config,
            encryption_profile,
            encryption,
            storage,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn allowed_card_types(&self) -> &[CardType] {
        &self.config.card_types
    }

    pub fn encryption_profile(&self) -> &EncryptionProfile {
        &self.encryption_profile
    }

    pub fn encryption(&self) -> &dyn EncryptionManagementInterface {
        self.encryption.as_ref()
    }

    pub fn storage(&self) -> &dyn StorageInterface {
        self.storage.as_ref()
    }
}

impl PaymentMethodsController for OnsiteGateway {
    fn create_payment_method(
        &self,
        req: PaymentMethodCreate,
        fields: &HashMap<String, String>,
    ) -> PmResult<PaymentMethod> {
        payment_methods::create_payment_method(self, req, fields)
    }

    fn delete_payment_method(&self, payment_method_id: &str) -> PmResult<()> {
        payment_methods::delete_payment_method(self, payment_method_id)
    }

    fn render_label(&self, payment_method: &PaymentMethod) -> String {
        payment_methods::render_label(self, payment_method)
    }

    fn complete_payment(&self, payment: &Payment) -> PmResult<Payment> {
        payments::complete_payment(self, payment)
    }
}

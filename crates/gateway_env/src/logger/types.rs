//! Types.

use serde::Deserialize;
use strum::{Display, EnumString};

/// Category and tag of log event.
///
/// Don't hesitate to add your variant if it is missing here.
#[derive(Debug, Default, Deserialize, Clone, Display, EnumString)]
pub enum Tag {
    /// General.
    #[default]
    General,

    /// Storage: create.
    DbCreate,
    /// Storage: read.
    DbRead,
    /// Storage: update.
    DbUpdate,
    /// Storage: delete.
    DbDelete,

    /// Call made to the encryption service.
    EncryptionService,
}

/// Gateway flow
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Payment method create flow, from submitted card details to the stored record.
    PaymentMethodsCreate,
    /// Payment method delete flow.
    PaymentMethodsDelete,
    /// Payment method label rendering flow.
    PaymentMethodsLabel,
    /// Payment completion flow.
    PaymentsComplete,
    /// Gateway configuration validation.
    GatewayConfigure,
}

/// Plugin id of the gateway.
pub const GATEWAY_ID: &str = "onsite_encrypted";

/// Label shown to administrators configuring the gateway.
pub const GATEWAY_ADMIN_LABEL: &str = "On-site, encrypted";

/// Label shown to customers at checkout.
pub const GATEWAY_DISPLAY_LABEL: &str = "Pay with Credit Card";

/// Payment method type of every record created by this gateway.
pub const PAYMENT_METHOD_TYPE: &str = "credit_card_encrypted";

/// Placeholder an unconfigured encryption profile selector submits.
pub const NO_ENCRYPTION_PROFILE: &str = "_none_";

pub const PAYMENT_METHOD_ID_PREFIX: &str = "pm";
pub const PAYMENT_ID_PREFIX: &str = "pay";

/// Label rendered when the stored card details cannot be read back.
pub const UNREADABLE_CARD_LABEL: &str = "Credit card";

/// Form field keys of the card details submission.
pub mod form_fields {
    pub const TYPE: &str = "type";
    pub const NUMBER: &str = "number";
    pub const EXPIRATION_MONTH: &str = "expiration.month";
    pub const EXPIRATION_YEAR: &str = "expiration.year";
    pub const SECURITY_CODE: &str = "security_code";

    pub const ALL: [&str; 5] = [
        TYPE,
        NUMBER,
        EXPIRATION_MONTH,
        EXPIRATION_YEAR,
        SECURITY_CODE,
    ];
}

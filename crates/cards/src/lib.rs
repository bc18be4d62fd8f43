pub mod card_type;
pub mod validate;

use common_utils::{date_time, errors};
use error_stack::report;
use masking::{PeekInterface, StrongSecret};
use serde::{Deserialize, Serialize};
use time::{Date, Month, PrimitiveDateTime, Time};

pub use crate::{
    card_type::{classify, CardType, CardTypeDefinition, DEFAULT_ALLOWED_CARD_TYPES},
    validate::{
        validate_card, validate_card_at, validate_expiration, validate_expiration_at,
        validate_number, validate_security_code, CardDetails, CardField, CardNumber,
        CardNumberStrategy, CardSecurityCode, CardValidationError, ValidatedCard,
    },
};

/// Number of years offered in the expiration year selector, starting with the current one.
pub const EXPIRATION_YEAR_OPTIONS: u16 = 10;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "u8")]
pub struct CardExpirationMonth(StrongSecret<u8>);

impl CardExpirationMonth {
    pub fn two_digits(&self) -> String {
        format!("{:02}", self.0.peek())
    }
}

impl TryFrom<u8> for CardExpirationMonth {
    type Error = error_stack::Report<errors::ValidationError>;

    fn try_from(month: u8) -> Result<Self, Self::Error> {
        if (1..=12).contains(&month) {
            Ok(Self(StrongSecret::new(month)))
        } else {
            Err(report!(errors::ValidationError::InvalidValue {
                message: "invalid card expiration month".to_string()
            }))
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "u16")]
pub struct CardExpirationYear(StrongSecret<u16>);

impl CardExpirationYear {
    pub fn four_digits(&self) -> String {
        self.0.peek().to_string()
    }

    pub fn two_digits(&self) -> String {
        format!("{:02}", self.0.peek() % 100)
    }
}

impl TryFrom<u16> for CardExpirationYear {
    type Error = error_stack::Report<errors::ValidationError>;

    fn try_from(year: u16) -> Result<Self, Self::Error> {
        if (1000..=9999).contains(&year) {
            Ok(Self(StrongSecret::new(year)))
        } else {
            Err(report!(errors::ValidationError::InvalidValue {
                message: "invalid card expiration year".to_string()
            }))
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CardExpiration {
    pub month: CardExpirationMonth,
    pub year: CardExpirationYear,
}

impl TryFrom<(u8, u16)> for CardExpiration {
    type Error = error_stack::Report<errors::ValidationError>;

    fn try_from((month, year): (u8, u16)) -> Result<Self, Self::Error> {
        Ok(Self {
            month: CardExpirationMonth::try_from(month)?,
            year: CardExpirationYear::try_from(year)?,
        })
    }
}

impl CardExpiration {
    pub fn month(&self) -> u8 {
        *self.month.0.peek()
    }

    pub fn year(&self) -> u16 {
        *self.year.0.peek()
    }

    pub fn get_month(&self) -> &CardExpirationMonth {
        &self.month
    }

    pub fn get_year(&self) -> &CardExpirationYear {
        &self.year
    }

    /// Last second of the expiration month, in UTC.
    pub fn expires_at(&self) -> errors::CustomResult<PrimitiveDateTime, errors::ValidationError> {
        let invalid = || errors::ValidationError::InvalidValue {
            message: "invalid card expiration date".to_string(),
        };
        let year = i32::from(self.year());
        let month = Month::try_from(self.month()).map_err(|_| report!(invalid()))?;
        let date = Date::from_calendar_date(year, month, month.length(year))
            .map_err(|_| report!(invalid()))?;
        let time = Time::from_hms(23, 59, 59).map_err(|_| report!(invalid()))?;

        Ok(PrimitiveDateTime::new(date, time))
    }

    pub fn is_expired_at(
        &self,
        now: PrimitiveDateTime,
    ) -> errors::CustomResult<bool, errors::ValidationError> {
        Ok(now > self.expires_at()?)
    }

    pub fn is_expired(&self) -> errors::CustomResult<bool, errors::ValidationError> {
        self.is_expired_at(date_time::now())
    }
}

impl PeekInterface<StrongSecret<u8>> for CardExpirationMonth {
    fn peek(&self) -> &StrongSecret<u8> {
        &self.0
    }
}

impl PeekInterface<StrongSecret<u16>> for CardExpirationYear {
    fn peek(&self) -> &StrongSecret<u16> {
        &self.0
    }
}

/// Choices for the expiration month selector as `(value, label)` pairs, `01` through `12`.
pub fn expiration_month_options() -> Vec<(String, String)> {
    (1..=12u8)
        .map(|month| {
            let label = format!("{month:02}");
            (label.clone(), label)
        })
        .collect()
}

/// Choices for the expiration year selector: the four digit year as value, its last two digits
/// as label.
pub fn expiration_year_options(now: PrimitiveDateTime) -> Vec<(String, String)> {
    let current = now.year();
    (current..current + i32::from(EXPIRATION_YEAR_OPTIONS))
        .map(|year| (format!("{year:04}"), format!("{:02}", year.rem_euclid(100))))
        .collect()
}

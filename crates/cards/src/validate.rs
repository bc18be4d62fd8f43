use std::{fmt, ops::Deref, str::FromStr};

use masking::{PeekInterface, Strategy, StrongSecret, WithType};
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use time::PrimitiveDateTime;

use crate::{card_type::classify, CardExpiration, CardType};

/// Card number with spaces and dashes removed.
///
/// Holding a `CardNumber` says nothing about its validity; see [`validate_number`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CardNumber(StrongSecret<String, CardNumberStrategy>);

impl CardNumber {
    /// Strip the separators customers commonly type between digit groups.
    pub fn new(raw: &str) -> Self {
        Self(StrongSecret::new(
            raw.chars()
                .filter(|c| !c.is_whitespace() && *c != '-')
                .collect(),
        ))
    }

    /// Issuer identification number, the first 6 digits.
    pub fn get_card_isin(&self) -> String {
        self.0.peek().chars().take(6).collect::<String>()
    }

    pub fn get_last4(&self) -> String {
        let number = self.0.peek();
        number
            .get(number.len().saturating_sub(4)..)
            .unwrap_or_default()
            .to_string()
    }
}

impl FromStr for CardNumber {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl Deref for CardNumber {
    type Target = StrongSecret<String, CardNumberStrategy>;

    fn deref(&self) -> &StrongSecret<String, CardNumberStrategy> {
        &self.0
    }
}

impl<'de> Deserialize<'de> for CardNumber {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Ok(Self::new(&s))
    }
}

/// Shows the issuer prefix of well formed card numbers and masks the rest.
pub enum CardNumberStrategy {}

impl<T> Strategy<T> for CardNumberStrategy
where
    T: AsRef<str>,
{
    fn fmt(val: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let val_str: &str = val.as_ref();

        if val_str.len() < 15 || val_str.len() > 19 {
            return WithType::fmt(val, f);
        }

        match val_str.get(..6) {
            Some(value) => write!(f, "{}{}", value, "*".repeat(val_str.len() - 6)),
            None => WithType::fmt(val, f),
        }
    }
}

/// Card verification value as typed by the customer; leading zeros are significant.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CardSecurityCode(StrongSecret<String>);

impl CardSecurityCode {
    pub fn new(raw: &str) -> Self {
        Self(StrongSecret::new(raw.trim().to_string()))
    }
}

impl PeekInterface<String> for CardSecurityCode {
    fn peek(&self) -> &String {
        self.0.peek()
    }
}

impl<'de> Deserialize<'de> for CardSecurityCode {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Ok(Self::new(&s))
    }
}

/// A number is valid for a brand when it is all digits, has one of the brand's lengths, and
/// passes the Luhn checksum.
///
/// The digit and length checks run first; `luhn::valid` skips non-digits and accepts empty input.
pub fn validate_number(number: &str, card_type: CardType) -> bool {
    number.chars().all(|c| c.is_ascii_digit())
        && card_type.number_lengths().contains(&number.len())
        && luhn::valid(number)
}

/// The card remains usable until the end of its expiration month.
pub fn validate_expiration(month: u8, year: u16) -> bool {
    validate_expiration_at(month, year, common_utils::date_time::now())
}

pub fn validate_expiration_at(month: u8, year: u16, now: PrimitiveDateTime) -> bool {
    (1..=12).contains(&month) && (i32::from(year), month) >= (now.year(), u8::from(now.month()))
}

pub fn validate_security_code(code: &str, card_type: CardType) -> bool {
    code.len() == card_type.security_code_length() && code.chars().all(|c| c.is_ascii_digit())
}

/// Form field a validation failure is reported against.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum CardField {
    Type,
    Number,
    Expiration,
    SecurityCode,
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum CardValidationError {
    #[error("You have entered a credit card number of an unsupported card type.")]
    UnsupportedCardType,
    #[error("You have entered an invalid credit card number.")]
    InvalidNumber,
    #[error("You have entered an invalid expiration date.")]
    InvalidExpiration,
    #[error("You have entered an expired credit card.")]
    Expired,
    #[error("You have entered an invalid CVV.")]
    InvalidSecurityCode,
}

impl CardValidationError {
    pub fn field(&self) -> CardField {
        match self {
            Self::UnsupportedCardType | Self::InvalidNumber => CardField::Number,
            Self::InvalidExpiration | Self::Expired => CardField::Expiration,
            Self::InvalidSecurityCode => CardField::SecurityCode,
        }
    }
}

/// Card fields as submitted, before any checks.
#[derive(Debug)]
pub struct CardDetails<'a> {
    pub number: &'a CardNumber,
    pub expiration_month: &'a str,
    pub expiration_year: &'a str,
    pub security_code: &'a CardSecurityCode,
}

/// Outcome of a successful [`validate_card`].
#[derive(Debug)]
pub struct ValidatedCard {
    pub card_type: CardType,
    pub expiration: CardExpiration,
}

pub fn validate_card(
    details: &CardDetails<'_>,
    allowed: &[CardType],
) -> Result<ValidatedCard, Vec<CardValidationError>> {
    validate_card_at(details, allowed, common_utils::date_time::now())
}

/// Run every card check against `now`.
///
/// An unsupported brand is reported alone, since the remaining checks depend on the brand.
/// Otherwise every failing check is reported.
pub fn validate_card_at(
    details: &CardDetails<'_>,
    allowed: &[CardType],
    now: PrimitiveDateTime,
) -> Result<ValidatedCard, Vec<CardValidationError>> {
    let number = details.number.peek();
    let Some(card_type) = classify(number, allowed) else {
        return Err(vec![CardValidationError::UnsupportedCardType]);
    };

    let mut errors = Vec::new();

    if !validate_number(number, card_type) {
        errors.push(CardValidationError::InvalidNumber);
    }

    let expiration = parse_expiration(details.expiration_month, details.expiration_year);
    match &expiration {
        Some(expiration) => {
            if !validate_expiration_at(expiration.month(), expiration.year(), now) {
                errors.push(CardValidationError::Expired);
            }
        }
        None => errors.push(CardValidationError::InvalidExpiration),
    }

    if !validate_security_code(details.security_code.peek(), card_type) {
        errors.push(CardValidationError::InvalidSecurityCode);
    }

    match expiration {
        Some(expiration) if errors.is_empty() => Ok(ValidatedCard {
            card_type,
            expiration,
        }),
        _ => Err(errors),
    }
}

fn parse_expiration(month: &str, year: &str) -> Option<CardExpiration> {
    let month = month.trim().parse::<u8>().ok()?;
    let year = year.trim();
    if year.len() != 4 {
        return None;
    }
    let year = year.parse::<u16>().ok()?;
    CardExpiration::try_from((month, year)).ok()
}

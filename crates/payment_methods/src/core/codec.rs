//!
//! Field by field encryption of card details, and selective decryption for display.
//!

use cards::{CardNumber, CardType, ValidatedCard};
use common_utils::encryption::Encryption;
use error_stack::{report, ResultExt};
use gateway_env::{logger, Tag};
use masking::{PeekInterface, StrongSecret, ZeroizableSecret};

use crate::{
    core::errors::{PaymentMethodsError, PmResult},
    encryption::{EncryptionManagementInterface, EncryptionProfile},
    types::{CardDisplayDetails, EncryptedCardFields, PaymentDetails, PaymentMethod},
};

fn encrypt_field(
    encryption: &dyn EncryptionManagementInterface,
    profile: &EncryptionProfile,
    field: &'static str,
    plaintext: &[u8],
) -> PmResult<Encryption> {
    encryption
        .encrypt(profile, plaintext)
        .map(Encryption::from)
        .change_context(PaymentMethodsError::EncryptionFailed)
        .attach_printable_lazy(|| format!("while encrypting {field}"))
}

fn decrypt_field(
    encryption: &dyn EncryptionManagementInterface,
    profile: &EncryptionProfile,
    field: &'static str,
    ciphertext: &Encryption,
) -> PmResult<StrongSecret<String>> {
    let plaintext = encryption
        .decrypt(profile, ciphertext.get_inner().peek())
        .change_context(PaymentMethodsError::DecryptionFailed)
        .attach_printable_lazy(|| format!("while decrypting {field}"))?;

    String::from_utf8(plaintext)
        .map(StrongSecret::new)
        .map_err(|error| {
            error.into_bytes().zeroize();
            report!(PaymentMethodsError::DecryptionFailed)
        })
        .attach_printable_lazy(|| format!("{field} is not valid UTF-8"))
}

/// Encrypt each cardholder field on its own under `profile`.
///
/// The stored card type is the detected brand, and the expiration is stored in its canonical
/// two digit month and four digit year form.
pub fn encode_for_storage(
    encryption: &dyn EncryptionManagementInterface,
    profile: &EncryptionProfile,
    details: &PaymentDetails,
    card: &ValidatedCard,
) -> PmResult<EncryptedCardFields> {
    encrypt_fields(encryption, profile, details, card).map_err(|error| {
        logger::error!(tag = ?Tag::EncryptionService, ?error, "encryption of card details failed");
        error
    })
}

fn encrypt_fields(
    encryption: &dyn EncryptionManagementInterface,
    profile: &EncryptionProfile,
    details: &PaymentDetails,
    card: &ValidatedCard,
) -> PmResult<EncryptedCardFields> {
    Ok(EncryptedCardFields {
        card_type: encrypt_field(
            encryption,
            profile,
            "card_type",
            card.card_type.to_string().as_bytes(),
        )?,
        card_number: encrypt_field(
            encryption,
            profile,
            "card_number",
            details.card_number.peek().as_bytes(),
        )?,
        card_exp_month: encrypt_field(
            encryption,
            profile,
            "card_exp_month",
            card.expiration.get_month().two_digits().as_bytes(),
        )?,
        card_exp_year: encrypt_field(
            encryption,
            profile,
            "card_exp_year",
            card.expiration.get_year().four_digits().as_bytes(),
        )?,
        card_cvv: encrypt_field(
            encryption,
            profile,
            "card_cvv",
            details.card_cvc.peek().as_bytes(),
        )?,
    })
}

/// Decrypt only the brand and number of a stored card. Expiration and CVV stay encrypted.
///
/// A stored brand id the catalog no longer knows decodes as `None`.
pub fn decode_for_display(
    encryption: &dyn EncryptionManagementInterface,
    profile: &EncryptionProfile,
    record: &PaymentMethod,
) -> PmResult<CardDisplayDetails> {
    let card_type = decrypt_field(encryption, profile, "card_type", &record.card.card_type)?;
    let card_number = decrypt_field(encryption, profile, "card_number", &record.card.card_number)?;

    Ok(CardDisplayDetails {
        card_type: card_type.peek().parse::<CardType>().ok(),
        card_number: CardNumber::new(card_number.peek()),
    })
}

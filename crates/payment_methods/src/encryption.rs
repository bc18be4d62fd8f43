//!
//! Encryption service consumed by the gateway, and an in-process implementation holding one
//! AES-256-GCM key per encryption profile.
//!

use std::collections::HashMap;

use common_utils::{
    consts::AES_256_KEY_LENGTH,
    crypto::{self, DecodeMessage, EncodeMessage, GcmAes256},
    errors::{CustomResult, ValidationError},
    fp_utils::when,
};
use error_stack::{report, ResultExt};
use masking::{PeekInterface, Secret, StrongSecret};

use crate::consts::NO_ENCRYPTION_PROFILE;

#[derive(Debug, thiserror::Error)]
pub enum EncryptionError {
    #[error("Unknown encryption profile")]
    UnknownProfile,
    #[error("Invalid key material for encryption profile")]
    InvalidKey,
    #[error("Failed to encrypt input data")]
    EncryptionFailed,
    #[error("Failed to decrypt input data")]
    DecryptionFailed,
}

/// Identifier of a configured encryption profile.
///
/// Constructing one checks the id is a real selection and not the form placeholder.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct EncryptionProfile(String);

impl EncryptionProfile {
    pub fn new(profile_id: impl Into<String>) -> CustomResult<Self, ValidationError> {
        let profile_id = profile_id.into();
        when(
            profile_id.trim().is_empty() || profile_id == NO_ENCRYPTION_PROFILE,
            || {
                Err(report!(ValidationError::InvalidValue {
                    message: "An Encryption Profile must be selected.".to_string(),
                }))
            },
        )?;
        Ok(Self(profile_id))
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Encrypts and decrypts bytes under a named profile.
pub trait EncryptionManagementInterface: Send + Sync {
    fn encrypt(
        &self,
        profile: &EncryptionProfile,
        input: &[u8],
    ) -> CustomResult<Vec<u8>, EncryptionError>;

    fn decrypt(
        &self,
        profile: &EncryptionProfile,
        input: &[u8],
    ) -> CustomResult<Vec<u8>, EncryptionError>;

    /// Whether `profile` can be used with this service.
    fn has_profile(&self, profile: &EncryptionProfile) -> bool;
}

/// Keys by profile id. Ciphertexts are laid out as nonce, ciphertext, tag.
#[derive(Debug, Default)]
pub struct Keyring {
    keys: HashMap<EncryptionProfile, StrongSecret<Vec<u8>>>,
}

impl Keyring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(
        mut self,
        profile: EncryptionProfile,
        key: Vec<u8>,
    ) -> CustomResult<Self, EncryptionError> {
        when(key.len() != AES_256_KEY_LENGTH, || {
            Err(report!(EncryptionError::InvalidKey))
                .attach_printable_lazy(|| format!("profile {}", profile.id()))
        })?;
        self.keys.insert(profile, StrongSecret::new(key));
        Ok(self)
    }

    /// Add a profile with a freshly generated random key.
    pub fn with_generated_key(mut self, profile: EncryptionProfile) -> Self {
        let key = crypto::generate_cryptographically_secure_random_bytes::<AES_256_KEY_LENGTH>();
        self.keys.insert(profile, StrongSecret::new(key.to_vec()));
        self
    }

    fn key(&self, profile: &EncryptionProfile) -> CustomResult<&[u8], EncryptionError> {
        self.keys
            .get(profile)
            .map(|key| key.peek().as_slice())
            .ok_or_else(|| report!(EncryptionError::UnknownProfile))
            .attach_printable_lazy(|| format!("profile {}", profile.id()))
    }
}

impl EncryptionManagementInterface for Keyring {
    fn encrypt(
        &self,
        profile: &EncryptionProfile,
        input: &[u8],
    ) -> CustomResult<Vec<u8>, EncryptionError> {
        GcmAes256
            .encode_message(self.key(profile)?, input)
            .change_context(EncryptionError::EncryptionFailed)
    }

    fn decrypt(
        &self,
        profile: &EncryptionProfile,
        input: &[u8],
    ) -> CustomResult<Vec<u8>, EncryptionError> {
        GcmAes256
            .decode_message(self.key(profile)?, Secret::new(input.to_vec()))
            .change_context(EncryptionError::DecryptionFailed)
    }

    fn has_profile(&self, profile: &EncryptionProfile) -> bool {
        self.keys.contains_key(profile)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn profile(id: &str) -> EncryptionProfile {
        EncryptionProfile::new(id).unwrap()
    }

    #[test]
    fn placeholder_profiles_are_rejected() {
        assert!(EncryptionProfile::new(NO_ENCRYPTION_PROFILE).is_err());
        assert!(EncryptionProfile::new("").is_err());
        assert!(EncryptionProfile::new("  ").is_err());
        assert_eq!(profile("card_data").id(), "card_data");
    }

    #[test]
    fn round_trips_under_the_same_profile() {
        let keyring = Keyring::new().with_generated_key(profile("card_data"));

        let encrypted = keyring.encrypt(&profile("card_data"), b"4111111111111111").unwrap();
        assert_ne!(encrypted.as_slice(), b"4111111111111111".as_slice());

        let decrypted = keyring.decrypt(&profile("card_data"), &encrypted).unwrap();
        assert_eq!(decrypted, b"4111111111111111");
    }

    #[test]
    fn other_profile_cannot_decrypt() {
        let keyring = Keyring::new()
            .with_generated_key(profile("first"))
            .with_generated_key(profile("second"));

        let encrypted = keyring.encrypt(&profile("first"), b"123").unwrap();
        let error = keyring.decrypt(&profile("second"), &encrypted).unwrap_err();
        assert!(matches!(
            error.current_context(),
            EncryptionError::DecryptionFailed
        ));
    }

    #[test]
    fn unknown_profile() {
        let keyring = Keyring::new();
        assert!(!keyring.has_profile(&profile("missing")));

        let error = keyring.encrypt(&profile("missing"), b"123").unwrap_err();
        assert!(matches!(
            error.current_context(),
            EncryptionError::UnknownProfile
        ));
    }

    #[test]
    fn short_keys_are_refused() {
        let error = Keyring::new()
            .with_key(profile("card_data"), vec![0; 16])
            .unwrap_err();
        assert!(matches!(error.current_context(), EncryptionError::InvalidKey));

        let keyring = Keyring::new()
            .with_key(profile("card_data"), vec![7; AES_256_KEY_LENGTH])
            .unwrap();
        assert!(keyring.has_profile(&profile("card_data")));
    }
}

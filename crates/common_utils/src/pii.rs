//! Personal Identifiable Information protection.

use std::fmt;

use masking::Strategy;

/// Strategy for masking ciphertext. Only the length is shown.
#[derive(Debug)]
pub enum EncryptionStrategy {}

impl<T> Strategy<T> for EncryptionStrategy
where
    T: AsRef<[u8]>,
{
    fn fmt(value: &T, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            fmt,
            "*** Encrypted data of length {} bytes ***",
            value.as_ref().len()
        )
    }
}

#[cfg(test)]
mod pii_masking_strategy_tests {
    use masking::Secret;

    use super::EncryptionStrategy;

    #[test]
    fn test_encryption_strategy_shows_only_length() {
        let blob: Secret<Vec<u8>, EncryptionStrategy> = Secret::new(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(
            "*** Encrypted data of length 4 bytes ***",
            format!("{blob:?}")
        );
    }
}

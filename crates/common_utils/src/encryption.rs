//! Ciphertext as persisted on records.

use masking::Secret;

use crate::pii::EncryptionStrategy;

/// Encrypted bytes of a single field. `Debug` output only reveals the length.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Eq, PartialEq)]
#[serde(transparent)]
pub struct Encryption {
    inner: Secret<Vec<u8>, EncryptionStrategy>,
}

impl Encryption {
    /// Wrap ciphertext produced by an encryption service
    pub fn new(item: Secret<Vec<u8>, EncryptionStrategy>) -> Self {
        Self { inner: item }
    }

    /// Borrow the ciphertext
    #[inline]
    pub fn get_inner(&self) -> &Secret<Vec<u8>, EncryptionStrategy> {
        &self.inner
    }
}

impl From<Vec<u8>> for Encryption {
    fn from(value: Vec<u8>) -> Self {
        Self::new(Secret::new(value))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use masking::PeekInterface;

    use super::*;

    #[test]
    fn serializes_as_plain_bytes() {
        let encrypted = Encryption::from(vec![1, 2, 3]);
        assert_eq!(serde_json::to_string(&encrypted).unwrap(), "[1,2,3]");
        assert_eq!(
            format!("{encrypted:?}"),
            "Encryption { inner: *** Encrypted data of length 3 bytes *** }"
        );

        let decoded: Encryption = serde_json::from_str("[1,2,3]").unwrap();
        assert_eq!(decoded.get_inner().peek(), &vec![1, 2, 3]);
    }
}

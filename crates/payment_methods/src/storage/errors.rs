use crate::types::PaymentState;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("ValueNotFound: {0}")]
    ValueNotFound(String),
    #[error("DuplicateValue: {entity} already exists {key:?}")]
    DuplicateValue {
        entity: &'static str,
        key: Option<String>,
    },
    #[error("StateConflict: payment is {current}, expected {expected}")]
    StateConflict {
        current: PaymentState,
        expected: PaymentState,
    },
    #[error("MockDb error")]
    MockDbError,
}

impl StorageError {
    pub fn is_db_not_found(&self) -> bool {
        matches!(self, Self::ValueNotFound(_))
    }
}

//! Identity and transaction types shared across the protocol.

use serde::{Deserialize, Serialize};

/// Identity of a teller, in `0..tellers`.
///
/// Doubles as the index into the handshake vector and the assignment table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TellerId(usize);

impl TellerId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for TellerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a customer, in `0..customers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CustomerId(usize);

impl CustomerId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two transaction kinds. Assigned per customer before the protocol
/// starts and immutable thereafter. They are opaque branches that exercise
/// different resource-lock paths; there is no monetary semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Local processing, then the vault.
    Deposit,
    /// Local processing, supervisor authorization, then the vault.
    Withdrawal,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_as_indices() {
        assert_eq!(TellerId::new(2).to_string(), "2");
        assert_eq!(CustomerId::new(41).to_string(), "41");
    }

    #[test]
    fn ids_serialize_as_bare_indices() {
        assert_eq!(
            serde_json::to_value(TellerId::new(2)).unwrap(),
            serde_json::json!(2)
        );
        assert_eq!(
            serde_json::to_value(CustomerId::new(41)).unwrap(),
            serde_json::json!(41)
        );
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(TransactionKind::Deposit).unwrap(),
            serde_json::json!("deposit")
        );
        assert_eq!(
            serde_json::from_str::<TransactionKind>("\"withdrawal\"").unwrap(),
            TransactionKind::Withdrawal
        );
    }
}

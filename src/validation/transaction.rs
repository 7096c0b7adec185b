//! Transaction structure
//!
//! Account-style transfers: an amount moves from `sender` to `recipient`.
//! Nothing here checks balances or signatures; the ledger accepts any
//! well-formed transfer.

use serde::{ser::Error as _, Deserialize, Serialize, Serializer};
use serde_json::value::RawValue;
use uuid::Uuid;

/// A single transfer between two addresses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Opaque unique id, assigned at creation time
    pub transaction_id: String,
    /// Amount moved; printed on the wire the way JavaScript prints numbers
    #[serde(serialize_with = "serialize_amount")]
    pub amount: f64,
    /// Address debited
    pub sender: String,
    /// Address credited
    pub recipient: String,
}

impl Transaction {
    /// Create a transaction with a freshly generated id
    pub fn new(amount: f64, sender: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self::with_id(generate_id(), amount, sender, recipient)
    }

    /// Create a transaction with a caller-supplied id
    pub fn with_id(
        transaction_id: impl Into<String>,
        amount: f64,
        sender: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            amount,
            sender: sender.into(),
            recipient: recipient.into(),
        }
    }

    /// Whether `address` takes part in this transfer
    pub fn involves(&self, address: &str) -> bool {
        self.sender == address || self.recipient == address
    }
}

/// Generate an opaque id: a v4 UUID without dashes
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Write amounts with ECMAScript `Number#toString` rules (`10`, `0.000001`, `1e+21`)
///
/// Block digests cover the JSON text of every transaction, so amounts must
/// print the way every other node on the network prints them. Non-finite
/// values become `null`, as `JSON.stringify` does.
fn serialize_amount<S: Serializer>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if !amount.is_finite() {
        return serializer.serialize_none();
    }
    let mut buffer = ryu_js::Buffer::new();
    let printed = buffer.format_finite(*amount);
    RawValue::from_string(printed.to_string())
        .map_err(S::Error::custom)?
        .serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transaction_fields() {
        let tx = Transaction::new(10.0, "A", "B");
        assert_eq!(tx.amount, 10.0);
        assert_eq!(tx.sender, "A");
        assert_eq!(tx.recipient, "B");
    }

    #[test]
    fn test_generated_ids_are_unique_hex() {
        let a = Transaction::new(1.0, "A", "B");
        let b = Transaction::new(1.0, "A", "B");
        assert_ne!(a.transaction_id, b.transaction_id);
        assert_eq!(a.transaction_id.len(), 32);
        assert!(a.transaction_id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_wire_field_names_and_order() {
        let tx = Transaction::with_id("t1", 10.0, "A", "B");
        assert_eq!(
            serde_json::to_string(&tx).unwrap(),
            r#"{"transactionId":"t1","amount":10,"sender":"A","recipient":"B"}"#
        );
    }

    #[test]
    fn test_fractional_amount_keeps_fraction() {
        let tx = Transaction::with_id("t2", 12.5, "00", "node");
        let json = serde_json::to_string(&tx).unwrap();
        assert!(json.contains(r#""amount":12.5"#));
    }

    #[test]
    fn test_negative_whole_amount() {
        let tx = Transaction::with_id("t3", -3.0, "A", "B");
        let json = serde_json::to_string(&tx).unwrap();
        assert!(json.contains(r#""amount":-3"#));
    }

    #[test]
    fn test_amounts_print_like_javascript() {
        let cases = [
            (0.000001, "0.000001"),
            (1.5e-6, "0.0000015"),
            (1e-7, "1e-7"),
            (9_007_199_254_740_994.0, "9007199254740994"),
            (1e21, "1e+21"),
            (0.1 + 0.2, "0.30000000000000004"),
        ];

        for (amount, expected) in cases {
            let tx = Transaction::with_id("t", amount, "A", "B");
            let json = serde_json::to_string(&tx).unwrap();
            assert!(
                json.contains(&format!(r#""amount":{expected},"#)),
                "{amount} printed as {json}"
            );
        }
    }

    #[test]
    fn test_non_finite_amount_is_null() {
        let tx = Transaction::with_id("t", f64::NAN, "A", "B");
        let json = serde_json::to_string(&tx).unwrap();
        assert!(json.contains(r#""amount":null"#));
    }

    #[test]
    fn test_deserialize_integer_amount() {
        let tx: Transaction = serde_json::from_str(
            r#"{"transactionId":"x","amount":7,"sender":"A","recipient":"B"}"#,
        )
        .unwrap();
        assert_eq!(tx.amount, 7.0);
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let parsed: Result<Transaction, _> =
            serde_json::from_str(r#"{"amount":7,"sender":"A","recipient":"B"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_involves() {
        let tx = Transaction::with_id("t", 1.0, "A", "B");
        assert!(tx.involves("A"));
        assert!(tx.involves("B"));
        assert!(!tx.involves("C"));
    }
}

//! The allocation policies a payment can be mapped with.

use serde::{Deserialize, Serialize};

/// The closed set of allocation policies. The serialized strings ("Against Invoice", "Advance",
/// "FIFO") are the values written to the Payment Type column of the mapping file and accepted in
/// assignment plans.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum PaymentType {
    /// The payment settles a specific open invoice, named by the selector.
    #[serde(rename = "Against Invoice")]
    AgainstInvoice,
    /// The payment is recorded as unapplied to any specific invoice.
    Advance,
    /// Oldest-first application across the customer's open invoices. See `FifoMode` for how much
    /// of that intent is actually carried out.
    #[serde(rename = "FIFO")]
    Fifo,
}

impl Default for PaymentType {
    fn default() -> Self {
        PaymentType::AgainstInvoice
    }
}

serde_plain::derive_display_from_serialize!(PaymentType);
serde_plain::derive_fromstr_from_deserialize!(PaymentType);

/// Controls what a FIFO selection does during a mapping run.
///
/// The system this tool replaces recorded the FIFO tag without applying the payment to any
/// invoice. `Tag` reproduces that; `Apply` is the opt-in that records the oldest open invoice.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum FifoMode {
    /// Default: record the FIFO tag with an empty invoice reference.
    #[default]
    Tag,
    /// Record the customer's oldest open invoice as the reference.
    Apply,
}

serde_plain::derive_display_from_serialize!(FifoMode);
serde_plain::derive_fromstr_from_deserialize!(FifoMode);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_payment_type_wire_strings() {
        assert_eq!(PaymentType::AgainstInvoice.to_string(), "Against Invoice");
        assert_eq!(PaymentType::Advance.to_string(), "Advance");
        assert_eq!(PaymentType::Fifo.to_string(), "FIFO");
    }

    #[test]
    fn test_payment_type_from_str() {
        assert_eq!(
            PaymentType::from_str("Against Invoice").unwrap(),
            PaymentType::AgainstInvoice
        );
        assert_eq!(PaymentType::from_str("FIFO").unwrap(), PaymentType::Fifo);
        assert!(PaymentType::from_str("fifo").is_err());
    }

    #[test]
    fn test_fifo_mode_strings() {
        assert_eq!(FifoMode::Tag.to_string(), "tag");
        assert_eq!(FifoMode::from_str("apply").unwrap(), FifoMode::Apply);
    }
}

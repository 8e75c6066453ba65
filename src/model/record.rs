//! The engine's output unit: one `MappingRecord` per successfully allocated payment.

use crate::model::{Amount, PaymentType};
use serde::{Deserialize, Serialize};

/// The mapping file's header row, in output order.
pub(crate) const MAPPING_HEADERS: [&str; 9] = [
    "Date",
    "Amount",
    "Narration",
    "Customer",
    "Payment Type",
    "Invoice No",
    "Sub Segment",
    "Segment",
    "Category",
];

// "Date","Amount","Narration","Customer","Payment Type","Invoice No","Sub Segment","Segment","Category"
/// A derived, immutable row of the mapping file. It does not own or mutate the source invoice or
/// payment; the set of records for a run is the sole artifact handed to the exporter.
///
/// `Invoice No` is empty unless the policy provides one. The segment fields are copied from the
/// customer's first invoice row in file order, independent of the invoice actually referenced.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MappingRecord {
    pub(crate) date: String,
    pub(crate) amount: Amount,
    pub(crate) narration: String,
    pub(crate) customer: String,
    #[serde(rename = "Payment Type")]
    pub(crate) payment_type: PaymentType,
    #[serde(rename = "Invoice No")]
    pub(crate) invoice_no: String,
    #[serde(rename = "Sub Segment")]
    pub(crate) sub_segment: String,
    pub(crate) segment: String,
    pub(crate) category: String,
}

impl MappingRecord {
    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn payment_type(&self) -> PaymentType {
        self.payment_type
    }

    pub fn invoice_no(&self) -> &str {
        &self.invoice_no
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_csv_serialization_matches_headers() {
        let record = MappingRecord {
            date: "2024-01-01".into(),
            amount: Amount::from_str("100").unwrap(),
            narration: "pay".into(),
            customer: "Acme".into(),
            payment_type: PaymentType::AgainstInvoice,
            invoice_no: "INV1".into(),
            sub_segment: "SS1".into(),
            segment: "S1".into(),
            category: "C1".into(),
        };
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.serialize(&record).unwrap();
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next().unwrap(), MAPPING_HEADERS.join(","));
        assert_eq!(
            lines.next().unwrap(),
            "2024-01-01,100,pay,Acme,Against Invoice,INV1,SS1,S1,C1"
        );
    }
}

//! The AR ledger side of the reconciliation: one `Invoice` per AR file row.

use crate::columns;
use crate::model::Amount;
use crate::table::Table;
use crate::Result;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Represents the AR table parsed into typed rows. Row order is the file order, which matters:
/// the first row found for a customer is that customer's "representative" metadata source.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Invoices {
    data: Vec<Invoice>,
}

impl Invoices {
    /// Parses every data row of the (already validated) AR table.
    pub fn from_table(table: &Table) -> Result<Self> {
        let columns = table.normalized_headers();
        let mut data = Vec::new();
        for (row_ix, row) in table.rows().iter().enumerate() {
            let invoice = Invoice::new_with_columns(columns, row.iter().map(String::as_str))
                .with_context(|| format!("Unable to parse AR file row {}", row_ix + 2))?;
            data.push(invoice);
        }
        Ok(Self { data })
    }

    /// The distinct, non-empty customer identifiers in first-appearance order. These are the
    /// candidates offered to the selector.
    pub fn customers(&self) -> Vec<String> {
        let mut customers: Vec<String> = Vec::new();
        for invoice in &self.data {
            let customer = invoice.customer();
            if !customer.is_empty() && !customers.iter().any(|c| c == customer) {
                customers.push(customer.to_string());
            }
        }
        customers
    }

    /// All invoices belonging to `customer`, in file order.
    pub fn for_customer(&self, customer: &str) -> Vec<&Invoice> {
        self.data
            .iter()
            .filter(|inv| inv.customer() == customer)
            .collect()
    }

    /// The customer's open invoices: positive amount and a non-empty invoice number.
    pub fn open_for_customer(&self, customer: &str) -> Vec<&Invoice> {
        self.data
            .iter()
            .filter(|inv| inv.customer() == customer && inv.is_open())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Invoice> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Represents a single AR ledger line.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Invoice {
    pub(crate) invoice_no: String,
    pub(crate) invoice_date: String,
    pub(crate) invoice_amount: Amount,
    pub(crate) customer: String,
    pub(crate) segment: String,
    pub(crate) sub_segment: String,
    pub(crate) category: String,
    /// Columns beyond the required set are carried along untouched.
    pub(crate) other_fields: BTreeMap<String, String>,
}

impl Invoice {
    pub fn new_with_columns<S1, S2, I>(columns: &[S1], values: I) -> Result<Self>
    where
        S1: AsRef<str>,
        S2: Into<String>,
        I: IntoIterator<Item = S2>,
    {
        let mut invoice = Invoice::default();
        for (ix, value) in values.into_iter().map(|s| s.into()).enumerate() {
            let column = columns
                .get(ix)
                .with_context(|| format!("No column found for index {ix}"))?
                .as_ref();
            invoice.set_with_column(column, value)?;
        }
        Ok(invoice)
    }

    pub fn set_with_column<S1, S2>(&mut self, column: S1, value: S2) -> Result<()>
    where
        S1: AsRef<str>,
        S2: Into<String>,
    {
        let column = column.as_ref();
        let value = value.into();

        match InvoiceColumn::from_column(column) {
            Ok(col) => match col {
                InvoiceColumn::InvoiceNo => self.invoice_no = value,
                InvoiceColumn::InvoiceDate => self.invoice_date = value,
                InvoiceColumn::InvoiceAmount => {
                    self.invoice_amount = Amount::from_str(&value)
                        .with_context(|| format!("Invalid invoice_amount '{value}'"))?
                }
                InvoiceColumn::Customer => self.customer = value,
                InvoiceColumn::Segment => self.segment = value,
                InvoiceColumn::SubSegment => self.sub_segment = value,
                InvoiceColumn::Category => self.category = value,
            },
            Err(_) => {
                let _ = self.other_fields.insert(column.to_string(), value);
            }
        }

        Ok(())
    }

    /// An invoice is open when its amount is positive and it has an invoice number.
    pub fn is_open(&self) -> bool {
        self.invoice_amount.is_positive() && !self.invoice_no.is_empty()
    }

    /// The invoice date parsed into a calendar date, when it can be. Used for oldest-first
    /// ordering; unparseable dates leave the invoice at its file position in that ordering.
    pub fn date(&self) -> Option<NaiveDate> {
        parse_date(&self.invoice_date)
    }

    pub fn invoice_no(&self) -> &str {
        &self.invoice_no
    }

    pub fn invoice_amount(&self) -> Amount {
        self.invoice_amount
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn segment(&self) -> &str {
        &self.segment
    }

    pub fn sub_segment(&self) -> &str {
        &self.sub_segment
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

/// Represents the known columns of the AR table (post-normalization names).
#[derive(Default, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum InvoiceColumn {
    #[default]
    InvoiceNo,
    InvoiceDate,
    InvoiceAmount,
    Customer,
    Segment,
    SubSegment,
    Category,
}

serde_plain::derive_display_from_serialize!(InvoiceColumn);
serde_plain::derive_fromstr_from_deserialize!(InvoiceColumn);

impl InvoiceColumn {
    pub(crate) fn from_column(column: impl AsRef<str>) -> Result<InvoiceColumn> {
        match column.as_ref() {
            columns::INVOICE_NO => Ok(InvoiceColumn::InvoiceNo),
            columns::INVOICE_DATE => Ok(InvoiceColumn::InvoiceDate),
            columns::INVOICE_AMOUNT => Ok(InvoiceColumn::InvoiceAmount),
            columns::CUSTOMER => Ok(InvoiceColumn::Customer),
            columns::SEGMENT => Ok(InvoiceColumn::Segment),
            columns::SUB_SEGMENT => Ok(InvoiceColumn::SubSegment),
            columns::CATEGORY => Ok(InvoiceColumn::Category),
            bad => bail!("Invalid AR column name '{bad}'"),
        }
    }
}

/// The date layouts encountered in exported AR files.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%Y/%m/%d"];

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    // Spreadsheet exports sometimes carry a time component after the date
    let s = s.split_whitespace().next().unwrap_or(s);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::ar_table;

    #[test]
    fn test_from_table() {
        let invoices = Invoices::from_table(&ar_table()).unwrap();
        assert_eq!(invoices.len(), 4);
        let first = invoices.iter().next().unwrap();
        assert_eq!(first.invoice_no(), "INV1");
        assert_eq!(first.customer(), "Acme");
        assert_eq!(first.segment(), "S1");
    }

    #[test]
    fn test_unknown_columns_are_carried() {
        let invoice = Invoice::new_with_columns(
            &["invoice_no", "customer", "remarks"],
            vec!["INV9", "Acme", "paid by cheque"],
        )
        .unwrap();
        assert_eq!(
            invoice.other_fields.get("remarks").map(String::as_str),
            Some("paid by cheque")
        );
    }

    #[test]
    fn test_malformed_amount_is_an_error() {
        let result = Invoice::new_with_columns(
            &["invoice_no", "invoice_amount"],
            vec!["INV1", "one hundred"],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_customers_distinct_in_order() {
        let invoices = Invoices::from_table(&ar_table()).unwrap();
        assert_eq!(invoices.customers(), vec!["Acme", "Globex"]);
    }

    #[test]
    fn test_open_for_customer_excludes_settled() {
        let invoices = Invoices::from_table(&ar_table()).unwrap();
        let open: Vec<&str> = invoices
            .open_for_customer("Acme")
            .iter()
            .map(|inv| inv.invoice_no())
            .collect();
        // INV3 has a negative amount and must not be offered
        assert_eq!(open, vec!["INV1", "INV2"]);
    }

    #[test]
    fn test_is_open_requires_invoice_no() {
        let mut invoice = Invoice::default();
        invoice.set_with_column("invoice_amount", "100").unwrap();
        assert!(!invoice.is_open());
        invoice.set_with_column("invoice_no", "INV1").unwrap();
        assert!(invoice.is_open());
    }

    #[test]
    fn test_date_parsing() {
        let mut invoice = Invoice::default();
        invoice.set_with_column("invoice_date", "2024-03-05").unwrap();
        assert_eq!(invoice.date(), NaiveDate::from_ymd_opt(2024, 3, 5));
        invoice.invoice_date = String::from("05/03/2024");
        assert_eq!(invoice.date(), NaiveDate::from_ymd_opt(2024, 3, 5));
        invoice.invoice_date = String::from("not a date");
        assert_eq!(invoice.date(), None);
    }
}

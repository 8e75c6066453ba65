//! The bank side of the reconciliation: one `Payment` per statement line.

use crate::columns;
use crate::model::Amount;
use crate::table::Table;
use crate::Result;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Represents the bank statement parsed into typed rows, in file order.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Payments {
    data: Vec<Payment>,
}

impl Payments {
    /// Parses every data row of the (already validated) bank statement table.
    pub fn from_table(table: &Table) -> Result<Self> {
        let columns = table.normalized_headers();
        let mut data = Vec::new();
        for (row_ix, row) in table.rows().iter().enumerate() {
            let payment = Payment::new_with_columns(columns, row.iter().map(String::as_str))
                .with_context(|| format!("Unable to parse bank file row {}", row_ix + 2))?;
            data.push(payment);
        }
        Ok(Self { data })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Payment> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Represents a single bank statement line to be reconciled. Read once per run, never mutated;
/// exactly one allocation decision is produced for it.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Payment {
    pub(crate) date: String,
    pub(crate) payment_received: Amount,
    pub(crate) particular: String,
    pub(crate) other_fields: BTreeMap<String, String>,
}

impl Payment {
    pub fn new_with_columns<S1, S2, I>(columns: &[S1], values: I) -> Result<Self>
    where
        S1: AsRef<str>,
        S2: Into<String>,
        I: IntoIterator<Item = S2>,
    {
        let mut payment = Payment::default();
        for (ix, value) in values.into_iter().map(|s| s.into()).enumerate() {
            let column = columns
                .get(ix)
                .with_context(|| format!("No column found for index {ix}"))?
                .as_ref();
            payment.set_with_column(column, value)?;
        }
        Ok(payment)
    }

    pub fn set_with_column<S1, S2>(&mut self, column: S1, value: S2) -> Result<()>
    where
        S1: AsRef<str>,
        S2: Into<String>,
    {
        let column = column.as_ref();
        let value = value.into();

        match PaymentColumn::from_column(column) {
            Ok(col) => match col {
                PaymentColumn::Date => self.date = value,
                PaymentColumn::PaymentReceived => {
                    self.payment_received = Amount::from_str(&value)
                        .with_context(|| format!("Invalid payment_received '{value}'"))?
                }
                PaymentColumn::Particular => self.particular = value,
            },
            Err(_) => {
                let _ = self.other_fields.insert(column.to_string(), value);
            }
        }

        Ok(())
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn payment_received(&self) -> Amount {
        self.payment_received
    }

    pub fn particular(&self) -> &str {
        &self.particular
    }
}

/// Represents the known columns of the bank statement (post-normalization names).
#[derive(Default, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PaymentColumn {
    #[default]
    Date,
    PaymentReceived,
    Particular,
}

serde_plain::derive_display_from_serialize!(PaymentColumn);
serde_plain::derive_fromstr_from_deserialize!(PaymentColumn);

impl PaymentColumn {
    pub(crate) fn from_column(column: impl AsRef<str>) -> Result<PaymentColumn> {
        match column.as_ref() {
            columns::DATE => Ok(PaymentColumn::Date),
            columns::PAYMENT_RECEIVED => Ok(PaymentColumn::PaymentReceived),
            columns::PARTICULAR => Ok(PaymentColumn::Particular),
            bad => bail!("Invalid bank column name '{bad}'"),
        }
    }
}

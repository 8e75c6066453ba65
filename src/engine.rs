//! The allocation engine.
//!
//! For each bank payment, resolve a customer, apply the chosen allocation policy, and emit one
//! `MappingRecord`. The engine reads the invoice table and never mutates it; a payment whose
//! customer has no AR rows is skipped with a warning rather than failing the run.

use crate::model::{FifoMode, Invoice, Invoices, MappingRecord, Payment, PaymentType, Payments};
use crate::Result;
use anyhow::{bail, Context};
use tracing::{debug, warn};

/// A per-payment choice of customer and payment type, supplied by a `Selector`.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Selection {
    customer: String,
    payment_type: PaymentType,
}

impl Selection {
    pub fn new(customer: impl Into<String>, payment_type: PaymentType) -> Self {
        Self {
            customer: customer.into(),
            payment_type,
        }
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn payment_type(&self) -> PaymentType {
        self.payment_type
    }
}

/// Supplies the allocation decisions for each payment.
///
/// The system this tool replaces made these choices through interactive widgets inside the
/// processing loop. Here they are a strategy passed into [`allocate`], so the engine runs
/// headlessly: `PromptSelector` adapts a human at a terminal, `PlanSelector` adapts a prepared
/// assignment file, and tests supply fixed plans.
pub trait Selector {
    /// Chooses the customer and payment type for the payment at `index` (zero-based statement
    /// order). `customers` is the candidate set: the distinct customer identifiers from the AR
    /// table, in first-appearance order.
    fn select(&mut self, index: usize, payment: &Payment, customers: &[String])
        -> Result<Selection>;

    /// Chooses an invoice number for an Against Invoice payment. `open_invoices` is the resolved
    /// customer's open set; the returned number must belong to it.
    fn pick_invoice(
        &mut self,
        index: usize,
        payment: &Payment,
        open_invoices: &[&Invoice],
    ) -> Result<String>;
}

/// The result of a mapping run: the records produced plus the statement indexes that were
/// skipped because their customer had no AR rows.
#[derive(Debug, Clone, Default)]
pub struct AllocationOutcome {
    records: Vec<MappingRecord>,
    skipped: Vec<usize>,
}

impl AllocationOutcome {
    pub fn records(&self) -> &[MappingRecord] {
        &self.records
    }

    pub fn skipped(&self) -> &[usize] {
        &self.skipped
    }

    pub fn into_records(self) -> Vec<MappingRecord> {
        self.records
    }
}

/// Computes one `MappingRecord` per payment.
///
/// Per payment: resolve the customer via the selector; collect that customer's invoices; if there
/// are none, warn and skip. The first matching invoice row is the source of the segment metadata
/// regardless of which invoice, if any, the policy references. Against Invoice records the
/// selector's pick from the open set, Advance records no invoice, and FIFO behaves per
/// `fifo_mode`. Invoice amounts are never decremented.
pub fn allocate(
    payments: &Payments,
    invoices: &Invoices,
    selector: &mut dyn Selector,
    fifo_mode: FifoMode,
) -> Result<AllocationOutcome> {
    let customers = invoices.customers();
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for (index, payment) in payments.iter().enumerate() {
        let selection = selector
            .select(index, payment, &customers)
            .with_context(|| format!("Unable to resolve bank row {}", index + 1))?;
        let customer = selection.customer();

        let cust_rows = invoices.for_customer(customer);
        let Some(representative) = cust_rows.first() else {
            warn!(
                "Customer '{customer}' not found in the AR file, skipping bank row {}",
                index + 1
            );
            skipped.push(index);
            continue;
        };

        let invoice_no = match selection.payment_type() {
            PaymentType::AgainstInvoice => {
                let open = invoices.open_for_customer(customer);
                if open.is_empty() {
                    warn!(
                        "Customer '{customer}' has no open invoices, bank row {} is recorded \
                        without an invoice reference",
                        index + 1
                    );
                    String::new()
                } else {
                    let chosen = selector.pick_invoice(index, payment, &open)?;
                    if !open.iter().any(|inv| inv.invoice_no() == chosen) {
                        bail!(
                            "Invoice '{chosen}' is not among customer '{customer}'s open \
                            invoices (bank row {})",
                            index + 1
                        );
                    }
                    chosen
                }
            }
            PaymentType::Advance => String::new(),
            PaymentType::Fifo => match fifo_mode {
                // The FIFO tag is recorded without applying the payment to any invoice
                FifoMode::Tag => String::new(),
                FifoMode::Apply => oldest_open(&invoices.open_for_customer(customer))
                    .map(|inv| inv.invoice_no().to_string())
                    .unwrap_or_default(),
            },
        };

        debug!(
            "Bank row {}: {} / {} / '{invoice_no}'",
            index + 1,
            customer,
            selection.payment_type()
        );

        records.push(MappingRecord {
            date: payment.date().to_string(),
            amount: payment.payment_received(),
            narration: payment.particular().to_string(),
            customer: customer.to_string(),
            payment_type: selection.payment_type(),
            invoice_no,
            sub_segment: representative.sub_segment().to_string(),
            segment: representative.segment().to_string(),
            category: representative.category().to_string(),
        });
    }

    Ok(AllocationOutcome { records, skipped })
}

/// The oldest open invoice by invoice date. Unparseable dates sort after parseable ones, and
/// ties keep file order.
fn oldest_open<'a>(open: &[&'a Invoice]) -> Option<&'a Invoice> {
    open.iter()
        .copied()
        .enumerate()
        .min_by_key(|&(ix, inv)| (inv.date().is_none(), inv.date(), ix))
        .map(|(_, inv)| inv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selectors::{Assignment, PlanSelector};
    use crate::test::{ar_table, bank_table, single_row_tables};
    use crate::Table;

    fn parse(ar: &Table, bank: &Table) -> (Payments, Invoices) {
        (
            Payments::from_table(bank).unwrap(),
            Invoices::from_table(ar).unwrap(),
        )
    }

    #[test]
    fn test_against_invoice_single_row_scenario() {
        let (ar, bank) = single_row_tables();
        let (payments, invoices) = parse(&ar, &bank);
        let mut selector = PlanSelector::new(vec![Assignment::new(
            "Acme",
            PaymentType::AgainstInvoice,
            Some("INV1"),
        )]);
        let outcome = allocate(&payments, &invoices, &mut selector, FifoMode::Tag).unwrap();
        assert!(outcome.skipped().is_empty());
        let records = outcome.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.date, "2024-01-01");
        assert_eq!(record.amount.to_string(), "100");
        assert_eq!(record.narration, "pay");
        assert_eq!(record.customer(), "Acme");
        assert_eq!(record.payment_type(), PaymentType::AgainstInvoice);
        assert_eq!(record.invoice_no(), "INV1");
        assert_eq!(record.sub_segment, "SS1");
        assert_eq!(record.segment, "S1");
        assert_eq!(record.category, "C1");
    }

    #[test]
    fn test_advance_leaves_invoice_empty() {
        let (payments, invoices) = parse(&ar_table(), &bank_table());
        let mut selector = PlanSelector::new(vec![
            Assignment::new("Acme", PaymentType::Advance, None::<String>),
            Assignment::new("Globex", PaymentType::Advance, None::<String>),
            Assignment::new("Acme", PaymentType::Advance, None::<String>),
        ]);
        let outcome = allocate(&payments, &invoices, &mut selector, FifoMode::Tag).unwrap();
        assert_eq!(outcome.records().len(), 3);
        for record in outcome.records() {
            assert_eq!(record.invoice_no(), "");
        }
    }

    #[test]
    fn test_unknown_customer_is_skipped() {
        let (ar, bank) = single_row_tables();
        let (payments, invoices) = parse(&ar, &bank);
        let mut selector = PlanSelector::new(vec![Assignment::new(
            "Initech",
            PaymentType::AgainstInvoice,
            Some("INV1"),
        )]);
        let outcome = allocate(&payments, &invoices, &mut selector, FifoMode::Tag).unwrap();
        assert!(outcome.records().is_empty());
        assert_eq!(outcome.skipped(), &[0]);
    }

    #[test]
    fn test_against_invoice_rejects_pick_outside_open_set() {
        let (payments, invoices) = parse(&ar_table(), &bank_table());
        // INV3 has a negative amount and is not open
        let mut selector = PlanSelector::new(vec![
            Assignment::new("Acme", PaymentType::AgainstInvoice, Some("INV3")),
            Assignment::new("Globex", PaymentType::Advance, None::<String>),
            Assignment::new("Acme", PaymentType::Advance, None::<String>),
        ]);
        let err = allocate(&payments, &invoices, &mut selector, FifoMode::Tag).unwrap_err();
        assert!(err.to_string().contains("INV3"));
    }

    #[test]
    fn test_metadata_comes_from_first_customer_row() {
        let (payments, invoices) = parse(&ar_table(), &bank_table());
        // INV2 is selected but the metadata comes from Acme's first row (INV1's row)
        let mut selector = PlanSelector::new(vec![
            Assignment::new("Acme", PaymentType::AgainstInvoice, Some("INV2")),
            Assignment::new("Globex", PaymentType::Advance, None::<String>),
            Assignment::new("Acme", PaymentType::Advance, None::<String>),
        ]);
        let outcome = allocate(&payments, &invoices, &mut selector, FifoMode::Tag).unwrap();
        let record = &outcome.records()[0];
        assert_eq!(record.invoice_no(), "INV2");
        assert_eq!(record.segment, "S1");
        assert_eq!(record.sub_segment, "SS1");
        assert_eq!(record.category, "C1");
    }

    #[test]
    fn test_fifo_tag_mode_records_no_invoice() {
        let (payments, invoices) = parse(&ar_table(), &bank_table());
        let mut selector = PlanSelector::new(vec![
            Assignment::new("Acme", PaymentType::Fifo, None::<String>),
            Assignment::new("Globex", PaymentType::Fifo, None::<String>),
            Assignment::new("Acme", PaymentType::Fifo, None::<String>),
        ]);
        let outcome = allocate(&payments, &invoices, &mut selector, FifoMode::Tag).unwrap();
        for record in outcome.records() {
            assert_eq!(record.payment_type(), PaymentType::Fifo);
            assert_eq!(record.invoice_no(), "");
        }
    }

    #[test]
    fn test_fifo_apply_mode_records_oldest_open_invoice() {
        let (payments, invoices) = parse(&ar_table(), &bank_table());
        let mut selector = PlanSelector::new(vec![
            Assignment::new("Acme", PaymentType::Fifo, None::<String>),
            Assignment::new("Globex", PaymentType::Fifo, None::<String>),
            Assignment::new("Acme", PaymentType::Fifo, None::<String>),
        ]);
        let outcome = allocate(&payments, &invoices, &mut selector, FifoMode::Apply).unwrap();
        // Acme's open invoices are INV1 (2024-01-10) and INV2 (2023-11-05); INV2 is older
        assert_eq!(outcome.records()[0].invoice_no(), "INV2");
        assert_eq!(outcome.records()[1].invoice_no(), "INV4");
    }

    #[test]
    fn test_short_plan_is_an_error() {
        let (payments, invoices) = parse(&ar_table(), &bank_table());
        let mut selector =
            PlanSelector::new(vec![Assignment::new("Acme", PaymentType::Advance, None::<String>)]);
        let err = allocate(&payments, &invoices, &mut selector, FifoMode::Tag).unwrap_err();
        assert!(format!("{err:#}").contains("no entry"));
    }
}

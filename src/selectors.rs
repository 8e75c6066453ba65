//! Strategies that supply allocation decisions to the engine.
//!
//! `PlanSelector` replays a prepared assignment file for headless runs; `PromptSelector` asks a
//! human at the terminal, mirroring the interactive flow of the system this tool replaces.

use crate::engine::{Selection, Selector};
use crate::model::{Invoice, Payment, PaymentType};
use crate::Result;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::io;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::str::FromStr;

/// One entry of an assignment plan, aligned with the bank statement by row order.
///
/// ```json
/// [
///   { "customer": "Acme", "payment_type": "Against Invoice", "invoice_no": "INV1" },
///   { "customer": "Globex", "payment_type": "Advance" }
/// ]
/// ```
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Assignment {
    customer: String,
    payment_type: PaymentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    invoice_no: Option<String>,
}

impl Assignment {
    pub fn new(
        customer: impl Into<String>,
        payment_type: PaymentType,
        invoice_no: Option<impl Into<String>>,
    ) -> Self {
        Self {
            customer: customer.into(),
            payment_type,
            invoice_no: invoice_no.map(|s| s.into()),
        }
    }
}

/// A headless selector that replays a JSON assignment plan.
#[derive(Debug, Clone, Default)]
pub struct PlanSelector {
    assignments: Vec<Assignment>,
}

impl PlanSelector {
    pub fn new(assignments: Vec<Assignment>) -> Self {
        Self { assignments }
    }

    /// Loads a plan from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read plan file {}", path.display()))?;
        let assignments: Vec<Assignment> = serde_json::from_str(&content)
            .with_context(|| format!("Unable to parse plan file {}", path.display()))?;
        Ok(Self { assignments })
    }

    fn entry(&self, index: usize) -> Result<&Assignment> {
        self.assignments
            .get(index)
            .with_context(|| format!("The plan has no entry for bank row {}", index + 1))
    }
}

impl Selector for PlanSelector {
    fn select(
        &mut self,
        index: usize,
        _payment: &Payment,
        _customers: &[String],
    ) -> Result<Selection> {
        let assignment = self.entry(index)?;
        Ok(Selection::new(
            assignment.customer.clone(),
            assignment.payment_type,
        ))
    }

    fn pick_invoice(
        &mut self,
        index: usize,
        _payment: &Payment,
        _open_invoices: &[&Invoice],
    ) -> Result<String> {
        let assignment = self.entry(index)?;
        match &assignment.invoice_no {
            Some(invoice_no) => Ok(invoice_no.clone()),
            None => bail!(
                "Plan entry {} selects 'Against Invoice' but names no invoice",
                index + 1
            ),
        }
    }
}

/// An interactive selector: prompts are written to the output stream and choices read from the
/// input stream, one menu at a time. Entries may be a list number or the exact option text.
pub struct PromptSelector {
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
}

impl PromptSelector {
    /// A selector wired to stdin and stderr. Prompts go to stderr so that stdout stays clean.
    pub fn stdio() -> Self {
        Self::new(
            Box::new(BufReader::new(io::stdin())),
            Box::new(io::stderr()),
        )
    }

    pub fn new(input: Box<dyn BufRead>, output: Box<dyn Write>) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let n = self.input.read_line(&mut line)?;
        if n == 0 {
            bail!("Input ended before all payments were assigned");
        }
        Ok(line.trim().to_string())
    }

    /// Prints a numbered menu and reads a choice, re-prompting until one is valid.
    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<String> {
        for (ix, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}. {option}", ix + 1)?;
        }
        loop {
            write!(self.output, "{prompt}: ")?;
            self.output.flush()?;
            let entry = self.read_line()?;
            if let Ok(n) = entry.parse::<usize>() {
                if n >= 1 && n <= options.len() {
                    return Ok(options[n - 1].clone());
                }
            }
            if let Some(option) = options.iter().find(|o| o.as_str() == entry) {
                return Ok(option.clone());
            }
            writeln!(self.output, "Invalid choice '{entry}'")?;
        }
    }
}

impl Selector for PromptSelector {
    fn select(
        &mut self,
        index: usize,
        payment: &Payment,
        customers: &[String],
    ) -> Result<Selection> {
        writeln!(
            self.output,
            "\n[{}] {} - {} - {}",
            index + 1,
            payment.date(),
            payment.payment_received(),
            payment.particular()
        )?;
        let customer = self.choose("Select customer", customers)?;
        let types: Vec<String> = [
            PaymentType::AgainstInvoice,
            PaymentType::Advance,
            PaymentType::Fifo,
        ]
        .iter()
        .map(|t| t.to_string())
        .collect();
        let payment_type = PaymentType::from_str(&self.choose("Select payment type", &types)?)?;
        Ok(Selection::new(customer, payment_type))
    }

    fn pick_invoice(
        &mut self,
        _index: usize,
        _payment: &Payment,
        open_invoices: &[&Invoice],
    ) -> Result<String> {
        let options: Vec<String> = open_invoices
            .iter()
            .map(|inv| inv.invoice_no().to_string())
            .collect();
        self.choose("Select invoice number", &options)
    }
}

//! Column names shared by the two input tables, and the normalization rule
//! that is applied to raw headers before anything else looks at them.

pub(crate) const INVOICE_NO: &str = "invoice_no";
pub(crate) const INVOICE_DATE: &str = "invoice_date";
pub(crate) const INVOICE_AMOUNT: &str = "invoice_amount";
pub(crate) const CUSTOMER: &str = "customer";
pub(crate) const SEGMENT: &str = "segment";
pub(crate) const SUB_SEGMENT: &str = "sub_segment";
pub(crate) const CATEGORY: &str = "category";

pub(crate) const DATE: &str = "date";
pub(crate) const PAYMENT_RECEIVED: &str = "payment_received";
pub(crate) const PARTICULAR: &str = "particular";

/// The columns that must be present in the AR file after normalization.
pub const REQUIRED_AR_COLUMNS: [&str; 7] = [
    INVOICE_NO,
    INVOICE_DATE,
    INVOICE_AMOUNT,
    CUSTOMER,
    SEGMENT,
    SUB_SEGMENT,
    CATEGORY,
];

/// The columns that must be present in the bank statement after normalization.
pub const REQUIRED_BANK_COLUMNS: [&str; 3] = [DATE, PAYMENT_RECEIVED, PARTICULAR];

/// Normalizes a raw header: trims surrounding whitespace, lowercases, and replaces interior
/// spaces with underscores. For example, `" Invoice No "` becomes `invoice_no`. The same rule is
/// applied to both input tables before schema validation. Idempotent.
pub fn normalize_header(s: impl AsRef<str>) -> String {
    s.as_ref().trim().to_lowercase().replace(' ', "_")
}

//! Types that represent the core data model, such as `Invoice` and `MappingRecord`.
mod amount;
mod invoice;
mod payment;
mod policy;
mod record;

pub use amount::{Amount, AmountFormat};
pub use invoice::{Invoice, Invoices};
pub use payment::{Payment, Payments};
pub use policy::{FifoMode, PaymentType};
pub(crate) use record::MAPPING_HEADERS;
pub use record::MappingRecord;

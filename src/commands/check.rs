use crate::args::CheckArgs;
use crate::commands::Out;
use crate::table::Table;
use crate::{validate, Result};

/// Validates that both input files carry their required columns after normalization. This is the
/// same precondition the `map` command enforces, exposed on its own so a run can be vetted
/// before anyone sits down to assign payments.
pub fn check(args: &CheckArgs) -> Result<Out<()>> {
    let ar = Table::from_csv_path(args.ar())?;
    let bank = Table::from_csv_path(args.bank())?;
    validate::validate_tables(&ar, &bank)?;
    Ok(format!(
        "Both files carry the required columns ({} AR row(s), {} bank row(s))",
        ar.len(),
        bank.len()
    )
    .into())
}

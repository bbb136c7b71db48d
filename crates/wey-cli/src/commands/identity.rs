//! Identity commands.

use super::Context;
use crate::cli::RegisterArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use wey_domain::{Identity, RelationshipStore};

/// Execute the register command.
pub fn execute_register(args: RegisterArgs, ctx: &Context, formatter: &Formatter) -> Result<()> {
    let name = args.name.trim();
    if name.is_empty() {
        return Err(CliError::InvalidInput("Name must not be empty".to_string()));
    }

    let identity = Identity::new(name);
    ctx.store.insert_identity(&identity)?;

    println!("{}", formatter.identity_registered(&identity)?);
    Ok(())
}

/// Execute the people command.
pub fn execute_people(ctx: &Context, formatter: &Formatter) -> Result<()> {
    let identities = ctx.store.list_identities()?;
    println!("{}", formatter.format_identities(&identities)?);
    Ok(())
}

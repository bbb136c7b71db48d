//! Interaction commands.

use super::Context;
use crate::cli::{InteractArgs, MessageArgs};
use crate::error::Result;
use crate::output::Formatter;
use wey_social::current_timestamp;

/// Execute the interact command.
pub fn execute_interact(args: InteractArgs, ctx: &Context, formatter: &Formatter) -> Result<()> {
    let connection =
        ctx.scorer
            .record_interaction(args.a, args.b, args.weight, current_timestamp())?;
    println!("{}", formatter.format_connection(&connection)?);
    Ok(())
}

/// Execute the message command.
pub fn execute_message(args: MessageArgs, ctx: &Context, formatter: &Formatter) -> Result<()> {
    let connection = ctx
        .scorer
        .record_message(args.sender, args.recipient, current_timestamp())?;
    println!("{}", formatter.format_connection(&connection)?);
    Ok(())
}

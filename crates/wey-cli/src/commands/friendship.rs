//! Friendship commands.

use super::Context;
use crate::cli::{FriendsArgs, RemoveArgs, RequestArgs, RespondArgs};
use crate::error::Result;
use crate::output::Formatter;

/// Execute the request command.
pub fn execute_request(args: RequestArgs, ctx: &Context, formatter: &Formatter) -> Result<()> {
    let outcome = ctx.workflow.send_request(args.from, args.to)?;
    println!("{}", formatter.request_sent(&outcome)?);
    Ok(())
}

/// Execute the respond command.
pub fn execute_respond(args: RespondArgs, ctx: &Context, formatter: &Formatter) -> Result<()> {
    let request =
        ctx.workflow
            .respond_to_request(args.responder, args.requester, args.decision.into())?;
    println!("{}", formatter.request_resolved(&request)?);
    Ok(())
}

/// Execute the remove command.
pub fn execute_remove(args: RemoveArgs, ctx: &Context, formatter: &Formatter) -> Result<()> {
    ctx.workflow.remove_friend(args.initiator, args.other)?;
    println!(
        "{}",
        formatter.success(&format!("{} is no longer a friend", args.other))
    );
    Ok(())
}

/// Execute the friends command.
pub fn execute_friends(args: FriendsArgs, ctx: &Context, formatter: &Formatter) -> Result<()> {
    let viewer = args.viewer.unwrap_or(args.subject);
    let view = ctx.workflow.friends_view(viewer, args.subject)?;
    println!("{}", formatter.format_friends(&view)?);
    Ok(())
}

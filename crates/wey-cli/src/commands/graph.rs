//! Graph command implementation.

use super::Context;
use crate::cli::GraphArgs;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the graph command.
pub fn execute_graph(args: GraphArgs, ctx: &Context, formatter: &Formatter) -> Result<()> {
    let graph = ctx.graphs.build(args.origin)?;
    println!("{}", formatter.format_graph(&graph)?);
    Ok(())
}

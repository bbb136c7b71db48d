//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use wey_domain::{Decision, IdentityId};

/// Wey CLI - Manage friendships and connections in the Wey social graph.
#[derive(Debug, Parser)]
#[command(name = "wey")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "WEY_CONFIG")]
    pub config: Option<String>,

    /// Database path (overrides the configuration file)
    #[arg(long, global = true, env = "WEY_DB")]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a new identity
    Register(RegisterArgs),

    /// List every registered identity
    People,

    /// Send a friendship request
    Request(RequestArgs),

    /// Accept or reject a pending friendship request
    Respond(RespondArgs),

    /// Remove a friend
    Remove(RemoveArgs),

    /// Record an interaction of arbitrary weight between two identities
    Interact(InteractArgs),

    /// Record a message, weighted by configuration
    Message(MessageArgs),

    /// Show the two-hop connections graph of an identity
    Graph(GraphArgs),

    /// List friends, plus pending requests when viewing oneself
    Friends(FriendsArgs),
}

/// Arguments for the register command.
#[derive(Debug, Parser)]
pub struct RegisterArgs {
    /// Display name
    pub name: String,
}

/// Arguments for the request command.
#[derive(Debug, Parser)]
pub struct RequestArgs {
    /// Identity sending the request
    pub from: IdentityId,

    /// Identity receiving the request
    pub to: IdentityId,
}

/// Arguments for the respond command.
#[derive(Debug, Parser)]
pub struct RespondArgs {
    /// Identity the request was addressed to
    pub responder: IdentityId,

    /// Identity that sent the request
    pub requester: IdentityId,

    /// Decision
    #[arg(value_enum)]
    pub decision: DecisionArg,
}

/// Arguments for the remove command.
#[derive(Debug, Parser)]
pub struct RemoveArgs {
    /// Identity removing the friend
    pub initiator: IdentityId,

    /// Friend being removed
    pub other: IdentityId,
}

/// Arguments for the interact command.
#[derive(Debug, Parser)]
pub struct InteractArgs {
    /// First participant
    pub a: IdentityId,

    /// Second participant
    pub b: IdentityId,

    /// Interaction weight
    #[arg(short, long, default_value = "2.0")]
    pub weight: f64,
}

/// Arguments for the message command.
#[derive(Debug, Parser)]
pub struct MessageArgs {
    /// Sender
    pub sender: IdentityId,

    /// Recipient
    pub recipient: IdentityId,
}

/// Arguments for the graph command.
#[derive(Debug, Parser)]
pub struct GraphArgs {
    /// Identity at the centre of the graph
    pub origin: IdentityId,
}

/// Arguments for the friends command.
#[derive(Debug, Parser)]
pub struct FriendsArgs {
    /// Identity whose friends are listed
    pub subject: IdentityId,

    /// Identity viewing the list (defaults to the subject)
    #[arg(short, long)]
    pub viewer: Option<IdentityId>,
}

/// Decision argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum DecisionArg {
    /// Accept the request
    Accept,
    /// Reject the request
    Reject,
}

impl From<DecisionArg> for Decision {
    fn from(decision: DecisionArg) -> Self {
        match decision {
            DecisionArg::Accept => Decision::Accept,
            DecisionArg::Reject => Decision::Reject,
        }
    }
}

impl From<CliFormat> for crate::output::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::output::OutputFormat::Table,
            CliFormat::Json => crate::output::OutputFormat::Json,
        }
    }
}

//! Output formatting for the CLI.

use crate::error::Result;
use colored::*;
use wey_domain::{Connection, FriendshipRequest, Identity};
use wey_social::{ConnectionsGraph, FriendsView, SendOutcome};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a list of identities.
    pub fn format_identities(&self, identities: &[Identity]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> =
                    identities.iter().map(identity_json).collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            OutputFormat::Table => {
                if identities.is_empty() {
                    return Ok(self.colorize("No identities found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Name", "Friends"]);
                for identity in identities {
                    builder.push_record([
                        identity.id.to_string(),
                        identity.name.clone(),
                        identity.friends_count.to_string(),
                    ]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format a newly registered identity.
    pub fn identity_registered(&self, identity: &Identity) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&identity_json(identity))?),
            OutputFormat::Table => Ok(self.success(&format!(
                "Registered {} as {}",
                identity.name, identity.id
            ))),
        }
    }

    /// Format the outcome of a friendship request.
    pub fn request_sent(&self, outcome: &SendOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let mut value = request_json(outcome.request());
                value["created"] = serde_json::Value::Bool(outcome.is_created());
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => {
                let request = outcome.request();
                if outcome.is_created() {
                    Ok(self.success(&format!("Friendship request sent: {}", request.id)))
                } else {
                    Ok(self.warning(&format!(
                        "A request is already pending between {} and {} ({})",
                        request.created_by, request.created_for, request.id
                    )))
                }
            }
        }
    }

    /// Format a resolved request.
    pub fn request_resolved(&self, request: &FriendshipRequest) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&request_json(request))?),
            OutputFormat::Table => Ok(self.success(&format!(
                "Request from {} {}",
                request.created_by,
                request.status.as_str()
            ))),
        }
    }

    /// Format a list of requests.
    pub fn format_requests(&self, requests: &[FriendshipRequest]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = requests.iter().map(request_json).collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            OutputFormat::Table => {
                if requests.is_empty() {
                    return Ok(self.colorize("No pending requests.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "From", "To", "Status", "Created"]);
                for request in requests {
                    builder.push_record([
                        request.id.to_string(),
                        request.created_by.to_string(),
                        request.created_for.to_string(),
                        request.status.as_str().to_string(),
                        request.created_at.to_string(),
                    ]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format a connection after an interaction.
    pub fn format_connection(&self, connection: &Connection) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "id": connection.id.to_string(),
                    "low_id": connection.pair.low().to_string(),
                    "high_id": connection.pair.high().to_string(),
                    "score": connection.score,
                    "is_connected": connection.is_connected(),
                    "last_interaction": connection.last_interaction,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => {
                let status = if connection.is_connected() {
                    self.colorize("connected", "green")
                } else {
                    self.colorize("not connected", "yellow")
                };
                Ok(format!(
                    "Connection {} score {:.2} ({})",
                    connection.id, connection.score, status
                ))
            }
        }
    }

    /// Format a connections graph.
    pub fn format_graph(&self, graph: &ConnectionsGraph) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(graph.to_json()?),
            OutputFormat::Table => {
                if graph.is_empty() {
                    return Ok(self.colorize("No connections found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Source", "Target", "Weight"]);
                for edge in &graph.edges {
                    builder.push_record([
                        edge.source.to_string(),
                        edge.target.to_string(),
                        format!("{:.2}", edge.weight),
                    ]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format a friends listing.
    pub fn format_friends(&self, view: &FriendsView) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "identity": identity_json(&view.identity),
                    "friends": view.friends.iter().map(identity_json).collect::<Vec<_>>(),
                    "incoming": view.incoming.iter().map(request_json).collect::<Vec<_>>(),
                    "outgoing": view.outgoing.iter().map(request_json).collect::<Vec<_>>(),
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => {
                let mut sections = vec![
                    self.info(&format!(
                        "{} has {} friend(s)",
                        view.identity.name, view.identity.friends_count
                    )),
                    self.format_identities(&view.friends)?,
                ];
                if !view.incoming.is_empty() {
                    sections.push(self.info("Incoming requests"));
                    sections.push(self.format_requests(&view.incoming)?);
                }
                if !view.outgoing.is_empty() {
                    sections.push(self.info("Outgoing requests"));
                    sections.push(self.format_requests(&view.outgoing)?);
                }
                Ok(sections.join("\n"))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn render(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn identity_json(identity: &Identity) -> serde_json::Value {
    serde_json::json!({
        "id": identity.id.to_string(),
        "name": identity.name,
        "friends_count": identity.friends_count,
    })
}

fn request_json(request: &FriendshipRequest) -> serde_json::Value {
    serde_json::json!({
        "id": request.id.to_string(),
        "created_by": request.created_by.to_string(),
        "created_for": request.created_for.to_string(),
        "status": request.status.as_str(),
        "created_at": request.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wey_domain::IdentityId;

    fn request() -> FriendshipRequest {
        FriendshipRequest::new(IdentityId::new(), IdentityId::new(), 1_700_000_000)
    }

    #[test]
    fn test_identities_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter
            .format_identities(&[Identity::new("Alice")])
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["name"], "Alice");
        assert_eq!(value[0]["friends_count"], 0);
    }

    #[test]
    fn test_identities_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_identities(&[Identity::new("Alice")])
            .unwrap();
        assert!(output.contains("Name"));
        assert!(output.contains("Alice"));
    }

    #[test]
    fn test_empty_tables() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert!(formatter
            .format_identities(&[])
            .unwrap()
            .contains("No identities found"));
        assert!(formatter
            .format_requests(&[])
            .unwrap()
            .contains("No pending requests"));
    }

    #[test]
    fn test_duplicate_request_is_warning() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .request_sent(&SendOutcome::Duplicate(request()))
            .unwrap();
        assert!(output.starts_with("⚠"));
        assert!(output.contains("already pending"));
    }

    #[test]
    fn test_request_json_marks_creation() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter
            .request_sent(&SendOutcome::Created(request()))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["created"], true);
        assert_eq!(value["status"], "sent");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.error("test"), "✗ test");
    }

    #[test]
    fn test_command_failure_message() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let err = crate::error::CliError::from(wey_social::SocialError::NotFriends);
        let output = formatter.error(&err.to_string());
        assert!(output.starts_with("✗ "));
        assert!(output.contains(&wey_social::SocialError::NotFriends.to_string()));
    }
}

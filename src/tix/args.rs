use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tix")]
#[command(about = "File-based ticket tracking for the command line", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the tix environment in the current directory
    Init,

    /// Add a ticket to the database
    #[command(alias = "a")]
    Add {
        /// Name of the ticket
        name: String,
    },

    /// List tickets, filtered by status and ordered by +/-field
    #[command(alias = "ls")]
    List {
        /// Status values filter; "+field"/"-field" sorts (e.g. opened -created)
        #[arg(num_args = 0.., allow_hyphen_values = true)]
        tokens: Vec<String>,
    },

    /// Show a ticket with its comments and attachments
    Show {
        /// Ticket id, or a unique prefix of one
        id: String,
    },

    /// Add a comment to a ticket
    Comment {
        /// Ticket id, or a prefix (every match gets the comment)
        id: String,

        /// The comment text
        text: String,
    },

    /// Attach files to a ticket
    Attach {
        /// Ticket id, or a prefix
        id: String,

        /// Files to attach; a non-file token sets the caption for the files after it
        #[arg(required = true, num_args = 1..)]
        args: Vec<String>,
    },

    /// Set the status of a ticket
    Status {
        /// Ticket id, or a prefix (every match is updated)
        id: String,

        /// New status (one of the configured values)
        status: String,
    },
}

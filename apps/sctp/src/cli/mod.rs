//! # SCTP CLI Module
//!
//! This module implements the command-line interface over `sctp-client`.
//!
//! ## Available Commands
//!
//! - `check` - Check whether an element exists
//! - `type` - Show an element's type
//! - `erase` - Erase an element
//! - `create-node` / `create-link` / `create-arc` - Create elements
//! - `arc` - Show an arc's endpoints
//! - `content` / `set-content` - Read or replace link content
//! - `find-links` - Find links by content
//! - `iterate` - Match a 3- or 5-slot pattern
//! - `resolve` / `set-idtf` - System identifiers
//! - `stats` - Store statistics
//! - `subscribe` - Create an event subscription
//! - `initiate` - Initiate a question for store-side agents

mod commands;

use crate::config::{self, Overrides};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use sctp_client::{ClientError, EventType, Pattern, ScAddr, ScType, SctpClient, Slot, Transport};
use std::ffi::OsString;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// SCTP - semantic-graph store client
///
/// Runs one operation against the store and prints the result.
#[derive(Parser, Debug)]
#[command(name = "sctp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Store host
    #[arg(short = 'H', long, global = true)]
    pub host: Option<String>,

    /// Store port
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Connect timeout in milliseconds
    #[arg(long, global = true)]
    pub connect_timeout_ms: Option<u64>,

    /// Read timeout in milliseconds
    #[arg(long, global = true)]
    pub read_timeout_ms: Option<u64>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Parse the process arguments. Usage errors exit with clap's status.
    pub fn parse_checked() -> Self {
        Self::try_parse_checked(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Parse `args`, rejecting iterate layouts no pattern shape accepts
    /// before any connection is opened.
    pub fn try_parse_checked<I, A>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString> + Clone,
    {
        let cli = Self::try_parse_from(args)?;
        let layout = match &cli.command {
            Commands::Iterate { slots } => Pattern::from_slots(slots).map(|_| ()),
            _ => Ok(()),
        };
        layout.map_err(|e| Self::command().error(ErrorKind::ValueValidation, e))?;
        Ok(cli)
    }

    /// The connection settings given as flags.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            connect_timeout_ms: self.connect_timeout_ms,
            read_timeout_ms: self.read_timeout_ms,
        }
    }
}

/// Available CLI commands.
///
/// Addresses accept the packed integer or `segment_offset`. Types accept
/// names joined by `|` (`node|const`) or a numeric mask.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether an element exists
    Check { addr: ScAddr },

    /// Show the type of an element
    Type { addr: ScAddr },

    /// Erase an element
    Erase { addr: ScAddr },

    /// Create a node
    CreateNode {
        /// Node type
        #[arg(short = 't', long = "type", default_value = "node|const")]
        ty: ScType,
    },

    /// Create a link, optionally with content
    CreateLink {
        /// Initial content
        #[arg(long)]
        content: Option<String>,
    },

    /// Create an arc between two elements
    CreateArc {
        begin: ScAddr,
        end: ScAddr,

        /// Arc type
        #[arg(short = 't', long = "type", default_value = "arc_pos_const_perm")]
        ty: ScType,
    },

    /// Show the endpoints of an arc
    Arc { addr: ScAddr },

    /// Print the content of a link
    Content { addr: ScAddr },

    /// Replace the content of a link
    SetContent { addr: ScAddr, content: String },

    /// Find links whose content equals the given text
    FindLinks { content: String },

    /// Match a pattern: 3 or 5 slots, each an address or `_`.
    /// Layouts with no matching shape are rejected as usage errors.
    Iterate {
        #[arg(num_args = 3..=5, required = true)]
        slots: Vec<Slot>,
    },

    /// Find the element with a system identifier
    Resolve { idtf: String },

    /// Give an element a system identifier
    SetIdtf { addr: ScAddr, idtf: String },

    /// Show store statistics for a time range (Unix milliseconds)
    Stats {
        /// Range start
        #[arg(long, default_value_t = 0)]
        begin: u64,

        /// Range end
        #[arg(long, default_value_t = u64::MAX)]
        end: u64,
    },

    /// Subscribe to events on an element. Released when the command exits.
    Subscribe {
        /// add_output_arc, add_input_arc, remove_output_arc, remove_input_arc, remove_element
        #[arg(short = 'e', long = "event")]
        event_type: EventType,

        addr: ScAddr,
    },

    /// Initiate a question node for store-side agents
    Initiate {
        /// System identifier of the question class
        class: String,

        /// System identifier of the question node
        question: String,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), ClientError> {
    let env = Overrides::from_env(|key| std::env::var(key).ok())?;
    let config = config::resolve(cli.config.as_deref(), env, cli.overrides())?;

    let mut client = SctpClient::connect(&config)?;
    let outcome = run(&mut client, cli.command, cli.json_mode);
    let closed = client.shutdown();
    outcome.and(closed)
}

/// Dispatch one command on an open client.
pub fn run<T: Transport>(
    client: &mut SctpClient<T>,
    command: Commands,
    json_mode: bool,
) -> Result<(), ClientError> {
    match command {
        Commands::Check { addr } => cmd_check(client, json_mode, addr),
        Commands::Type { addr } => cmd_type(client, json_mode, addr),
        Commands::Erase { addr } => cmd_erase(client, json_mode, addr),
        Commands::CreateNode { ty } => cmd_create_node(client, json_mode, ty),
        Commands::CreateLink { content } => cmd_create_link(client, json_mode, content.as_deref()),
        Commands::CreateArc { begin, end, ty } => cmd_create_arc(client, json_mode, ty, begin, end),
        Commands::Arc { addr } => cmd_arc(client, json_mode, addr),
        Commands::Content { addr } => cmd_content(client, json_mode, addr),
        Commands::SetContent { addr, content } => {
            cmd_set_content(client, json_mode, addr, &content)
        }
        Commands::FindLinks { content } => cmd_find_links(client, json_mode, &content),
        Commands::Iterate { slots } => cmd_iterate(client, json_mode, &slots),
        Commands::Resolve { idtf } => cmd_resolve(client, json_mode, &idtf),
        Commands::SetIdtf { addr, idtf } => cmd_set_idtf(client, json_mode, addr, &idtf),
        Commands::Stats { begin, end } => cmd_stats(client, json_mode, begin, end),
        Commands::Subscribe { event_type, addr } => {
            cmd_subscribe(client, json_mode, event_type, addr)
        }
        Commands::Initiate { class, question } => {
            cmd_initiate(client, json_mode, &class, &question)
        }
    }
}

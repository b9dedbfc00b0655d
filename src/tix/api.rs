//! # API facade
//!
//! [`TixApi`] is the single entry point for all ticket operations. It
//! dispatches to the command layer and returns structured
//! [`CmdResult`](crate::commands::CmdResult) values; it never prints and
//! never exits. Any front end (the bundled CLI, or something else) renders
//! the results itself.

use crate::cache::TicketIndex;
use crate::commands::{self, CmdResult};
use crate::config::TixConfig;
use crate::error::Result;

pub struct TixApi {
    index: TicketIndex,
    config: TixConfig,
}

impl TixApi {
    pub fn new(index: TicketIndex, config: TixConfig) -> Self {
        Self { index, config }
    }

    pub fn config(&self) -> &TixConfig {
        &self.config
    }

    pub fn is_ready(&self) -> bool {
        self.index.is_ready()
    }

    pub fn add_ticket(&mut self, name: &str) -> Result<CmdResult> {
        commands::add::run(&mut self.index, &self.config, name)
    }

    pub fn list_tickets(&self, tokens: &[String]) -> Result<CmdResult> {
        commands::list::run(&self.index, &self.config, tokens)
    }

    pub fn show_ticket(&self, partial_id: &str) -> Result<CmdResult> {
        commands::show::run(&self.index, partial_id)
    }

    pub fn add_comment(&mut self, partial_id: &str, text: &str) -> Result<CmdResult> {
        commands::comment::run(&mut self.index, partial_id, text)
    }

    pub fn attach_files(&mut self, partial_id: &str, args: &[String]) -> Result<CmdResult> {
        commands::attach::run(&mut self.index, partial_id, args)
    }

    pub fn set_status(&mut self, partial_id: &str, status: &str) -> Result<CmdResult> {
        commands::status::run(&mut self.index, &self.config, partial_id, status)
    }
}

pub use crate::commands::{CmdMessage, MessageLevel};

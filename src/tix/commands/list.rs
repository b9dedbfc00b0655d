use crate::cache::TicketIndex;
use crate::commands::{CmdMessage, CmdResult};
use crate::config::TixConfig;
use crate::error::Result;
use crate::query::Query;

pub fn run(index: &TicketIndex, config: &TixConfig, tokens: &[String]) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if !index.is_ready() {
        result.add_message(CmdMessage::warning(
            "Tix environment not initialized. Run \"tix init\" first.",
        ));
        return Ok(result);
    }

    let query = Query::parse(tokens, &config.statuses);
    let listed = index.enumerate(&query);
    if listed.is_empty() {
        result.add_message(CmdMessage::info("No tickets in the database."));
    }
    Ok(result.with_listed(listed))
}

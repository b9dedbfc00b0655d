use crate::cache::TicketIndex;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, TixError};
use crate::model::current_user;

/// Appends a comment to every ticket matching `partial_id` (batch by
/// prefix) and saves each one.
pub fn run(index: &mut TicketIndex, partial_id: &str, text: &str) -> Result<CmdResult> {
    if !index.is_ready() {
        return Err(TixError::NotInitialized);
    }
    let store = index.store().clone();
    let user = current_user();
    let mut result = CmdResult::default();
    let mut affected = Vec::new();

    for mut ticket in index.resolve_for_update(partial_id)? {
        store.load_comments(&mut ticket)?;
        ticket.add_comment(text, &user);
        store.save(&mut ticket)?;
        index.refresh(&ticket)?;
        result.add_message(CmdMessage::success(format!(
            "Ticket {} saved.",
            ticket.short_id()
        )));
        affected.push(ticket);
    }
    if affected.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "No ticket matches id \"{}\".",
            partial_id
        )));
    }
    Ok(result.with_affected(affected))
}

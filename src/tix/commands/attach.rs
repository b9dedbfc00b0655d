use crate::cache::TicketIndex;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, TixError};
use crate::model::current_user;
use std::path::Path;

/// Attaches files to every ticket matching `partial_id`.
///
/// `args` is an alternating token stream: a token naming an existing file
/// attaches that file under the current caption, any other token becomes
/// the caption for the files that follow.
pub fn run(index: &mut TicketIndex, partial_id: &str, args: &[String]) -> Result<CmdResult> {
    if !index.is_ready() {
        return Err(TixError::NotInitialized);
    }
    let store = index.store().clone();
    let user = current_user();
    let mut result = CmdResult::default();
    let mut affected = Vec::new();

    for mut ticket in index.resolve_for_update(partial_id)? {
        let mut caption = String::new();
        let mut attached = 0;
        for arg in args {
            let path = Path::new(arg);
            if path.is_file() {
                let attachment = store.attach(&mut ticket, &caption, path, &user)?;
                result.add_message(CmdMessage::info(format!(
                    "Attached {} ({}) to ticket {}.",
                    attachment.original_name,
                    attachment.file_id,
                    ticket.short_id()
                )));
                attached += 1;
            } else {
                caption = arg.clone();
            }
        }
        if attached == 0 {
            result.add_message(CmdMessage::warning("No existing file among the arguments."));
        }
        store.save(&mut ticket)?;
        index.refresh(&ticket)?;
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

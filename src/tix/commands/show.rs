use crate::cache::TicketIndex;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;

pub fn run(index: &TicketIndex, partial_id: &str) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if !index.is_ready() {
        result.add_message(CmdMessage::warning(
            "Tix environment not initialized. Run \"tix init\" first.",
        ));
        return Ok(result);
    }

    let mut listed = Vec::new();
    for ticket in index.resolve(partial_id) {
        let mut ticket = ticket.clone();
        index.store().load_comments(&mut ticket)?;
        index.store().load_attachments(&mut ticket)?;
        listed.push(ticket);
    }
    if listed.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "No ticket matches id \"{}\".",
            partial_id
        )));
    }
    Ok(result.with_listed(listed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{add, comment};
    use crate::config::TixConfig;
    use crate::store::TicketStore;
    use tempfile::TempDir;

    #[test]
    fn show_loads_side_documents() {
        let temp = TempDir::new().unwrap();
        let config = TixConfig::default();
        let store = TicketStore::new(temp.path().join(".tickets"), String::new());
        let mut index = TicketIndex::open(store, temp.path().join(".ticket_cache")).unwrap();

        let added = add::run(&mut index, &config, "Detailed").unwrap();
        let id = added.affected[0].short_id().to_string();
        comment::run(&mut index, &id, "first comment").unwrap();

        let result = run(&index, &id).unwrap();
        assert_eq!(result.listed.len(), 1);
        assert_eq!(result.listed[0].comments().len(), 1);
        assert_eq!(result.listed[0].comments()[0].comment, "first comment");
    }

    #[test]
    fn unknown_id_yields_warning_not_error() {
        let temp = TempDir::new().unwrap();
        let store = TicketStore::new(temp.path().join(".tickets"), String::new());
        let index = TicketIndex::open(store, temp.path().join(".ticket_cache")).unwrap();

        let result = run(&index, "deadbeef").unwrap();
        assert!(result.listed.is_empty());
        assert_eq!(result.messages.len(), 1);
    }
}

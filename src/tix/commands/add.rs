use crate::cache::TicketIndex;
use crate::commands::{CmdMessage, CmdResult};
use crate::config::TixConfig;
use crate::error::{Result, TixError};
use crate::model::{current_user, Ticket};

pub fn run(index: &mut TicketIndex, config: &TixConfig, name: &str) -> Result<CmdResult> {
    if !index.is_ready() {
        return Err(TixError::NotInitialized);
    }
    let mut ticket = Ticket::new(
        name,
        config.default_status(),
        config.default_severity(),
        &current_user(),
    );
    index.store().save(&mut ticket)?;
    index.refresh(&ticket)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Ticket {} saved.",
        ticket.short_id()
    )));
    Ok(result.with_affected(vec![ticket]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TicketStore;
    use tempfile::TempDir;

    #[test]
    fn add_creates_and_indexes_a_ticket() {
        let temp = TempDir::new().unwrap();
        let config = TixConfig::default();
        let store = TicketStore::new(temp.path().join(".tickets"), String::new());
        let mut index = TicketIndex::open(store, temp.path().join(".ticket_cache")).unwrap();

        let result = run(&mut index, &config, "New issue").unwrap();
        assert_eq!(result.affected.len(), 1);
        let ticket = &result.affected[0];
        assert_eq!(ticket.data.status, "opened");
        assert_eq!(ticket.data.severity, "normal");
        assert_eq!(index.resolve(ticket.short_id()).len(), 1);
    }

    #[test]
    fn add_fails_when_not_initialized() {
        let temp = TempDir::new().unwrap();
        let config = TixConfig::default();
        let store = TicketStore::new(temp.path().join(".tickets"), String::new());
        let mut index = TicketIndex::uninitialized(store, temp.path().join(".ticket_cache"));

        let err = run(&mut index, &config, "Nope").unwrap_err();
        assert!(matches!(err, TixError::NotInitialized));
    }
}

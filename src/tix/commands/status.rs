use crate::cache::TicketIndex;
use crate::commands::{CmdMessage, CmdResult};
use crate::config::TixConfig;
use crate::error::{Result, TixError};

/// Sets the status on every ticket matching `partial_id`. Values outside
/// the configured enumeration are rejected before anything is touched.
pub fn run(
    index: &mut TicketIndex,
    config: &TixConfig,
    partial_id: &str,
    status: &str,
) -> Result<CmdResult> {
    if !index.is_ready() {
        return Err(TixError::NotInitialized);
    }
    if !config.statuses.iter().any(|s| s == status) {
        return Err(TixError::InvalidStatus(status.to_string()));
    }

    let store = index.store().clone();
    let mut result = CmdResult::default();
    let mut affected = Vec::new();

    for mut ticket in index.resolve_for_update(partial_id)? {
        ticket.set_status(status, &config.statuses)?;
        store.save(&mut ticket)?;
        index.refresh(&ticket)?;
        result.add_message(CmdMessage::success(format!(
            "Ticket {} set to {}.",
            ticket.short_id(),
            status
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add;
    use crate::store::TicketStore;
    use tempfile::TempDir;

    fn setup(temp: &TempDir) -> (TixConfig, TicketIndex, String) {
        let config = TixConfig::default();
        let store = TicketStore::new(temp.path().join(".tickets"), String::new());
        let mut index = TicketIndex::open(store, temp.path().join(".ticket_cache")).unwrap();
        let added = add::run(&mut index, &config, "Target").unwrap();
        let id = added.affected[0].short_id().to_string();
        (config, index, id)
    }

    #[test]
    fn sets_status_and_persists() {
        let temp = TempDir::new().unwrap();
        let (config, mut index, id) = setup(&temp);

        run(&mut index, &config, &id, "closed").unwrap();

        let cached = index.resolve(&id)[0];
        assert_eq!(cached.data.status, "closed");
        let reloaded = index.store().load(cached.dir().unwrap()).unwrap();
        assert_eq!(reloaded.data.status, "closed");
    }

    #[test]
    fn invalid_status_is_rejected_without_saving() {
        let temp = TempDir::new().unwrap();
        let (config, mut index, id) = setup(&temp);

        let err = run(&mut index, &config, &id, "bogus").unwrap_err();
        assert!(matches!(err, TixError::InvalidStatus(_)));

        let cached = index.resolve(&id)[0];
        assert_eq!(cached.data.status, "opened");
        let reloaded = index.store().load(cached.dir().unwrap()).unwrap();
        assert_eq!(reloaded.data.status, "opened");
    }

    #[test]
    fn prefix_updates_every_match() {
        let temp = TempDir::new().unwrap();
        let (config, mut index, _) = setup(&temp);
        add::run(&mut index, &config, "Another").unwrap();

        let result = run(&mut index, &config, "", "testing").unwrap();
        assert_eq!(result.affected.len(), 2);
        assert!(result
            .affected
            .iter()
            .all(|t| t.data.status == "testing"));
    }
}

use crate::api::TixApi;
use crate::cache::TicketIndex;
use crate::config::{TixConfig, CONFIG_FILENAME};
use crate::error::Result;
use crate::store::TicketStore;
use std::path::{Path, PathBuf};

pub struct TixContext {
    pub api: TixApi,
    /// The discovered project root, if any. `None` means the environment is
    /// not initialized and queries will come back empty.
    pub root: Option<PathBuf>,
}

/// Find the project root by walking up from cwd looking for a `.tix.json`.
/// Stops at the home directory or the filesystem root.
pub fn find_project_root(cwd: &Path) -> Option<PathBuf> {
    let home_dir = std::env::var_os("HOME").map(PathBuf::from);
    let mut current = cwd.to_path_buf();

    loop {
        if current.join(CONFIG_FILENAME).is_file() {
            return Some(current);
        }

        if let Some(ref home) = home_dir {
            if &current == home {
                return None;
            }
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => return None,
        }
    }
}

/// Builds the application context for `cwd`: discovers the project root,
/// loads its config, and opens the ticket index against it. Without a
/// discovered root the context comes up not-ready.
pub fn initialize(cwd: &Path) -> Result<TixContext> {
    match find_project_root(cwd) {
        Some(root) => {
            let config = TixConfig::load(&root)?;
            let store = TicketStore::new(root.join(&config.tickets_dir), config.after_add.clone());
            let index = TicketIndex::open(store, root.join(&config.cache_dir))?;
            Ok(TixContext {
                api: TixApi::new(index, config),
                root: Some(root),
            })
        }
        None => {
            let config = TixConfig::default();
            let store = TicketStore::new(cwd.join(&config.tickets_dir), String::new());
            let index = TicketIndex::uninitialized(store, cwd.join(&config.cache_dir));
            Ok(TixContext {
                api: TixApi::new(index, config),
                root: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn finds_config_in_cwd() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILENAME), "{}").unwrap();

        let result = find_project_root(temp.path());
        assert_eq!(result, Some(temp.path().to_path_buf()));
    }

    #[test]
    fn walks_up_to_parent_with_config() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("src").join("deep");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join(CONFIG_FILENAME), "{}").unwrap();

        let result = find_project_root(&nested);
        assert_eq!(result, Some(temp.path().to_path_buf()));
    }

    #[test]
    fn no_config_anywhere_returns_none() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested), None);
    }

    #[test]
    fn initialize_without_root_is_not_ready() {
        let temp = TempDir::new().unwrap();
        let ctx = initialize(temp.path()).unwrap();
        assert!(ctx.root.is_none());
        assert!(!ctx.api.is_ready());

        let result = ctx.api.list_tickets(&[]).unwrap();
        assert!(result.listed.is_empty());
    }

    #[test]
    fn initialize_with_root_opens_the_index() {
        let temp = TempDir::new().unwrap();
        TixConfig::default().save(temp.path()).unwrap();

        let mut ctx = initialize(temp.path()).unwrap();
        assert!(ctx.api.is_ready());
        ctx.api.add_ticket("From context").unwrap();

        let result = ctx.api.list_tickets(&[]).unwrap();
        assert_eq!(result.listed.len(), 1);
        assert!(temp.path().join(".tickets").is_dir());
        assert!(temp.path().join(".ticket_cache").is_dir());
    }
}

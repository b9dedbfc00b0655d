//! # Ticket storage
//!
//! Translates a [`Ticket`] to and from its on-disk directory:
//!
//! ```text
//! <root>/<hash8>-<sanitized-name>.record/
//! ├── record.doc          # core fields (JSON)
//! ├── comments.doc        # comment list, absent until the first comment
//! ├── attachments.doc     # attachment list, absent until the first attachment
//! └── attachments/<file_id>/<original-filename>
//! ```
//!
//! Every save rewrites the documents in full; side documents that were never
//! loaded are read back first so a full rewrite cannot drop them. Documents
//! are written to a temp file and renamed into place so a failed write never
//! leaves a truncated `record.doc` behind.

use crate::error::{Result, TixError};
use crate::model::{short_hash, short_id_of, Attachment, Comment, Ticket, TicketData};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const RECORD_DOC: &str = "record.doc";
pub const COMMENTS_DOC: &str = "comments.doc";
pub const ATTACHMENTS_DOC: &str = "attachments.doc";
pub const ATTACHMENTS_DIR: &str = "attachments";
pub const RECORD_SUFFIX: &str = ".record";

/// Serialize `value` as pretty JSON, writing to a temp file in the target's
/// directory and renaming into place.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Directory basename for a new ticket: a content hash plus a sanitized
/// copy of the name, so listings stay human-readable.
fn record_dir_name(data: &TicketData) -> String {
    let hash = short_hash(&format!("{}-{}", data.created, data.name));
    let sanitized = data.name.replace(['/', '\\', ' ', ':', '?'], "_");
    format!("{}-{}{}", hash, sanitized, RECORD_SUFFIX)
}

#[derive(Debug, Clone)]
pub struct TicketStore {
    root: PathBuf,
    after_add: String,
}

impl TicketStore {
    pub fn new(root: PathBuf, after_add: String) -> Self {
        Self { root, after_add }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads a ticket from its directory. Comments and attachments are not
    /// read here; they load lazily on first access.
    pub fn load(&self, dir: &Path) -> Result<Ticket> {
        let record = dir.join(RECORD_DOC);
        if !record.is_file() {
            return Err(TixError::Store(format!(
                "no {} in {}",
                RECORD_DOC,
                dir.display()
            )));
        }
        let mut data: TicketData = read_json(&record)?;
        if data.id.is_empty() {
            // Documents written before the id field existed derive it from
            // the directory basename.
            let name = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            data.id = short_id_of(&name);
        }
        let mut ticket = Ticket::from_data(data);
        ticket.dir = Some(dir.to_path_buf());
        Ok(ticket)
    }

    /// Loads the comment list from `comments.doc` if it has not been loaded
    /// yet. A missing side document means zero comments.
    pub fn load_comments(&self, ticket: &mut Ticket) -> Result<()> {
        if ticket.comments.is_some() {
            return Ok(());
        }
        let comments = match ticket.dir.as_deref() {
            Some(dir) => {
                let path = dir.join(COMMENTS_DOC);
                if path.is_file() {
                    read_json::<Vec<Comment>>(&path)?
                } else {
                    Vec::new()
                }
            }
            None => Vec::new(),
        };
        ticket.comments = Some(comments);
        Ok(())
    }

    /// Loads the attachment list from `attachments.doc` if it has not been
    /// loaded yet.
    pub fn load_attachments(&self, ticket: &mut Ticket) -> Result<()> {
        if ticket.attachments.is_some() {
            return Ok(());
        }
        let attachments = match ticket.dir.as_deref() {
            Some(dir) => {
                let path = dir.join(ATTACHMENTS_DOC);
                if path.is_file() {
                    read_json::<Vec<Attachment>>(&path)?
                } else {
                    Vec::new()
                }
            }
            None => Vec::new(),
        };
        ticket.attachments = Some(attachments);
        Ok(())
    }

    /// Saves a ticket as a full snapshot of its in-memory state.
    ///
    /// On the first save the backing directory is created, the short id is
    /// assigned from its basename, and the configured post-create hook runs
    /// (fire-and-forget; hook failures never fail the save).
    pub fn save(&self, ticket: &mut Ticket) -> Result<()> {
        let mut created = false;
        if ticket.dir.is_none() {
            fs::create_dir_all(&self.root)?;
            let dir_name = record_dir_name(&ticket.data);
            let dir = self.root.join(&dir_name);
            fs::create_dir_all(&dir)?;
            ticket.data.id = short_id_of(&dir_name);
            ticket.dir = Some(dir);
            created = true;
        }
        ticket.data.updated = Utc::now();

        // Side documents that were never loaded must be read back before the
        // full rewrite, or existing comments/attachments would be lost.
        self.load_comments(ticket)?;
        self.load_attachments(ticket)?;

        let dir = ticket.dir.clone().expect("directory assigned above");
        write_json(&dir.join(RECORD_DOC), &ticket.data)?;
        write_json(&dir.join(COMMENTS_DOC), &ticket.comments)?;
        write_json(&dir.join(ATTACHMENTS_DOC), &ticket.attachments)?;

        if created {
            self.run_hook(&dir);
        }
        Ok(())
    }

    /// Copies `source` into the ticket's attachment area and appends an
    /// [`Attachment`] record. The ticket still has to be saved afterwards.
    pub fn attach(
        &self,
        ticket: &mut Ticket,
        caption: &str,
        source: &Path,
        user: &str,
    ) -> Result<Attachment> {
        let dir = ticket.dir.clone().ok_or_else(|| {
            TixError::Store("cannot attach to an unsaved ticket".to_string())
        })?;
        self.load_attachments(ticket)?;

        let attachment = Attachment::new(caption, source, user);
        let payload_dir = dir.join(ATTACHMENTS_DIR).join(&attachment.file_id);
        fs::create_dir_all(&payload_dir)?;
        fs::copy(source, payload_dir.join(&attachment.original_name))?;

        ticket
            .attachments
            .get_or_insert_with(Vec::new)
            .push(attachment.clone());
        Ok(attachment)
    }

    /// Absolute path of an attachment payload.
    pub fn attachment_path(&self, ticket: &Ticket, attachment: &Attachment) -> Option<PathBuf> {
        ticket.dir.as_deref().map(|dir| {
            dir.join(ATTACHMENTS_DIR)
                .join(&attachment.file_id)
                .join(&attachment.original_name)
        })
    }

    fn run_hook(&self, dir: &Path) {
        if self.after_add.is_empty() {
            return;
        }
        // Fire-and-forget: a missing or failing hook never fails the save.
        let _ = Command::new(&self.after_add).arg(dir).status();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(temp: &TempDir) -> TicketStore {
        TicketStore::new(temp.path().join(".tickets"), String::new())
    }

    fn new_ticket(name: &str) -> Ticket {
        Ticket::new(name, "opened", "normal", "tester")
    }

    #[test]
    fn save_assigns_id_and_directory() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        let mut t = new_ticket("Issue #1");
        store.save(&mut t).unwrap();

        assert_eq!(t.short_id().len(), 8);
        let dir = t.dir().unwrap();
        assert!(dir.join(RECORD_DOC).is_file());
        let name = t.dir_name().unwrap();
        assert!(name.starts_with(t.short_id()));
        assert!(name.ends_with(RECORD_SUFFIX));
        assert!(name.contains("Issue_#1"));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        let mut t = new_ticket("Roundtrip");
        t.data.description = "details".into();
        t.data.tags = vec!["ui".into(), "backend".into()];
        t.data.modules = vec!["core".into()];
        store.save(&mut t).unwrap();

        let loaded = store.load(t.dir().unwrap()).unwrap();
        assert_eq!(loaded.data, t.data);
    }

    #[test]
    fn id_is_stable_across_saves() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        let mut t = new_ticket("Stable");
        store.save(&mut t).unwrap();
        let id = t.short_id().to_string();
        let dir = t.dir().unwrap().to_path_buf();

        t.data.description = "changed".into();
        store.save(&mut t).unwrap();
        store.save(&mut t).unwrap();

        assert_eq!(t.short_id(), id);
        assert_eq!(t.dir().unwrap(), dir);
        let loaded = store.load(&dir).unwrap();
        assert_eq!(loaded.short_id(), id);
    }

    #[test]
    fn load_derives_id_when_document_lacks_one() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        let mut t = new_ticket("Legacy");
        store.save(&mut t).unwrap();

        // Strip the id field the way pre-id documents looked.
        let record = t.dir().unwrap().join(RECORD_DOC);
        let mut data: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&record).unwrap()).unwrap();
        data.as_object_mut().unwrap().remove("id");
        fs::write(&record, serde_json::to_string(&data).unwrap()).unwrap();

        let loaded = store.load(t.dir().unwrap()).unwrap();
        assert_eq!(loaded.short_id(), t.short_id());
    }

    #[test]
    fn comments_survive_save_without_explicit_load() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        let mut t = new_ticket("Commented");
        store.save(&mut t).unwrap();
        store.load_comments(&mut t).unwrap();
        t.add_comment("first", "tester");
        store.save(&mut t).unwrap();

        // A fresh load has not read comments.doc; a save must not drop them.
        let mut reloaded = store.load(t.dir().unwrap()).unwrap();
        reloaded.data.description = "edited elsewhere".into();
        store.save(&mut reloaded).unwrap();

        let mut check = store.load(t.dir().unwrap()).unwrap();
        store.load_comments(&mut check).unwrap();
        assert_eq!(check.comments().len(), 1);
        assert_eq!(check.comments()[0].comment, "first");
    }

    #[test]
    fn lazy_load_marks_empty_lists_as_loaded() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        let mut t = new_ticket("Empty");
        store.save(&mut t).unwrap();

        let mut loaded = store.load(t.dir().unwrap()).unwrap();
        assert!(loaded.comments.is_none());
        store.load_comments(&mut loaded).unwrap();
        assert_eq!(loaded.comments, Some(Vec::new()));
    }

    #[test]
    fn attach_copies_payload_under_file_id() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        let mut t = new_ticket("With attachment");
        store.save(&mut t).unwrap();

        let source = temp.path().join("crash.log");
        fs::write(&source, "stack trace").unwrap();
        let att = store.attach(&mut t, "crash dump", &source, "tester").unwrap();
        store.save(&mut t).unwrap();

        let payload = store.attachment_path(&t, &att).unwrap();
        assert_eq!(fs::read_to_string(payload).unwrap(), "stack trace");

        let mut reloaded = store.load(t.dir().unwrap()).unwrap();
        store.load_attachments(&mut reloaded).unwrap();
        assert_eq!(reloaded.attachments().len(), 1);
        assert_eq!(reloaded.attachments()[0].comment, "crash dump");
        assert_eq!(reloaded.attachments()[0].original_name, "crash.log");
    }

    #[test]
    fn failing_hook_does_not_fail_the_save() {
        let temp = TempDir::new().unwrap();
        let store = TicketStore::new(
            temp.path().join(".tickets"),
            "/nonexistent/after-add-hook".to_string(),
        );
        let mut t = new_ticket("Hooked");
        store.save(&mut t).unwrap();
        assert!(t.dir().unwrap().join(RECORD_DOC).is_file());
    }

    #[test]
    fn load_missing_directory_is_an_error() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        let err = store.load(&temp.path().join("missing.record")).unwrap_err();
        assert!(matches!(err, TixError::Store(_)));
    }
}

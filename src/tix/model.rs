use crate::error::{Result, TixError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Length of user-facing short identifiers (tickets and attachments).
pub const SHORT_ID_LEN: usize = 8;

/// First 8 hex characters of the SHA-256 of `input`.
///
/// Used as a collision-resistant storage key, not as an integrity check.
pub fn short_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let hash = hasher.finalize();
    hex::encode(&hash[..SHORT_ID_LEN / 2])
}

/// Derive a short id from a storage directory name.
pub fn short_id_of(dir_name: &str) -> String {
    dir_name.chars().take(SHORT_ID_LEN).collect()
}

/// Best-effort identity of the invoking user.
pub fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// The persisted core fields of a ticket (`record.doc`).
///
/// The short `id` is stored in the document at creation time; the loader
/// falls back to the directory basename for documents written without it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketData {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: String,
    pub severity: String,
    pub tags: Vec<String>,
    pub modules: Vec<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub created_by: String,
}

/// A comment on a ticket. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub comment: String,
    pub created: DateTime<Utc>,
    pub created_by: String,
}

impl Comment {
    pub fn new(text: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            comment: text.into(),
            created: Utc::now(),
            created_by: user.into(),
        }
    }
}

/// An attachment record. The payload itself lives under
/// `attachments/<file_id>/<original_name>` in the ticket directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub comment: String,
    pub original_name: String,
    pub created: DateTime<Utc>,
    pub created_by: String,
    pub file_id: String,
}

impl Attachment {
    /// Creates an attachment record for `source`. The `file_id` is derived
    /// from (caption, original filename, creation timestamp) so concurrent
    /// attachments of the same filename land in distinct subdirectories.
    pub fn new(caption: impl Into<String>, source: &Path, user: impl Into<String>) -> Self {
        let comment = caption.into();
        let original_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let created = Utc::now();
        let file_id = short_hash(&format!("{}-{}-{}", comment, original_name, created));
        Self {
            comment,
            original_name,
            created,
            created_by: user.into(),
            file_id,
        }
    }
}

/// One ticket: persisted core fields plus lazily loaded side documents.
///
/// `comments` and `attachments` are `None` until loaded from their side
/// documents, so a ticket with zero comments is distinguishable from one
/// whose comments were never read.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub data: TicketData,
    pub(crate) dir: Option<PathBuf>,
    pub(crate) comments: Option<Vec<Comment>>,
    pub(crate) attachments: Option<Vec<Attachment>>,
}

impl Ticket {
    /// Creates an unsaved ticket. The id and backing directory are assigned
    /// on first save.
    pub fn new(name: &str, status: &str, severity: &str, created_by: &str) -> Self {
        let now = Utc::now();
        Self {
            data: TicketData {
                id: String::new(),
                name: name.replace(['\r', '\n'], ""),
                description: String::new(),
                status: status.to_string(),
                severity: severity.to_string(),
                tags: Vec::new(),
                modules: Vec::new(),
                created: now,
                updated: now,
                created_by: created_by.to_string(),
            },
            dir: None,
            comments: None,
            attachments: None,
        }
    }

    pub(crate) fn from_data(data: TicketData) -> Self {
        Self {
            data,
            dir: None,
            comments: None,
            attachments: None,
        }
    }

    pub fn short_id(&self) -> &str {
        &self.data.id
    }

    /// The ticket's backing directory, if it has been saved.
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Basename of the backing directory.
    pub fn dir_name(&self) -> Option<String> {
        self.dir
            .as_deref()
            .and_then(|d| d.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }

    /// Loaded comments, or an empty slice if never loaded.
    pub fn comments(&self) -> &[Comment] {
        self.comments.as_deref().unwrap_or(&[])
    }

    /// Loaded attachments, or an empty slice if never loaded.
    pub fn attachments(&self) -> &[Attachment] {
        self.attachments.as_deref().unwrap_or(&[])
    }

    /// Sets the status if it is one of the configured values; otherwise the
    /// ticket is left unchanged.
    pub fn set_status(&mut self, status: &str, allowed: &[String]) -> Result<()> {
        if !allowed.iter().any(|s| s == status) {
            return Err(TixError::InvalidStatus(status.to_string()));
        }
        self.data.status = status.to_string();
        Ok(())
    }

    /// Appends a comment. The comment list must have been loaded first so
    /// the next full save does not drop existing comments.
    pub fn add_comment(&mut self, text: &str, user: &str) {
        self.comments
            .get_or_insert_with(Vec::new)
            .push(Comment::new(text, user));
    }
}

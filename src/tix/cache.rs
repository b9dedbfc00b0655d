//! # Ticket index
//!
//! [`TicketIndex`] mirrors the record directories under the storage root
//! into memory: an ordered ticket list plus two lookup maps, short id →
//! position and directory name → position + last-seen mtime. The index is
//! persisted as `index.snapshot` in the cache directory for fast warm
//! starts, and reconciled against the live directory listing on open:
//!
//! 1. load the snapshot if one exists;
//! 2. purge entries whose directory disappeared (positions are dense, so
//!    removals reindex the survivors in one pass);
//! 3. scan the storage root — unknown directories are loaded and appended,
//!    known directories with a newer mtime are reloaded in place.
//!
//! Any change marks the index dirty; a dirty index writes its snapshot back
//! before returning control. There is no cross-process locking: two
//! concurrent invocations race on the snapshot and the last write wins. The
//! record directories themselves are never lost, only the cache's view of
//! them, which the next reconciliation repairs.

use crate::error::Result;
use crate::model::{Ticket, TicketData};
use crate::query::Query;
use crate::store::{self, TicketStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub const SNAPSHOT_FILE: &str = "index.snapshot";

/// Per-directory cache bookkeeping: position in the ticket list and the
/// filesystem mtime observed when the entry was last (re)loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirState {
    pub pos: usize,
    pub modified: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotRecord {
    directory: String,
    record: TicketData,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    records: Vec<SnapshotRecord>,
    id_index: HashMap<String, usize>,
    dir_index: HashMap<String, DirState>,
}

impl Snapshot {
    /// Both maps must cover exactly the record list: one entry per record,
    /// every position in range. Anything else is treated as corrupt.
    fn is_consistent(&self) -> bool {
        let len = self.records.len();
        self.id_index.len() == len
            && self.dir_index.len() == len
            && self.id_index.values().all(|&pos| pos < len)
            && self.dir_index.values().all(|state| state.pos < len)
    }
}

pub struct TicketIndex {
    store: TicketStore,
    cache_dir: PathBuf,
    tickets: Vec<Ticket>,
    by_id: HashMap<String, usize>,
    by_dir: HashMap<String, DirState>,
    dirty: bool,
    ready: bool,
}

impl TicketIndex {
    /// Opens the index: creates the storage and cache roots, loads the
    /// snapshot and reconciles it against the filesystem.
    ///
    /// If either root cannot be created the index comes up not-ready and
    /// every query degrades to an empty result instead of erroring.
    pub fn open(store: TicketStore, cache_dir: PathBuf) -> Result<Self> {
        let mut index = Self::uninitialized(store, cache_dir);
        if fs::create_dir_all(&index.cache_dir).is_err()
            || fs::create_dir_all(index.store.root()).is_err()
        {
            return Ok(index);
        }
        index.ready = true;
        index.reconcile()?;
        Ok(index)
    }

    /// An index with no usable environment. All queries return empty.
    pub fn uninitialized(store: TicketStore, cache_dir: PathBuf) -> Self {
        Self {
            store,
            cache_dir,
            tickets: Vec::new(),
            by_id: HashMap::new(),
            by_dir: HashMap::new(),
            dirty: false,
            ready: false,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn store(&self) -> &TicketStore {
        &self.store
    }

    /// Rebuilds the in-memory state from the snapshot and the live
    /// directory listing, then persists the snapshot if anything changed.
    pub fn reconcile(&mut self) -> Result<()> {
        if !self.ready {
            return Ok(());
        }
        self.tickets.clear();
        self.by_id.clear();
        self.by_dir.clear();
        self.dirty = false;

        self.load_snapshot();
        self.purge_removed();
        self.scan_storage()?;
        self.save_snapshot()
    }

    /// Fast path after a caller-side mutation: overwrite the cached entry
    /// at the ticket's known position and note the directory's new mtime.
    /// Unknown ids fall back to a full reconciliation.
    pub fn refresh(&mut self, ticket: &Ticket) -> Result<()> {
        if !self.ready {
            return Ok(());
        }
        match self.by_id.get(ticket.short_id()).copied() {
            Some(pos) => {
                self.tickets[pos] = ticket.clone();
                // Record the directory's current mtime so the next open does
                // not re-load what was just written through the cache.
                if let Some(name) = ticket.dir_name() {
                    if let Ok(modified) = fs::metadata(self.store.root().join(&name))
                        .and_then(|meta| meta.modified())
                    {
                        self.by_dir.insert(
                            name,
                            DirState {
                                pos,
                                modified: modified.into(),
                            },
                        );
                    }
                }
                self.dirty = true;
                self.save_snapshot()
            }
            None => self.reconcile(),
        }
    }

    /// Filtered, sorted enumeration. The result is an owned snapshot; later
    /// index mutations do not affect it.
    pub fn enumerate(&self, query: &Query) -> Vec<Ticket> {
        if !self.ready {
            return Vec::new();
        }
        query.apply(&self.tickets)
    }

    /// Resolves a possibly partial short id: an exact match yields exactly
    /// that ticket, otherwise every ticket whose id starts with `partial`
    /// is yielded. Read-only; does not dirty the cache.
    pub fn resolve(&self, partial: &str) -> Vec<&Ticket> {
        if !self.ready {
            return Vec::new();
        }
        if let Some(&pos) = self.by_id.get(partial) {
            return vec![&self.tickets[pos]];
        }
        self.by_id
            .iter()
            .filter(|(id, _)| id.starts_with(partial))
            .map(|(_, &pos)| &self.tickets[pos])
            .collect()
    }

    /// Like [`resolve`](Self::resolve), but for callers about to mutate the
    /// matches: a successful resolution marks the index dirty and persists
    /// the snapshot, mirroring the mutation pathway's bookkeeping.
    pub fn resolve_for_update(&mut self, partial: &str) -> Result<Vec<Ticket>> {
        let matches: Vec<Ticket> = self.resolve(partial).into_iter().cloned().collect();
        if !matches.is_empty() {
            self.dirty = true;
            self.save_snapshot()?;
        }
        Ok(matches)
    }

    /// Writes the snapshot if the index is dirty.
    pub fn save_snapshot(&mut self) -> Result<()> {
        if !self.ready || !self.dirty {
            return Ok(());
        }
        let snapshot = Snapshot {
            records: self
                .tickets
                .iter()
                .map(|t| SnapshotRecord {
                    directory: t.dir_name().unwrap_or_default(),
                    record: t.data.clone(),
                })
                .collect(),
            id_index: self.by_id.clone(),
            dir_index: self.by_dir.clone(),
        };
        store::write_json(&self.cache_dir.join(SNAPSHOT_FILE), &snapshot)?;
        self.dirty = false;
        Ok(())
    }

    fn load_snapshot(&mut self) {
        let path = self.cache_dir.join(SNAPSHOT_FILE);
        if !path.is_file() {
            return;
        }
        // A corrupt snapshot is not fatal; the scan below rebuilds it. That
        // covers both unparseable JSON and a parseable snapshot whose maps
        // disagree with its record list.
        let snapshot: Snapshot = match fs::read_to_string(&path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .filter(Snapshot::is_consistent)
        {
            Some(snapshot) => snapshot,
            None => {
                self.dirty = true;
                return;
            }
        };
        for entry in snapshot.records {
            let mut ticket = Ticket::from_data(entry.record);
            ticket.dir = Some(self.store.root().join(&entry.directory));
            self.tickets.push(ticket);
        }
        self.by_id = snapshot.id_index;
        self.by_dir = snapshot.dir_index;
    }

    /// Drops entries whose backing directory no longer exists. Removals are
    /// applied in descending position order, then all surviving positions
    /// are rebuilt in a single pass.
    fn purge_removed(&mut self) {
        let mut removed: Vec<usize> = self
            .by_dir
            .iter()
            .filter(|(name, _)| !self.store.root().join(name.as_str()).is_dir())
            .map(|(_, state)| state.pos)
            .collect();
        if removed.is_empty() {
            return;
        }
        removed.sort_unstable();
        for &pos in removed.iter().rev() {
            if pos < self.tickets.len() {
                self.tickets.remove(pos);
            }
        }
        self.reindex();
        self.dirty = true;
    }

    /// Rebuilds both maps from the surviving ticket list, preserving the
    /// last-seen mtimes of entries that are still present.
    fn reindex(&mut self) {
        let old = std::mem::take(&mut self.by_dir);
        self.by_id.clear();
        for (pos, ticket) in self.tickets.iter().enumerate() {
            let name = match ticket.dir_name() {
                Some(name) => name,
                None => continue,
            };
            let modified = old
                .get(&name)
                .map(|state| state.modified)
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
            self.by_dir.insert(name, DirState { pos, modified });
            self.by_id.insert(ticket.short_id().to_string(), pos);
        }
    }

    /// Scans the storage root: loads directories the cache has never seen,
    /// reloads known directories whose mtime advanced (position preserved).
    fn scan_storage(&mut self) -> Result<()> {
        for entry in fs::read_dir(self.store.root())? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let modified: DateTime<Utc> = entry.metadata()?.modified()?.into();

            match self.by_dir.get(&name).copied() {
                Some(state) if modified > state.modified => {
                    let ticket = self.store.load(&path)?;
                    // A hand-edited record may carry a different id; the old
                    // one must not survive as an alias.
                    let old_id = self.tickets[state.pos].short_id().to_string();
                    if old_id != ticket.short_id() {
                        self.by_id.remove(&old_id);
                    }
                    self.by_id.insert(ticket.short_id().to_string(), state.pos);
                    self.tickets[state.pos] = ticket;
                    self.by_dir.insert(
                        name,
                        DirState {
                            pos: state.pos,
                            modified,
                        },
                    );
                    self.dirty = true;
                }
                Some(_) => {}
                None => {
                    let ticket = self.store.load(&path)?;
                    let pos = self.tickets.len();
                    self.by_id.insert(ticket.short_id().to_string(), pos);
                    self.tickets.push(ticket);
                    self.by_dir.insert(name, DirState { pos, modified });
                    self.dirty = true;
                }
            }
        }
        Ok(())
    }
}

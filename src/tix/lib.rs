//! # Tix Architecture
//!
//! Tix is a file-based ticket tracker: every ticket lives as a directory of
//! plain documents under the project's `.tickets/` root, and a cached index
//! keeps lookups fast without ever being the source of truth.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (args.rs, wired by main.rs)                      │
//! │  - Parses arguments, renders tables, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Pure business logic per command                          │
//! │  - Operates on Rust types, returns CmdResult                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Index + Storage (cache.rs, store.rs)                       │
//! │  - TicketStore: one directory per ticket, full rewrites     │
//! │  - TicketIndex: snapshot cache reconciled against the       │
//! │    filesystem by mtime, short-id prefix resolution          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The id system
//!
//! Every ticket gets an 8-character id derived from a content hash of its
//! creation time and name; the id doubles as the prefix of the ticket's
//! storage directory and never changes after the first save. User input is
//! resolved by exact match first, then by prefix, and an ambiguous prefix
//! applies the requested operation to every match.
//!
//! ## The cache is disposable
//!
//! `.ticket_cache/index.snapshot` only exists to avoid re-reading every
//! record on start. Deleting it (or racing another process for it) costs a
//! rebuild, never data: reconciliation always converges on what the record
//! directories say.
//!
//! ## Module overview
//!
//! - [`api`]: the facade — entry point for all operations
//! - [`commands`]: business logic for each command
//! - [`cache`]: the ticket index and snapshot reconciliation
//! - [`store`]: directory-based ticket persistence
//! - [`model`]: core data types (`Ticket`, `Comment`, `Attachment`)
//! - [`query`]: sort/filter token parsing and evaluation
//! - [`config`]: `.tix.json` project configuration
//! - [`init`]: project root discovery and context bootstrap
//! - [`error`]: error types

pub mod api;
pub mod cache;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod query;
pub mod store;

//! # Docsite Library
//!
//! This library provides the core functionality for aggregating
//! documentation from several upstream repositories into one browsable
//! site. It is designed to be used by the `docsite` command-line tool but
//! can also be embedded by a build integration that only needs edit-link
//! resolution.
//!
//! ## Core Concepts
//!
//! - **Sources (`config`)**: the static list of upstream repositories to
//!   synchronize, each with a destination content folder, copy-strategy
//!   preferences, and its auxiliary imports and shim documents.
//! - **Synchronization (`sync`)**: the pipeline that clones each source,
//!   copies its documentation tree, sanitizes Markdown for the site's
//!   renderer, and synthesizes landing pages and shims.
//! - **Markers (`markers`)**: two small files per synced destination
//!   recording which repository the content came from and which copy
//!   strategy was used.
//! - **Edit-URL resolution (`edit_url`)**: maps a document's logical path
//!   to the GitHub edit link of its true upstream location, using the
//!   marker metadata and per-collection configuration.
//!
//! ## Execution Flow
//!
//! Synchronization runs out-of-band (a maintenance step) and produces a
//! local directory tree plus marker files. The website build reads that
//! tree directly for content and calls the resolver once per document to
//! populate each page's "edit this page" link. The resolver never clones
//! anything; it is a pure function of its inputs and the markers on disk.

pub mod config;
pub mod edit_url;
pub mod error;
pub mod git;
pub mod markers;
pub mod output;
pub mod path;
pub mod sync;

#[cfg(test)]
mod sanitize_proptest;

//! # CLI Command Implementations
//!
//! One module per subcommand of the `docsite` command-line tool. Each
//! module defines an `Args` struct derived with `clap` and an `execute`
//! function that orchestrates the necessary operations by calling into
//! the `docsite` library.

pub mod check_links;
pub mod completions;
pub mod resolve;
pub mod status;
pub mod sync;

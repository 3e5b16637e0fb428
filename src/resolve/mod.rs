//! Test-tree resolution engine
//!
//! Turns a user-supplied test location into a runnable step sequence:
//! entry-file resolution, test-scoped variable loading, and recursive
//! include expansion.

mod entry;
mod include;
mod vars;

pub use entry::{base_path, resolve_entry};
pub use include::{IncludeResolver, MAX_INCLUDE_DEPTH};
pub use vars::resolve_vars;

//! Reading and writing todo.txt formatted files.
//!
//! See <http://todotxt.com/> for the format.

pub mod file;
pub mod parse;
pub mod task;

use tracing::warn;

use crate::error::{Result, TodoError};

pub use file::TodoFile;
pub use task::{Clock, Priority, SystemClock, Task};

/// Marker beginning a project tag.
pub const PROJECT_TAG: char = '+';

/// Marker beginning a context tag.
pub const CONTEXT_TAG: char = '@';

/// Separator of a `key:value` keyword.
pub const KEYWORD_SEP: char = ':';

/// chrono format of todo.txt dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Width of a formatted date.
pub const DATE_LEN: usize = 10;

/// Checks that `tag` can name a filter: it begins with a project or context
/// marker and ends like a tag does.
pub fn is_valid_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    let first_ok = matches!(chars.next(), Some(PROJECT_TAG | CONTEXT_TAG));
    first_ok && chars.next_back().is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// Rejects filter tags that could never match, naming the first bad one.
pub fn check_tags<S: AsRef<str>>(tags: &[S]) -> Result<()> {
    for tag in tags {
        let tag = tag.as_ref();
        if !is_valid_tag(tag) {
            warn!("Bad tag: {}", tag);
            return Err(TodoError::BadTag(tag.to_string()));
        }
    }
    Ok(())
}

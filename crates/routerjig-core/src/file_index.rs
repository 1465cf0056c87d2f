//! Numbered output files
//!
//! Screenshots and pass tables are saved as `{prefix}{N}.{suffix}`; this
//! finds the next free `N` so earlier files are never overwritten.

use std::io;
use std::path::Path;

/// Largest index among `dir/{prefix}N.{suffix}` plus one, or 0 if no file
/// matches. Entries whose middle part is not an unsigned integer are ignored.
pub fn next_file_index(dir: &Path, prefix: &str, suffix: &str) -> io::Result<u64> {
    let ending = format!(".{}", suffix);
    let mut next = 0;

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some(index) = name
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix(ending.as_str()))
        else {
            continue;
        };
        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        if let Ok(i) = index.parse::<u64>() {
            next = next.max(i.saturating_add(1));
        }
    }

    tracing::debug!("next index for {}*{} in {}: {}", prefix, ending, dir.display(), next);
    Ok(next)
}

/// Filesystem helpers for locating and reading corpus files.
pub mod fs;

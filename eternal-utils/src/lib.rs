//! Utilities shared by eternal crates
//!
//! Optional features:
//! - `parsing`: bounds-checked parsing of binary buffers, see [parsing::Cursor]
//! - `guarded_file`: atomic file writing, see [GuardedFile]
#[cfg(feature = "parsing")]
pub mod parsing;
#[cfg(feature = "guarded_file")]
mod guarded_file;
#[cfg(feature = "guarded_file")]
pub use guarded_file::GuardedFile;

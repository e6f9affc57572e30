//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the upload core and the host
//! environment (filesystem entries, identifier generation).
//! Implementations live in `src/adapters/`.

pub mod filesystem;
pub mod id_gen;

pub use filesystem::{DirectoryReader, EntryKind, HostEntry, HostFileSystem, HostFuture};
pub use id_gen::IdGenerator;

//! Live adapters for real external interactions.

pub mod filesystem;
pub mod id_gen;

pub use filesystem::LiveHostFileSystem;
pub use id_gen::{LiveIdGenerator, SequentialIdGenerator};

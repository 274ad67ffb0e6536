//! Racewatch Core - Shared domain types
//!
//! This crate provides the media classification rules and the in-memory
//! session state shared between the folder watch coordinator and the
//! driver binary. It performs no I/O.
//!
//! All code follows the panic-free policy: no `.unwrap()`, `.expect()`,
//! `panic!()`, `unreachable!()`, `todo!()`, or direct indexing `[i]`.

pub mod media;
pub mod session;

// Re-exports for convenience
pub use media::{classify, race_number, rename_target, MediaKind};
pub use session::SessionState;

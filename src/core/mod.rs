//! The core module holds functionality shared by the definition graph and the runtime passes.

pub mod error;
pub mod handle;

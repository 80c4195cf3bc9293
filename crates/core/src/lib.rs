//! Domain logic shared by the JARVIS dashboard server and the management API.
//!
//! Nothing in here performs network I/O. Modules that persist state
//! ([`memory`]) do so through plain files handed in by the caller.

pub mod agents;
pub mod assistant;
pub mod intelligence;
pub mod json_file;
pub mod memory;
pub mod mock;
pub mod news;
pub mod ops;
pub mod text;
pub mod tts;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

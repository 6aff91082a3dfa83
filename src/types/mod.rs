//! Core type definitions.

mod port;
mod target;

pub use port::PortRange;
pub use target::{parse_host, Target};

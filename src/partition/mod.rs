//! Partition routing module
//!
//! Dependent streams are split into one partition per parent record. The
//! router turns a parent record into the values that fill the child's
//! path template; parent records are routed one at a time as the parent
//! stream produces them.

mod router;
mod types;

pub use router::ParentRouter;
pub use types::{ParentLink, PartitionValue};

#[cfg(test)]
mod tests;

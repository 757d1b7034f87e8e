//! Checkout ledger engine: availability accounting and access policy

pub mod availability;
pub mod locks;
pub mod policy;
pub mod projection;

pub use availability::{available, holders, outstanding_by_tool, HolderSet};
pub use locks::ToolLocks;
pub use policy::{can_check_in, can_check_out};
pub use projection::{Lookup, ProjectionCache};

//! Data models for the Tool Crib

pub mod actor;
pub mod category;
pub mod checkout;
pub mod employee;
pub mod text_log;
pub mod tool;

// Re-export commonly used types
pub use actor::Actor;
pub use category::{Categories, Category, CategoryKind};
pub use checkout::{CheckoutAction, CheckoutEvent, NewCheckoutEvent};
pub use employee::Employee;
pub use text_log::TextLogEntry;
pub use tool::{Tool, ToolId, ToolStatus};

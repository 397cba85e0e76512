//! Visit lifecycle rules
//!
//! Pure logic with no I/O: the status state machine, overstay detection,
//! unique code generation and the daily dashboard summary. Services call
//! into this module; nothing here touches the database or the network.

pub mod code;
pub mod overstay;
pub mod summary;
pub mod transition;

pub use code::generate_unique_code;
pub use overstay::{is_overstayed, OverstayTracker};
pub use summary::{DailySummary, DepartmentActivity};
pub use transition::TransitionError;

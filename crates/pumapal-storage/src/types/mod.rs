//! Type definitions for PumaPal storage.

mod campus;
mod course;
mod email;
mod groups;
mod ids;
mod meeting_time;
mod validation;

// Re-export all types from submodules
pub use campus::*;
pub use course::*;
pub use email::*;
pub use groups::*;
pub use ids::*;
pub use meeting_time::*;
pub use validation::*;

pub mod groups;
pub mod membership;
pub mod profile;

pub use groups::{cmd_create, cmd_delete, cmd_edit, cmd_list, cmd_search, cmd_show};
pub use membership::{cmd_join, cmd_leave};
pub use profile::{cmd_profile_set, cmd_profile_show};

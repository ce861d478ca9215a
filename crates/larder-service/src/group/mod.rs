//! Household (group) management.

pub mod service;
pub mod view;

pub use service::{AddMemberRequest, CreateGroupRequest, GroupService, UpdateGroupRequest};
pub use view::{GroupView, MemberView};

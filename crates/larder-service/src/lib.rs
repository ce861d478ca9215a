//! # larder-service
//!
//! Business logic for Larder accounts and households. Each service is
//! built once at startup with `Arc` dependencies and receives the caller
//! as an explicit [`RequestContext`] on every call.

pub mod account;
pub mod context;
pub mod group;
pub mod notification;

pub use account::{AccountProfile, AccountService, AdminAccountService, RegisterRequest};
pub use context::RequestContext;
pub use group::{
    AddMemberRequest, CreateGroupRequest, GroupService, GroupView, MemberView, UpdateGroupRequest,
};
pub use notification::{LogNotifier, RecordingNotifier};

#[cfg(test)]
pub(crate) mod testing;

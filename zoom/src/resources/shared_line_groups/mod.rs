//! Shared line group resources

pub mod resource_shared_line_group;
pub mod resource_shared_line_group_members;
pub mod resource_shared_line_group_phone_numbers;

pub use resource_shared_line_group::SharedLineGroupResource;
pub use resource_shared_line_group_members::SharedLineGroupMembersResource;
pub use resource_shared_line_group_phone_numbers::SharedLineGroupPhoneNumbersResource;

//! Phone user resources

pub mod resource_user_calling_plans;
pub mod resource_user_phone_numbers;

pub use resource_user_calling_plans::UserCallingPlansResource;
pub use resource_user_phone_numbers::UserPhoneNumbersResource;

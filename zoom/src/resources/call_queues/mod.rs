//! Call queue resources

pub mod resource_call_queue_members;
pub mod resource_call_queue_phone_numbers;
pub mod resource_call_queue_policy_voice_mail;

pub use resource_call_queue_members::CallQueueMembersResource;
pub use resource_call_queue_phone_numbers::CallQueuePhoneNumbersResource;
pub use resource_call_queue_policy_voice_mail::CallQueueVoicemailPolicyResource;

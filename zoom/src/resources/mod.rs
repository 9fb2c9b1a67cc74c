//! Resource implementations

pub mod auto_receptionists;
pub mod call_queues;
pub mod external_contacts;
pub mod members;
pub mod phone_numbers;
pub mod shared_line_groups;
pub mod users;

pub use auto_receptionists::AutoReceptionistIvrResource;
pub use call_queues::{
    CallQueueMembersResource, CallQueuePhoneNumbersResource, CallQueueVoicemailPolicyResource,
};
pub use external_contacts::ExternalContactResource;
pub use shared_line_groups::{
    SharedLineGroupMembersResource, SharedLineGroupPhoneNumbersResource, SharedLineGroupResource,
};
pub use users::{UserCallingPlansResource, UserPhoneNumbersResource};

use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

pub(crate) fn not_configured() -> Diagnostic {
    Diagnostic::error(
        "Provider not configured",
        "Provider data was not properly configured",
    )
}

/// Read a non-empty string attribute that identifies the remote object
pub(crate) fn required_id(state: &DynamicValue, name: &str) -> Result<String, Diagnostic> {
    match state.get_string(&AttributePath::new(name)) {
        Ok(id) if !id.is_empty() => Ok(id),
        _ => Err(Diagnostic::error(
            format!("Missing {}", name),
            format!("The '{}' attribute is required", name),
        )
        .with_attribute(AttributePath::new(name))),
    }
}

/// Elements of a set or list attribute. Null and unknown collections read as `None`.
pub(crate) fn collection(value: &Dynamic) -> Option<&[Dynamic]> {
    match value {
        Dynamic::List(items) => Some(items),
        _ => None,
    }
}

/// A list read back from the API stays null when it was null before and the
/// remote side has nothing to report
pub(crate) fn keep_null<T>(was_null: bool, items: Vec<T>) -> Option<Vec<T>> {
    if was_null && items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Nested object type used for set, list and single nested attributes.
/// The element shape is carried by the nested type itself.
pub(crate) fn object_set() -> tfplug::schema::AttributeType {
    use tfplug::schema::AttributeType;
    AttributeType::Set(Box::new(AttributeType::Object(Default::default())))
}

pub(crate) fn object_type() -> tfplug::schema::AttributeType {
    tfplug::schema::AttributeType::Object(Default::default())
}

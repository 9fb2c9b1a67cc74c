//! External contact resources

pub mod resource_external_contact;

pub use resource_external_contact::ExternalContactResource;

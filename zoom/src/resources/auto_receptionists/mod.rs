//! Auto receptionist resources

pub mod resource_auto_receptionist_ivr;

pub use resource_auto_receptionist_ivr::AutoReceptionistIvrResource;

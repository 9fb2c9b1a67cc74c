//! End-to-end resource lifecycles against a mock Zoom API

#![allow(clippy::disallowed_methods)]

mod auto_receptionist_ivr_test;
mod call_queue_members_test;
mod call_queue_phone_numbers_test;
mod call_queue_policy_test;
mod external_contact_test;
mod shared_line_group_assignments_test;
mod shared_line_group_test;
mod support;
mod user_calling_plans_test;
mod user_phone_numbers_test;

//! Role-based authorization policy

pub mod policy;

pub use policy::{AdminAction, authorize_admin_action, authorize_content_access};

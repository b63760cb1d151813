//! Administrative operations over user accounts

pub mod bulk;

pub use bulk::BulkAdminOperator;

pub mod auth;
pub mod dashboard;
pub mod invoice;
pub mod lease;
pub mod payment;
pub mod property;
pub mod tenant;
pub mod tenant_payment;
pub mod transaction;
pub mod unit;

pub mod auth;
pub mod dashboard;
pub mod invoices;
pub mod leases;
pub mod payments;
pub mod properties;
pub mod tenant_payments;
pub mod tenants;
pub mod transactions;
pub mod units;

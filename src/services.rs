pub mod auth;
pub mod dashboard_service;
pub mod invoice_service;
pub mod lease_service;
pub mod payment_service;
pub mod property_service;
pub mod tenant_payment_service;
pub mod tenant_service;
pub mod transaction_service;
pub mod unit_service;

pub use auth::AuthService;
pub use dashboard_service::DashboardService;
pub use invoice_service::InvoiceService;
pub use lease_service::LeaseService;
pub use payment_service::PaymentService;
pub use property_service::PropertyService;
pub use tenant_payment_service::TenantPaymentService;
pub use tenant_service::TenantService;
pub use transaction_service::TransactionService;
pub use unit_service::UnitService;

pub mod user_repo;
pub use user_repo::UserRepository;
pub mod property_repo;
pub use property_repo::PropertyRepository;
pub mod unit_repo;
pub use unit_repo::UnitRepository;
pub mod tenant_repo;
pub use tenant_repo::TenantRepository;
pub mod lease_repo;
pub use lease_repo::LeaseRepository;
pub mod payment_repo;
pub use payment_repo::PaymentRepository;
pub mod tenant_payment_repo;
pub use tenant_payment_repo::TenantPaymentRepository;
pub mod transaction_repo;
pub use transaction_repo::TransactionRepository;

use sqlx::migrate::Migrator;

// Migrações embutidas no binário (pasta ./migrations)
pub static MIGRATOR: Migrator = sqlx::migrate!();

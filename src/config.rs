// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::{
    common::i18n::I18nStore,
    db::{
        LeaseRepository, PaymentRepository, PropertyRepository, TenantPaymentRepository, TenantRepository,
        TransactionRepository, UnitRepository, UserRepository,
    },
    models::invoice::CompanyInfo,
    services::{
        AuthService, DashboardService, InvoiceService, LeaseService, PaymentService, PropertyService,
        TenantPaymentService, TenantService, TransactionService, UnitService,
    },
};

const DEV_JWT_SECRET: &str = "dev-secret-change-me";

/// Configuração carregada das variáveis de ambiente.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub data_dir: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expires_days: i64,
    pub host: String,
    pub port: u16,
    pub fonts_dir: String,
    pub font_family: String,
    pub company: CompanyInfo,
    pub bcrypt_cost: u32,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = "./data".to_string();
        Self {
            database_url: format!("sqlite://{data_dir}/rent.db"),
            data_dir,
            db_max_connections: 5,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expires_days: 30,
            host: "0.0.0.0".to_string(),
            port: 3002,
            fonts_dir: "./fonts".to_string(),
            font_family: "LiberationSans".to_string(),
            company: CompanyInfo {
                name: "ERP Квадрат".to_string(),
                address: None,
                tax_id: None,
                currency_symbol: "₽".to_string(),
            },
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parsed<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(name) {
        Some(raw) => raw.parse::<T>().with_context(|| format!("{name} inválido: {raw:?}")),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Config::default();

        let data_dir = var("DB_PATH").unwrap_or(defaults.data_dir);
        let database_url = var("DATABASE_URL").unwrap_or_else(|| format!("sqlite://{data_dir}/rent.db"));

        let jwt_secret = match var("JWT_SECRET") {
            Some(secret) => secret,
            None => {
                tracing::warn!("⚠️ JWT_SECRET não definido, usando o segredo de desenvolvimento");
                defaults.jwt_secret
            }
        };

        Ok(Self {
            database_url,
            data_dir,
            db_max_connections: parsed("DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            jwt_secret,
            jwt_expires_days: parsed("JWT_EXPIRES_DAYS", defaults.jwt_expires_days)?,
            host: var("HOST").unwrap_or(defaults.host),
            port: parsed("PORT", defaults.port)?,
            fonts_dir: var("FONTS_DIR").unwrap_or(defaults.fonts_dir),
            font_family: var("FONT_FAMILY").unwrap_or(defaults.font_family),
            company: CompanyInfo {
                name: var("COMPANY_NAME").unwrap_or(defaults.company.name),
                address: var("COMPANY_ADDRESS"),
                tax_id: var("COMPANY_TAX_ID"),
                currency_symbol: var("CURRENCY_SYMBOL").unwrap_or(defaults.company.currency_symbol),
            },
            bcrypt_cost: parsed("BCRYPT_COST", defaults.bcrypt_cost)?,
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Arc<Config>,
    pub i18n_store: Arc<I18nStore>,

    pub auth_service: AuthService,
    pub property_service: PropertyService,
    pub unit_service: UnitService,
    pub tenant_service: TenantService,
    pub lease_service: LeaseService,
    pub payment_service: PaymentService,
    pub tenant_payment_service: TenantPaymentService,
    pub transaction_service: TransactionService,
    pub dashboard_service: DashboardService,
    pub invoice_service: InvoiceService,
}

impl AppState {
    /// Abre (ou cria) o banco e monta o estado.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .with_context(|| format!("DATABASE_URL inválida: {}", config.database_url))?
            .create_if_missing(true)
            .foreign_keys(true);

        let db_pool = SqlitePoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await
            .with_context(|| format!("Falha ao abrir o banco {}", config.database_url))?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida: {}", config.database_url);

        Ok(Self::from_pool(db_pool, config))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: SqlitePool, config: Config) -> Self {
        let user_repo = UserRepository::new();
        let property_repo = PropertyRepository::new();
        let unit_repo = UnitRepository::new();
        let tenant_repo = TenantRepository::new();
        let lease_repo = LeaseRepository::new();
        let payment_repo = PaymentRepository::new();
        let tenant_payment_repo = TenantPaymentRepository::new();
        let transaction_repo = TransactionRepository::new();

        let auth_service = AuthService::new(
            user_repo,
            config.jwt_secret.clone(),
            config.jwt_expires_days,
            config.bcrypt_cost,
        );
        let property_service = PropertyService::new(property_repo.clone(), unit_repo.clone());
        let unit_service = UnitService::new(
            unit_repo.clone(),
            property_repo.clone(),
            payment_repo.clone(),
            tenant_payment_repo.clone(),
        );
        let tenant_service = TenantService::new(tenant_repo.clone(), unit_repo.clone());
        let lease_service = LeaseService::new(
            lease_repo.clone(),
            unit_repo.clone(),
            tenant_repo.clone(),
            property_repo.clone(),
        );
        let payment_service = PaymentService::new(payment_repo);
        let tenant_payment_service = TenantPaymentService::new(tenant_payment_repo.clone(), lease_repo.clone());
        let transaction_service = TransactionService::new(transaction_repo.clone());
        let dashboard_service = DashboardService::new(
            property_repo.clone(),
            unit_repo.clone(),
            lease_repo.clone(),
            tenant_payment_repo,
            transaction_repo,
        );
        let invoice_service = InvoiceService::new(
            lease_repo,
            unit_repo,
            tenant_repo,
            property_repo,
            config.company.clone(),
            config.fonts_dir.clone(),
            config.font_family.clone(),
        );

        Self {
            db_pool,
            config: Arc::new(config),
            i18n_store: Arc::new(I18nStore::new()),
            auth_service,
            property_service,
            unit_service,
            tenant_service,
            lease_service,
            payment_service,
            tenant_payment_service,
            transaction_service,
            dashboard_service,
            invoice_service,
        }
    }
}

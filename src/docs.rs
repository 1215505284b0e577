// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::common;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,
        handlers::auth::health,

        // --- Properties ---
        handlers::properties::list_properties,
        handlers::properties::get_property,
        handlers::properties::create_property,
        handlers::properties::update_property,
        handlers::properties::delete_property,
        handlers::properties::list_property_units,
        handlers::properties::list_documents,
        handlers::properties::get_document,
        handlers::properties::upload_document,
        handlers::properties::delete_document,

        // --- Units ---
        handlers::units::list_units,
        handlers::units::get_unit,
        handlers::units::create_unit,
        handlers::units::update_unit,
        handlers::units::delete_unit,
        handlers::units::unit_profitability,

        // --- Tenants ---
        handlers::tenants::list_tenants,
        handlers::tenants::get_tenant,
        handlers::tenants::create_tenant,
        handlers::tenants::update_tenant,
        handlers::tenants::delete_tenant,

        // --- Leases ---
        handlers::leases::list_leases,
        handlers::leases::get_lease,
        handlers::leases::create_lease,
        handlers::leases::update_lease,
        handlers::leases::delete_lease,

        // --- Mandatory / Actual payments ---
        handlers::payments::list_mandatory_payments,
        handlers::payments::get_mandatory_payment,
        handlers::payments::create_mandatory_payment,
        handlers::payments::update_mandatory_payment,
        handlers::payments::delete_mandatory_payment,
        handlers::payments::list_plan_actuals,
        handlers::payments::list_actual_payments,
        handlers::payments::upsert_actual_payment,
        handlers::payments::update_actual_payment,
        handlers::payments::mark_actual_payment_paid,

        // --- Tenant payments ---
        handlers::tenant_payments::list_tenant_payments,
        handlers::tenant_payments::upsert_tenant_payment,
        handlers::tenant_payments::update_tenant_payment,
        handlers::tenant_payments::mark_tenant_payment_paid,
        handlers::tenant_payments::generate_monthly_payments,

        // --- Transactions ---
        handlers::transactions::list_transactions,
        handlers::transactions::payment_calendar,
        handlers::transactions::list_planned_transactions,
        handlers::transactions::list_actual_transactions,
        handlers::transactions::get_transaction,
        handlers::transactions::create_transaction,
        handlers::transactions::update_transaction,
        handlers::transactions::delete_transaction,

        // --- Invoices ---
        handlers::invoices::generate_invoice,
        handlers::invoices::download_invoice_pdf,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
        handlers::dashboard::get_monthly_chart,
        handlers::dashboard::get_unit_forecasts,
        handlers::dashboard::get_debts,
    ),
    components(
        schemas(
            common::numeric::Numeric,

            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Properties ---
            models::property::Property,
            models::property::PropertyWithStats,
            models::property::CreatePropertyPayload,
            models::property::UpdatePropertyPayload,
            models::property::DocumentType,
            models::property::PropertyDocument,
            models::property::PropertyDocumentContent,
            models::property::UploadDocumentPayload,

            // --- Units ---
            models::unit::UnitStatus,
            models::unit::Unit,
            models::unit::UnitDetail,
            models::unit::CreateUnitPayload,
            models::unit::UpdateUnitPayload,
            models::unit::ProfitabilityFigures,
            models::unit::UnitProfitability,

            // --- Tenants ---
            models::tenant::Tenant,
            models::tenant::TenantSummary,
            models::tenant::TenantLease,
            models::tenant::TenantDetail,
            models::tenant::CreateTenantPayload,
            models::tenant::UpdateTenantPayload,

            // --- Leases ---
            models::lease::LeaseStatus,
            models::lease::Lease,
            models::lease::LeaseSummary,
            models::lease::LeaseDetail,
            models::lease::CreateLeasePayload,
            models::lease::UpdateLeasePayload,

            // --- Payments ---
            models::payment::Frequency,
            models::payment::ActualPaymentStatus,
            models::payment::MandatoryPayment,
            models::payment::MandatoryPaymentSummary,
            models::payment::CreateMandatoryPaymentPayload,
            models::payment::UpdateMandatoryPaymentPayload,
            models::payment::ActualMandatoryPayment,
            models::payment::UpsertActualPaymentPayload,
            models::payment::UpdateActualPaymentPayload,
            models::payment::MarkPaidPayload,

            // --- Tenant payments ---
            models::tenant_payment::TenantPaymentStatus,
            models::tenant_payment::TenantPayment,
            models::tenant_payment::TenantPaymentSummary,
            models::tenant_payment::UpsertTenantPaymentPayload,
            models::tenant_payment::UpdateTenantPaymentPayload,
            models::tenant_payment::GenerateMonthlyPayload,
            models::tenant_payment::GenerateMonthlyResponse,

            // --- Transactions ---
            models::transaction::TransactionType,
            models::transaction::PaymentStatus,
            models::transaction::Transaction,
            models::transaction::TransactionSummary,
            models::transaction::CreateTransactionPayload,
            models::transaction::UpdateTransactionPayload,
            models::transaction::CalendarType,
            models::transaction::CalendarEntry,
            models::transaction::PaymentCalendar,

            // --- Invoices ---
            models::invoice::GenerateInvoicePayload,
            models::invoice::InvoiceDocument,
            models::invoice::GenerateInvoiceResponse,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::MonthlyChartEntry,
            models::dashboard::UnitForecast,
            models::dashboard::TenantDebt,
            models::dashboard::DebtReport,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Health", description = "Verificação do serviço"),
        (name = "Properties", description = "Imóveis, suas unidades e documentos"),
        (name = "Units", description = "Unidades locáveis e rentabilidade"),
        (name = "Tenants", description = "Inquilinos"),
        (name = "Leases", description = "Contratos de locação"),
        (name = "Mandatory Payments", description = "Custos recorrentes planejados"),
        (name = "Actual Payments", description = "Instâncias mensais dos custos recorrentes"),
        (name = "Tenant Payments", description = "Aluguéis esperados e recebidos"),
        (name = "Transactions", description = "Receitas, despesas e calendário de pagamentos"),
        (name = "Invoices", description = "Faturas de aluguel em HTML e PDF"),
        (name = "Dashboard", description = "Indicadores e Gráficos Gerenciais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_resource_and_the_jwt_scheme() {
        let doc = ApiDoc::openapi();

        for path in [
            "/api/auth/register",
            "/api/properties/{id}/documents/{doc_id}",
            "/api/units/{id}/profitability",
            "/api/tenant-payments/generate-monthly",
            "/api/transactions/calendar",
            "/api/invoices/{lease_id}/pdf",
            "/api/dashboard/debts",
        ] {
            assert!(doc.paths.paths.contains_key(path), "faltando {path}");
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
    }
}

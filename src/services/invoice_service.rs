// src/services/invoice_service.rs

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use genpdf::{elements, style, Alignment, Element};
use sqlx::{Executor, Sqlite};

use crate::{
    common::{
        error::{AppError, Resource},
        i18n::I18nStore,
        numeric::Numeric,
    },
    db::{LeaseRepository, PropertyRepository, TenantRepository, UnitRepository},
    models::{
        invoice::{CompanyInfo, GenerateInvoiceResponse, InvoiceData, InvoiceDocument},
        lease::LeaseStatus,
    },
};

const DUE_IN_DAYS: i64 = 14;
const DATE_FORMAT: &str = "%d.%m.%Y";

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn money(amount: Numeric, symbol: &str) -> String {
    format!("{:.2} {}", amount.inner(), symbol)
}

/// Período padrão: nome do mês no idioma pedido e ano.
pub fn default_period(store: &I18nStore, lang: &str, today: NaiveDate) -> String {
    format!("{} {}", store.month_name(lang, today.month()), today.year())
}

/// Fatura em HTML; todo valor variável é escapado.
pub fn render_html(data: &InvoiceData, store: &I18nStore, lang: &str) -> String {
    let t = |key: &str| escape_html(&store.translate(lang, key));
    let lease = data.lease_id.to_string();
    let amount = escape_html(&money(data.amount, &data.company.currency_symbol));

    let mut payer = format!("<p><strong>{}</strong></p>", escape_html(&data.tenant_name));
    if let Some(tax_id) = &data.tenant_tax_id {
        payer.push_str(&format!("<p>{}: {}</p>", t("invoice.tax_id"), escape_html(tax_id)));
    }
    if let Some(email) = &data.tenant_email {
        payer.push_str(&format!("<p>{}: {}</p>", t("invoice.email"), escape_html(email)));
    }
    if let Some(phone) = &data.tenant_phone {
        payer.push_str(&format!("<p>{}: {}</p>", t("invoice.phone"), escape_html(phone)));
    }

    let mut recipient = format!("<p>{}: {}</p>", t("invoice.recipient"), escape_html(&data.company.name));
    if let Some(tax_id) = &data.company.tax_id {
        recipient.push_str(&format!("<p>{}: {}</p>", t("invoice.tax_id"), escape_html(tax_id)));
    }
    if let Some(address) = &data.company.address {
        recipient.push_str(&format!("<p>{}: {}</p>", t("invoice.address"), escape_html(address)));
    }

    let item = store.format(
        lang,
        "invoice.rent_item",
        &[("unit", data.unit_number.as_str()), ("property", data.property_name.as_str())],
    );
    let purpose = store.format(lang, "invoice.purpose", &[("period", data.period.as_str()), ("lease", lease.as_str())]);
    let basis = store.format(lang, "invoice.basis_text", &[("lease", lease.as_str())]);

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<title>{title} {number}</title>
<style>
  body {{ font-family: Arial, sans-serif; color: #222; max-width: 800px; margin: 0 auto; padding: 24px; }}
  h1 {{ color: #00311F; margin-bottom: 4px; }}
  .meta {{ text-align: right; color: #555; }}
  table {{ width: 100%; border-collapse: collapse; margin-top: 16px; }}
  th, td {{ border: 1px solid #ccc; padding: 8px; text-align: left; }}
  .total {{ text-align: right; font-size: 18px; font-weight: bold; margin-top: 16px; }}
</style>
</head>
<body>
<h1>{company}</h1>
<h2>{title} № {number}</h2>
<div class="meta">
  <div>{date_label}: {date}</div>
  <div>{due_label}: {due_date}</div>
</div>
<h3>{payer_label}</h3>
{payer}
<h3>{basis_label}</h3>
<p>{basis}</p>
<table>
  <tr><th>{item_label}</th><th>{period_label}</th><th>{amount_label}</th></tr>
  <tr><td>{item}</td><td>{period}</td><td>{amount}</td></tr>
</table>
<div class="total">{total_label}: {amount}</div>
<h3>{details_label}</h3>
{recipient}
<p>{purpose}</p>
</body>
</html>
"#,
        lang = escape_html(lang),
        title = t("invoice.title"),
        number = escape_html(&data.number),
        company = escape_html(&data.company.name),
        date_label = t("invoice.date"),
        date = data.date.format(DATE_FORMAT),
        due_label = t("invoice.due_date"),
        due_date = data.due_date.format(DATE_FORMAT),
        payer_label = t("invoice.payer"),
        payer = payer,
        basis_label = t("invoice.basis"),
        basis = escape_html(&basis),
        item_label = t("invoice.item"),
        period_label = t("invoice.period"),
        amount_label = t("invoice.amount"),
        item = escape_html(&item),
        period = escape_html(&data.period),
        amount = amount,
        total_label = t("invoice.total"),
        details_label = t("invoice.payment_details"),
        recipient = recipient,
        purpose = escape_html(&purpose),
    )
}

#[derive(Clone)]
pub struct InvoiceService {
    lease_repo: LeaseRepository,
    unit_repo: UnitRepository,
    tenant_repo: TenantRepository,
    property_repo: PropertyRepository,
    company: CompanyInfo,
    fonts_dir: String,
    font_family: String,
}

impl InvoiceService {
    pub fn new(
        lease_repo: LeaseRepository,
        unit_repo: UnitRepository,
        tenant_repo: TenantRepository,
        property_repo: PropertyRepository,
        company: CompanyInfo,
        fonts_dir: String,
        font_family: String,
    ) -> Self {
        Self { lease_repo, unit_repo, tenant_repo, property_repo, company, fonts_dir, font_family }
    }

    /// Resolve contrato, inquilino, unidade e imóvel; o contrato precisa estar ativo.
    pub async fn prepare<'e, E>(
        &self,
        executor: E,
        lease_id: i64,
        period: Option<String>,
        store: &I18nStore,
        lang: &str,
    ) -> Result<InvoiceData, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        let lease = self.lease_repo
            .find_by_id(executor, lease_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Lease))?;
        if lease.status != LeaseStatus::Active {
            return Err(AppError::LeaseNotActive);
        }

        let tenant = self.tenant_repo
            .find_by_id(executor, lease.tenant_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Tenant))?;
        let unit = self.unit_repo
            .find_by_id(executor, lease.unit_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Unit))?;
        let property = self.property_repo
            .find_by_id(executor, unit.property_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Property))?;

        let now = Utc::now();
        let today = now.date_naive();
        let period = period
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| default_period(store, lang, today));

        Ok(InvoiceData {
            number: format!("INV-{}-{}", lease.id, now.timestamp_millis()),
            lease_id: lease.id,
            date: today,
            due_date: today + Duration::days(DUE_IN_DAYS),
            period,
            tenant_name: tenant.name,
            tenant_email: tenant.email,
            tenant_phone: tenant.phone,
            tenant_tax_id: tenant.tax_id,
            unit_number: unit.unit_number,
            property_name: property.name,
            amount: lease.monthly_rent,
            company: self.company.clone(),
        })
    }

    pub fn render_pdf(&self, data: &InvoiceData, store: &I18nStore, lang: &str) -> Result<Vec<u8>, AppError> {
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, &self.font_family, None).map_err(|_| {
            AppError::FontNotFound(format!("{} em {}", self.font_family, self.fonts_dir))
        })?;

        let t = |key: &str| store.translate(lang, key);
        let lease = data.lease_id.to_string();
        let symbol = &data.company.currency_symbol;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("{} {}", t("invoice.title"), data.number));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(elements::Paragraph::new(data.company.name.clone()).styled(style::Style::new().bold().with_font_size(18)));
        if let Some(tax_id) = &data.company.tax_id {
            doc.push(
                elements::Paragraph::new(format!("{}: {}", t("invoice.tax_id"), tax_id))
                    .styled(style::Style::new().with_font_size(10)),
            );
        }
        doc.push(elements::Break::new(1.5));

        doc.push(
            elements::Paragraph::new(format!("{} № {}", t("invoice.title"), data.number))
                .styled(style::Style::new().bold().with_font_size(14)),
        );
        let mut dates = elements::Paragraph::new(format!(
            "{}: {}   {}: {}",
            t("invoice.date"),
            data.date.format(DATE_FORMAT),
            t("invoice.due_date"),
            data.due_date.format(DATE_FORMAT)
        ));
        dates.set_alignment(Alignment::Right);
        doc.push(dates);
        doc.push(elements::Break::new(1));

        // --- PAGADOR E REFERÊNCIA ---
        doc.push(elements::Paragraph::new(t("invoice.payer")).styled(style::Style::new().bold().with_font_size(12)));
        doc.push(elements::Paragraph::new(data.tenant_name.clone()));
        if let Some(tax_id) = &data.tenant_tax_id {
            doc.push(elements::Paragraph::new(format!("{}: {}", t("invoice.tax_id"), tax_id)));
        }
        if let Some(email) = &data.tenant_email {
            doc.push(elements::Paragraph::new(format!("{}: {}", t("invoice.email"), email)));
        }
        if let Some(phone) = &data.tenant_phone {
            doc.push(elements::Paragraph::new(format!("{}: {}", t("invoice.phone"), phone)));
        }
        doc.push(elements::Break::new(1));
        doc.push(elements::Paragraph::new(t("invoice.basis")).styled(style::Style::new().bold().with_font_size(12)));
        doc.push(elements::Paragraph::new(store.format(lang, "invoice.basis_text", &[("lease", lease.as_str())])));
        doc.push(elements::Break::new(1.5));

        // --- TABELA ---
        // Pesos das colunas: Descrição (4), Período (2), Valor (2)
        let mut table = elements::TableLayout::new(vec![4, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new(t("invoice.item")).styled(bold))
            .element(elements::Paragraph::new(t("invoice.period")).styled(bold))
            .element(elements::Paragraph::new(t("invoice.amount")).styled(bold))
            .push()?;
        table
            .row()
            .element(elements::Paragraph::new(store.format(
                lang,
                "invoice.rent_item",
                &[("unit", data.unit_number.as_str()), ("property", data.property_name.as_str())],
            )))
            .element(elements::Paragraph::new(data.period.clone()))
            .element(elements::Paragraph::new(money(data.amount, symbol)))
            .push()?;
        doc.push(table);
        doc.push(elements::Break::new(1.5));

        let mut total = elements::Paragraph::new(format!("{}: {}", t("invoice.total"), money(data.amount, symbol)));
        total.set_alignment(Alignment::Right);
        doc.push(total.styled(style::Style::new().bold().with_font_size(12)));
        doc.push(elements::Break::new(2));

        // --- DADOS PARA PAGAMENTO ---
        doc.push(
            elements::Paragraph::new(t("invoice.payment_details")).styled(style::Style::new().bold().with_font_size(12)),
        );
        doc.push(elements::Paragraph::new(format!("{}: {}", t("invoice.recipient"), data.company.name)));
        if let Some(address) = &data.company.address {
            doc.push(elements::Paragraph::new(format!("{}: {}", t("invoice.address"), address)));
        }
        doc.push(
            elements::Paragraph::new(store.format(
                lang,
                "invoice.purpose",
                &[("period", data.period.as_str()), ("lease", lease.as_str())],
            ))
            .styled(style::Style::new().italic().with_font_size(9)),
        );

        let mut buffer = Vec::new();
        doc.render(&mut buffer)?;
        Ok(buffer)
    }

    /// Gera HTML e PDF (base64) de uma fatura de aluguel.
    pub async fn generate<'e, E>(
        &self,
        executor: E,
        lease_id: i64,
        period: Option<String>,
        store: &I18nStore,
        lang: &str,
    ) -> Result<GenerateInvoiceResponse, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        let data = self.prepare(executor, lease_id, period, store, lang).await?;
        let html = render_html(&data, store, lang);
        let pdf = self.render_pdf(&data, store, lang)?;

        tracing::info!("🧾 Fatura {} gerada para o contrato {}", data.number, data.lease_id);

        Ok(GenerateInvoiceResponse {
            success: true,
            invoice: InvoiceDocument {
                number: data.number,
                date: data.date,
                due_date: data.due_date,
                html,
                pdf: STANDARD.encode(pdf),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InvoiceData {
        let date = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        InvoiceData {
            number: "INV-3-1".into(),
            lease_id: 3,
            date,
            due_date: date + Duration::days(DUE_IN_DAYS),
            period: "October 2025".into(),
            tenant_name: "<Acme & Co>".into(),
            tenant_email: Some("acme@example.com".into()),
            tenant_phone: None,
            tenant_tax_id: None,
            unit_number: "101".into(),
            property_name: "BC".into(),
            amount: Numeric::from(45000),
            company: CompanyInfo {
                name: "ERP".into(),
                address: None,
                tax_id: Some("123".into()),
                currency_symbol: "₽".into(),
            },
        }
    }

    #[test]
    fn html_escapes_values_and_formats_dates() {
        let store = I18nStore::new();
        let html = render_html(&sample(), &store, "en");

        assert!(html.contains("&lt;Acme &amp; Co&gt;"));
        assert!(!html.contains("<Acme"));
        assert!(html.contains("01.10.2025"));
        assert!(html.contains("15.10.2025"));
        assert!(html.contains("45000.00 ₽"));
        assert!(html.contains("INV-3-1"));
    }

    #[test]
    fn default_period_uses_localized_month() {
        let store = I18nStore::new();
        let today = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();
        assert_eq!(default_period(&store, "en", today), "March 2025");
    }

    #[test]
    fn missing_fonts_are_reported() {
        let service = InvoiceService::new(
            LeaseRepository::new(),
            UnitRepository::new(),
            TenantRepository::new(),
            PropertyRepository::new(),
            sample().company,
            "/nonexistent-fonts".into(),
            "NoSuchFont".into(),
        );
        let result = service.render_pdf(&sample(), &I18nStore::new(), "en");
        assert!(matches!(result, Err(AppError::FontNotFound(_))));
    }
}

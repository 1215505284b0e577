// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "en";
pub const SUPPORTED_LANGS: [&str; 3] = ["en", "pt", "ru"];

// (chave, inglês, português, russo)
const MESSAGES: &[(&str, &str, &str, &str)] = &[
    // --- Erros genéricos ---
    ("validation_failed", "One or more fields are invalid.", "Um ou mais campos são inválidos.", "Одно или несколько полей заполнены неверно."),
    ("invalid_body", "Invalid request body: {detail}", "Corpo da requisição inválido: {detail}", "Некорректное тело запроса: {detail}"),
    ("not_found", "{resource} not found", "{resource} não encontrado(a)", "{resource}: не найдено"),
    ("route_not_found", "Not Found", "Rota não encontrada", "Маршрут не найден"),
    ("internal_error", "An unexpected error occurred.", "Ocorreu um erro inesperado.", "Произошла непредвиденная ошибка."),
    // --- Regras de negócio ---
    ("unit_not_vacant", "Unit is not vacant", "A unidade não está livre", "Помещение не свободно"),
    ("tenant_has_active_leases", "Cannot delete tenant with active leases", "Não é possível excluir um inquilino com contratos ativos", "Нельзя удалить арендатора с активными договорами"),
    ("lease_not_active", "Invoices can only be generated for active leases", "Faturas só podem ser geradas para contratos ativos", "Счёт можно выставить только по активному договору"),
    ("payment_target_required", "Either unit_id or property_id is required", "Informe unit_id ou property_id", "Требуется unit_id или property_id"),
    ("deferred_requires_date", "Deferred transactions require scheduled_pay_date", "Transações adiadas exigem scheduled_pay_date", "Для отложенной операции нужна scheduled_pay_date"),
    ("invalid_document_type", "Document type must be 'plan' or 'document'", "O tipo do documento deve ser 'plan' ou 'document'", "Тип документа должен быть 'plan' или 'document'"),
    ("invalid_base64", "Document content must be base64", "O conteúdo do documento deve estar em base64", "Содержимое документа должно быть в base64"),
    // --- Autenticação ---
    ("email_already_exists", "A user with this email already exists", "Este e-mail já está em uso.", "Пользователь с таким email уже существует"),
    ("invalid_credentials", "Invalid email or password", "E-mail ou senha inválidos.", "Неверный email или пароль"),
    ("invalid_token", "Invalid or missing authentication token", "Token de autenticação inválido ou ausente.", "Недействительный или отсутствующий токен"),
    // --- Mensagens de validação de campo ---
    ("required", "This field is required", "Campo obrigatório", "Обязательное поле"),
    ("invalid_email", "Invalid email address", "E-mail inválido", "Некорректный email"),
    ("too_short", "Value is too short", "Valor muito curto", "Слишком короткое значение"),
    ("non_negative", "Value cannot be negative", "O valor não pode ser negativo", "Значение не может быть отрицательным"),
    ("out_of_range", "Value is out of range", "Valor fora do intervalo", "Значение вне допустимого диапазона"),
    // --- Nomes de recursos ---
    ("resource.user", "User", "Usuário", "Пользователь"),
    ("resource.property", "Property", "Imóvel", "Объект"),
    ("resource.unit", "Unit", "Unidade", "Помещение"),
    ("resource.tenant", "Tenant", "Inquilino", "Арендатор"),
    ("resource.lease", "Lease", "Contrato", "Договор"),
    ("resource.mandatory_payment", "Mandatory payment", "Pagamento obrigatório", "Обязательный платёж"),
    ("resource.actual_mandatory_payment", "Actual mandatory payment", "Pagamento obrigatório efetivo", "Фактический обязательный платёж"),
    ("resource.tenant_payment", "Tenant payment", "Pagamento do inquilino", "Платёж арендатора"),
    ("resource.transaction", "Transaction", "Transação", "Операция"),
    ("resource.document", "Document", "Documento", "Документ"),
    // --- Fatura ---
    ("invoice.title", "Invoice", "Fatura", "Счёт на оплату"),
    ("invoice.date", "Date", "Data", "Дата"),
    ("invoice.due_date", "Due date", "Vencimento", "Оплатить до"),
    ("invoice.payer", "Payer", "Pagador", "Плательщик"),
    ("invoice.email", "Email", "E-mail", "Email"),
    ("invoice.phone", "Phone", "Telefone", "Телефон"),
    ("invoice.tax_id", "Tax ID", "CNPJ/CPF", "ИНН"),
    ("invoice.basis", "Basis", "Referência", "Основание"),
    ("invoice.basis_text", "Lease agreement #{lease}", "Contrato de locação nº {lease}", "Договор аренды № {lease}"),
    ("invoice.item", "Description", "Descrição", "Наименование"),
    ("invoice.period", "Period", "Período", "Период"),
    ("invoice.amount", "Amount", "Valor", "Сумма"),
    ("invoice.rent_item", "Rent of premises {unit}, {property}", "Aluguel da unidade {unit}, {property}", "Аренда помещения {unit}, {property}"),
    ("invoice.total", "Total due", "Total a pagar", "Итого к оплате"),
    ("invoice.payment_details", "Payment details", "Dados para pagamento", "Реквизиты для оплаты"),
    ("invoice.recipient", "Recipient", "Favorecido", "Получатель"),
    ("invoice.address", "Address", "Endereço", "Адрес"),
    ("invoice.purpose", "Payment purpose: rent for {period} under lease #{lease}", "Finalidade: aluguel de {period} referente ao contrato nº {lease}", "Назначение платежа: аренда за {period} по договору № {lease}"),
];

const MONTHS: [[&str; 12]; 3] = [
    ["January", "February", "March", "April", "May", "June", "July", "August", "September", "October", "November", "December"],
    ["janeiro", "fevereiro", "março", "abril", "maio", "junho", "julho", "agosto", "setembro", "outubro", "novembro", "dezembro"],
    ["январь", "февраль", "март", "апрель", "май", "июнь", "июль", "август", "сентябрь", "октябрь", "ноябрь", "декабрь"],
];

/// Catálogo de mensagens traduzidas, carregado uma vez e compartilhado no AppState.
pub struct I18nStore {
    messages: HashMap<&'static str, [&'static str; 3]>,
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

impl I18nStore {
    pub fn new() -> Self {
        let messages = MESSAGES
            .iter()
            .map(|(key, en, pt, ru)| (*key, [*en, *pt, *ru]))
            .collect();
        Self { messages }
    }

    fn lang_index(lang: &str) -> usize {
        SUPPORTED_LANGS.iter().position(|l| *l == lang).unwrap_or(0)
    }

    /// Traduz a chave; chaves desconhecidas voltam como estão.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.messages
            .get(key)
            .map(|variants| variants[Self::lang_index(lang)].to_string())
            .unwrap_or_else(|| key.to_string())
    }

    /// Traduz e substitui os marcadores `{nome}`.
    pub fn format(&self, lang: &str, key: &str, args: &[(&str, &str)]) -> String {
        args.iter().fold(self.translate(lang, key), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
    }

    pub fn month_name(&self, lang: &str, month: u32) -> String {
        let idx = (month.clamp(1, 12) - 1) as usize;
        MONTHS[Self::lang_index(lang)][idx].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_english_and_to_the_key() {
        let store = I18nStore::new();
        assert_eq!(store.translate("de", "unit_not_vacant"), "Unit is not vacant");
        assert_eq!(store.translate("pt", "unknown.key"), "unknown.key");
    }

    #[test]
    fn replaces_placeholders() {
        let store = I18nStore::new();
        let text = store.format("en", "not_found", &[("resource", "Lease")]);
        assert_eq!(text, "Lease not found");
        assert_eq!(store.month_name("ru", 10), "октябрь");
    }
}

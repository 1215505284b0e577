// src/models/property.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::{numeric::Numeric, patch::double_option};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Property {
    pub id: i64,
    #[schema(example = "БЦ Квадрат")]
    pub name: String,
    #[schema(example = "ул. Ленина, 1")]
    pub address: Option<String>,
    pub total_area: Option<Numeric>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Imóvel com as estatísticas calculadas sobre as unidades.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PropertyWithStats {
    #[serde(flatten)]
    pub property: Property,
    pub units_count: i64,
    pub occupied_units: i64,
    // Soma do aluguel das unidades alugadas
    pub monthly_revenue: Numeric,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePropertyPayload {
    #[validate(required(message = "required"))]
    pub name: Option<String>,
    pub address: Option<String>,
    pub total_area: Option<Numeric>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePropertyPayload {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub total_area: Option<Option<Numeric>>,
}

// --- Documentos do imóvel ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Plan,     // Planta
    Document, // Documento
}

impl DocumentType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "plan" => Some(DocumentType::Plan),
            "document" => Some(DocumentType::Document),
            _ => None,
        }
    }
}

/// Metadados (sem o conteúdo) de um documento.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct PropertyDocument {
    pub id: i64,
    pub property_id: i64,
    #[schema(example = "Planta do 2º andar")]
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    #[schema(example = "floor-2.pdf")]
    pub file_name: String,
    #[schema(example = "application/pdf")]
    pub mime_type: Option<String>,
    // Tamanho em bytes do conteúdo decodificado
    pub size: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Documento com o conteúdo em base64 (só no download individual).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct PropertyDocumentContent {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub document: PropertyDocument,
    pub content: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UploadDocumentPayload {
    #[validate(required(message = "required"))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[validate(required(message = "required"))]
    pub doc_type: Option<String>,
    #[validate(required(message = "required"))]
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    // Conteúdo em base64
    #[validate(required(message = "required"))]
    pub content: Option<String>,
}

// src/services/property_service.rs

use base64::{engine::general_purpose::STANDARD, Engine};
use sqlx::{Executor, Sqlite};

use crate::{
    common::{
        error::{required_text, AppError, Resource},
        numeric::Numeric,
        patch::{blank_to_none, merge_nullable, merge_text},
    },
    db::{PropertyRepository, UnitRepository},
    models::{
        property::{
            CreatePropertyPayload, DocumentType, Property, PropertyDocument, PropertyDocumentContent,
            PropertyWithStats, UpdatePropertyPayload, UploadDocumentPayload,
        },
        unit::{Unit, UnitDetail, UnitStatus},
    },
};

/// Estatísticas de um imóvel a partir das suas unidades.
pub fn with_stats(property: Property, units: &[Unit]) -> PropertyWithStats {
    let own: Vec<&Unit> = units.iter().filter(|u| u.property_id == property.id).collect();
    let rented: Vec<&&Unit> = own.iter().filter(|u| u.status == UnitStatus::Rented).collect();

    PropertyWithStats {
        units_count: own.len() as i64,
        occupied_units: rented.len() as i64,
        monthly_revenue: rented.iter().map(|u| u.monthly_rent).sum(),
        property,
    }
}

#[derive(Clone)]
pub struct PropertyService {
    repo: PropertyRepository,
    unit_repo: UnitRepository,
}

impl PropertyService {
    pub fn new(repo: PropertyRepository, unit_repo: UnitRepository) -> Self {
        Self { repo, unit_repo }
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<PropertyWithStats>, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        let properties = self.repo.list(executor).await?;
        let units = self.unit_repo.list_plain(executor).await?;

        Ok(properties.into_iter().map(|p| with_stats(p, &units)).collect())
    }

    pub async fn get<'e, E>(&self, executor: E, id: i64) -> Result<PropertyWithStats, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        let property = self.find(executor, id).await?;
        let units = self.unit_repo.list_plain(executor).await?;
        Ok(with_stats(property, &units))
    }

    pub async fn create<'e, E>(&self, executor: E, payload: CreatePropertyPayload) -> Result<Property, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let name = required_text("name", payload.name.as_deref())?;
        let address = blank_to_none(payload.address);

        self.repo.create(executor, &name, address.as_deref(), payload.total_area).await
    }

    pub async fn update<'e, E>(&self, executor: E, id: i64, payload: UpdatePropertyPayload) -> Result<Property, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        let mut property = self.find(executor, id).await?;

        if let Some(name) = payload.name.as_deref() {
            property.name = required_text("name", Some(name))?;
        }
        property.address = merge_text(property.address, payload.address);
        property.total_area = merge_nullable(property.total_area, payload.total_area);

        self.repo
            .update(executor, &property)
            .await?
            .ok_or(AppError::NotFound(Resource::Property))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if !self.repo.delete(executor, id).await? {
            return Err(AppError::NotFound(Resource::Property));
        }
        Ok(())
    }

    pub async fn list_units<'e, E>(&self, executor: E, id: i64) -> Result<Vec<UnitDetail>, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        self.find(executor, id).await?;
        self.unit_repo.list(executor, Some(id)).await
    }

    // =========================================================================
    //  DOCUMENTOS
    // =========================================================================

    pub async fn list_documents<'e, E>(&self, executor: E, property_id: i64) -> Result<Vec<PropertyDocument>, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        self.find(executor, property_id).await?;
        self.repo.list_documents(executor, property_id).await
    }

    pub async fn get_document<'e, E>(
        &self,
        executor: E,
        property_id: i64,
        document_id: i64,
    ) -> Result<PropertyDocumentContent, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        self.find(executor, property_id).await?;
        self.repo
            .find_document(executor, property_id, document_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Document))
    }

    pub async fn upload_document<'e, E>(
        &self,
        executor: E,
        property_id: i64,
        payload: UploadDocumentPayload,
    ) -> Result<PropertyDocument, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        self.find(executor, property_id).await?;

        let name = required_text("name", payload.name.as_deref())?;
        let file_name = required_text("file_name", payload.file_name.as_deref())?;
        let raw_type = required_text("type", payload.doc_type.as_deref())?;
        let content = required_text("content", payload.content.as_deref())?;

        let doc_type = DocumentType::parse(&raw_type).ok_or(AppError::BadRequest("invalid_document_type"))?;
        let size = decoded_size(&content)?;
        let mime_type = blank_to_none(payload.mime_type);

        let document = self.repo
            .create_document(executor, property_id, &name, doc_type, &file_name, mime_type.as_deref(), size, &content)
            .await?;

        tracing::info!("📎 Documento {} anexado ao imóvel {} ({} bytes)", document.id, property_id, size);
        Ok(document)
    }

    pub async fn delete_document<'e, E>(&self, executor: E, property_id: i64, document_id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        self.find(executor, property_id).await?;
        if !self.repo.delete_document(executor, property_id, document_id).await? {
            return Err(AppError::NotFound(Resource::Document));
        }
        Ok(())
    }

    async fn find<'e, E>(&self, executor: E, id: i64) -> Result<Property, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo
            .find_by_id(executor, id)
            .await?
            .ok_or(AppError::NotFound(Resource::Property))
    }
}

/// Tamanho em bytes do conteúdo base64 decodificado.
fn decoded_size(content: &str) -> Result<i64, AppError> {
    // Aceita data URLs ("data:...;base64,")
    let encoded = content.split_once(";base64,").map(|(_, data)| data).unwrap_or(content);
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AppError::BadRequest("invalid_base64"))?;
    Ok(bytes.len() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn property(id: i64) -> Property {
        Property {
            id,
            name: format!("P{id}"),
            address: None,
            total_area: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn unit(property_id: i64, status: UnitStatus, rent: i64) -> Unit {
        Unit {
            id: 0,
            property_id,
            unit_number: "1".into(),
            area: Numeric::from(10),
            price_per_sqm: Numeric::from(rent / 10),
            monthly_rent: Numeric::from(rent),
            status,
            category: None,
            current_tenant_id: None,
            current_tenant_name: None,
            current_lease_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn stats_count_only_rented_units_as_revenue() {
        let units = vec![
            unit(1, UnitStatus::Rented, 1000),
            unit(1, UnitStatus::Vacant, 500),
            unit(1, UnitStatus::Rented, 250),
            unit(2, UnitStatus::Rented, 9999),
        ];
        let stats = with_stats(property(1), &units);
        assert_eq!(stats.units_count, 3);
        assert_eq!(stats.occupied_units, 2);
        assert_eq!(stats.monthly_revenue, Numeric::from(1250));
    }

    #[test]
    fn decoded_size_counts_bytes() {
        assert_eq!(decoded_size("aGVsbG8=").unwrap(), 5);
        assert_eq!(decoded_size("data:text/plain;base64,aGVsbG8=").unwrap(), 5);
        assert!(matches!(decoded_size("***"), Err(AppError::BadRequest("invalid_base64"))));
    }
}

// src/db/property_repo.rs

use chrono::Utc;
use sqlx::{Executor, Sqlite};

use crate::{
    common::{error::AppError, numeric::Numeric},
    models::property::{DocumentType, Property, PropertyDocument, PropertyDocumentContent},
};

const DOCUMENT_COLUMNS: &str =
    "id, property_id, name, doc_type, file_name, mime_type, size, created_at, updated_at";

#[derive(Clone, Default)]
pub struct PropertyRepository;

impl PropertyRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  IMÓVEIS
    // =========================================================================

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<Property>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let properties = sqlx::query_as::<_, Property>(
            "SELECT * FROM properties ORDER BY created_at DESC, id DESC",
        )
            .fetch_all(executor)
            .await?;
        Ok(properties)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Property>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let property = sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(property)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        address: Option<&str>,
        total_area: Option<Numeric>,
    ) -> Result<Property, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        let property = sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (name, address, total_area, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
            .bind(name)
            .bind(address)
            .bind(total_area)
            .bind(now)
            .bind(now)
            .fetch_one(executor)
            .await?;
        Ok(property)
    }

    /// Grava o estado completo (já mesclado pelo serviço).
    pub async fn update<'e, E>(&self, executor: E, property: &Property) -> Result<Option<Property>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let updated = sqlx::query_as::<_, Property>(
            r#"
            UPDATE properties
            SET name = ?, address = ?, total_area = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
            .bind(&property.name)
            .bind(&property.address)
            .bind(property.total_area)
            .bind(Utc::now())
            .bind(property.id)
            .fetch_optional(executor)
            .await?;
        Ok(updated)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM properties WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  DOCUMENTOS
    // =========================================================================

    pub async fn list_documents<'e, E>(&self, executor: E, property_id: i64) -> Result<Vec<PropertyDocument>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM property_documents WHERE property_id = ? ORDER BY created_at DESC, id DESC"
        );
        let documents = sqlx::query_as::<_, PropertyDocument>(&sql)
            .bind(property_id)
            .fetch_all(executor)
            .await?;
        Ok(documents)
    }

    pub async fn find_document<'e, E>(
        &self,
        executor: E,
        property_id: i64,
        document_id: i64,
    ) -> Result<Option<PropertyDocumentContent>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let document = sqlx::query_as::<_, PropertyDocumentContent>(
            "SELECT * FROM property_documents WHERE id = ? AND property_id = ?",
        )
            .bind(document_id)
            .bind(property_id)
            .fetch_optional(executor)
            .await?;
        Ok(document)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_document<'e, E>(
        &self,
        executor: E,
        property_id: i64,
        name: &str,
        doc_type: DocumentType,
        file_name: &str,
        mime_type: Option<&str>,
        size: i64,
        content: &str,
    ) -> Result<PropertyDocument, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        let sql = format!(
            r#"
            INSERT INTO property_documents
                (property_id, name, doc_type, file_name, mime_type, size, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {DOCUMENT_COLUMNS}
            "#
        );
        let document = sqlx::query_as::<_, PropertyDocument>(&sql)
            .bind(property_id)
            .bind(name)
            .bind(doc_type)
            .bind(file_name)
            .bind(mime_type)
            .bind(size)
            .bind(content)
            .bind(now)
            .bind(now)
            .fetch_one(executor)
            .await?;
        Ok(document)
    }

    pub async fn delete_document<'e, E>(&self, executor: E, property_id: i64, document_id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM property_documents WHERE id = ? AND property_id = ?")
            .bind(document_id)
            .bind(property_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! SQLite implementation of the SecretStore.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_datetime, parse_uuid};
use crate::domain::errors::{CredentialError, CredentialResult};
use crate::domain::models::{ClientSecret, CredentialSet, Environment};
use crate::domain::ports::SecretStore;

pub struct SqliteSecretStore {
    pool: SqlitePool,
}

impl SqliteSecretStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SecretStore for SqliteSecretStore {
    async fn insert(&self, credential: &CredentialSet) -> CredentialResult<()> {
        sqlx::query(
            r#"INSERT INTO credential_sets (id, name, client_id, client_secret, environment, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#
        )
        .bind(credential.id.to_string())
        .bind(&credential.name)
        .bind(&credential.client_id)
        .bind(credential.client_secret.expose())
        .bind(credential.environment.as_str())
        .bind(credential.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> CredentialResult<Option<CredentialSet>> {
        let row: Option<CredentialRow> = sqlx::query_as(
            "SELECT id, name, client_id, client_secret, environment, created_at FROM credential_sets WHERE id = ?"
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self) -> CredentialResult<Vec<CredentialSet>> {
        let rows: Vec<CredentialRow> = sqlx::query_as(
            "SELECT id, name, client_id, client_secret, environment, created_at FROM credential_sets ORDER BY seq"
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn delete(&self, id: Uuid) -> CredentialResult<bool> {
        let result = sqlx::query("DELETE FROM credential_sets WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn load_active(&self) -> CredentialResult<Option<Uuid>> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT credential_id FROM active_credential WHERE slot = 1"
        )
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(id,)| parse_uuid(&id)).transpose()
    }

    async fn save_active(&self, id: Option<Uuid>) -> CredentialResult<()> {
        match id {
            Some(id) => {
                sqlx::query(
                    r#"INSERT INTO active_credential (slot, credential_id, updated_at) VALUES (1, ?, ?)
                       ON CONFLICT(slot) DO UPDATE SET credential_id = excluded.credential_id, updated_at = excluded.updated_at"#
                )
                .bind(id.to_string())
                .bind(Utc::now().to_rfc3339())
                .execute(&self.pool)
                .await?;
            }
            None => {
                sqlx::query("DELETE FROM active_credential WHERE slot = 1")
                    .execute(&self.pool)
                    .await?;
            }
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: String,
    name: String,
    client_id: String,
    client_secret: String,
    environment: String,
    created_at: String,
}

impl TryFrom<CredentialRow> for CredentialSet {
    type Error = CredentialError;

    fn try_from(row: CredentialRow) -> Result<Self, Self::Error> {
        let environment = Environment::from_str(&row.environment)
            .ok_or_else(|| CredentialError::Storage(format!("Invalid environment: {}", row.environment)))?;

        Ok(CredentialSet {
            id: parse_uuid(&row.id)?,
            name: row.name,
            client_id: row.client_id,
            client_secret: ClientSecret::new(row.client_secret),
            environment,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

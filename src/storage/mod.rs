pub mod db;
pub mod models;
mod portfolios;
mod postgrest;
mod tables;

pub use db::{Database, DatabaseError};
pub use postgrest::PostgrestTable;
pub use tables::*;

use async_trait::async_trait;
use thiserror::Error;

use models::{Portfolio, PortfolioFields, PortfolioSummary};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Row-level access to the portfolio table.
#[async_trait]
pub trait PortfolioStore: Send + Sync {
    /// Every row, ascending by rank.
    async fn list(&self) -> Result<Vec<Portfolio>, StoreError>;

    /// Summary columns of every row, ascending by rank.
    async fn list_summaries(&self) -> Result<Vec<PortfolioSummary>, StoreError> {
        let rows = self.list().await?;
        Ok(rows.iter().map(PortfolioSummary::from).collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Portfolio>, StoreError>;
    async fn insert(&self, fields: &PortfolioFields) -> Result<Portfolio, StoreError>;

    /// Overwrite the editable columns. `None` when no row has this id.
    async fn update(
        &self,
        id: i64,
        fields: &PortfolioFields,
    ) -> Result<Option<Portfolio>, StoreError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

#[async_trait]
impl PortfolioStore for Database {
    async fn list(&self) -> Result<Vec<Portfolio>, StoreError> {
        Ok(self.list_portfolios()?)
    }

    async fn get(&self, id: i64) -> Result<Option<Portfolio>, StoreError> {
        Ok(self.get_portfolio(id)?)
    }

    async fn insert(&self, fields: &PortfolioFields) -> Result<Portfolio, StoreError> {
        Ok(self.insert_portfolio(fields)?)
    }

    async fn update(
        &self,
        id: i64,
        fields: &PortfolioFields,
    ) -> Result<Option<Portfolio>, StoreError> {
        Ok(self.update_portfolio(id, fields)?)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.delete_portfolio(id)?)
    }
}

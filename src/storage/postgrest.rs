use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;

use super::models::{Portfolio, PortfolioFields, PortfolioSummary};
use super::{PortfolioStore, StoreError};
use crate::supabase::{failure_message, SupabaseClient};

const SUMMARY_COLUMNS: &str = "id,title,thumbnail,rank,time_to_develop,created_at,stack";
const RANK_ORDER: &str = "rank.asc,id.asc";

/// Portfolio table served by a Supabase PostgREST endpoint.
pub struct PostgrestTable {
    client: SupabaseClient,
    table: String,
}

impl PostgrestTable {
    pub fn new(client: SupabaseClient, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
        }
    }

    fn path(&self) -> String {
        format!("rest/v1/{}", self.table)
    }

    async fn rows<T: DeserializeOwned>(
        &self,
        what: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<T>, StoreError> {
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(StoreError::Backend(failure_message(what, resp).await));
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl PortfolioStore for PostgrestTable {
    async fn list(&self) -> Result<Vec<Portfolio>, StoreError> {
        let request = self
            .client
            .request(Method::GET, &self.path())
            .query(&[("select", "*"), ("order", RANK_ORDER)]);
        self.rows("Portfolio list", request).await
    }

    async fn list_summaries(&self) -> Result<Vec<PortfolioSummary>, StoreError> {
        let request = self
            .client
            .request(Method::GET, &self.path())
            .query(&[("select", SUMMARY_COLUMNS), ("order", RANK_ORDER)]);
        self.rows("Portfolio list", request).await
    }

    async fn get(&self, id: i64) -> Result<Option<Portfolio>, StoreError> {
        let request = self
            .client
            .request(Method::GET, &self.path())
            .query(&[("select", "*".to_string()), ("id", format!("eq.{id}"))]);
        let rows: Vec<Portfolio> = self.rows("Portfolio lookup", request).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert(&self, fields: &PortfolioFields) -> Result<Portfolio, StoreError> {
        let request = self
            .client
            .request(Method::POST, &self.path())
            .header("Prefer", "return=representation")
            .json(fields);
        let rows: Vec<Portfolio> = self.rows("Portfolio insert", request).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Backend("Portfolio insert returned no row".to_string()))
    }

    async fn update(
        &self,
        id: i64,
        fields: &PortfolioFields,
    ) -> Result<Option<Portfolio>, StoreError> {
        let request = self
            .client
            .request(Method::PATCH, &self.path())
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(fields);
        let rows: Vec<Portfolio> = self.rows("Portfolio update", request).await?;
        Ok(rows.into_iter().next())
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let request = self
            .client
            .request(Method::DELETE, &self.path())
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation");
        let rows: Vec<serde_json::Value> = self.rows("Portfolio delete", request).await?;
        Ok(!rows.is_empty())
    }
}

use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::{compare_rank, Portfolio, PortfolioFields};
use super::tables::*;

impl Database {
    // ========================================================================
    // Portfolio operations
    // ========================================================================

    /// Insert a new row, allocating its id and creation timestamp
    pub fn insert_portfolio(&self, fields: &PortfolioFields) -> Result<Portfolio, DatabaseError> {
        let write_txn = self.begin_write()?;
        let record = {
            let id = Database::next_sequence(&write_txn, PORTFOLIO_ID_SEQ)?;
            let record = Portfolio::from_fields(id, fields.clone(), chrono::Utc::now());

            let mut table = write_txn.open_table(PORTFOLIOS)?;
            let data = rmp_serde::to_vec_named(&record)?;
            table.insert(id, data.as_slice())?;
            record
        };
        write_txn.commit()?;
        Ok(record)
    }

    pub fn get_portfolio(&self, id: i64) -> Result<Option<Portfolio>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(PORTFOLIOS)?;

        match table.get(id)? {
            Some(data) => Ok(Some(rmp_serde::from_slice(data.value())?)),
            None => Ok(None),
        }
    }

    /// All rows, ascending by rank (unranked last, ties by id)
    pub fn list_portfolios(&self) -> Result<Vec<Portfolio>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(PORTFOLIOS)?;

        let mut rows = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            let row: Portfolio = rmp_serde::from_slice(value.value())?;
            rows.push(row);
        }

        rows.sort_by(|a, b| {
            compare_rank(a.rank.as_deref(), b.rank.as_deref()).then(a.id.cmp(&b.id))
        });
        Ok(rows)
    }

    /// Replace every editable column of a row. Returns `None` when the id is unknown.
    pub fn update_portfolio(
        &self,
        id: i64,
        fields: &PortfolioFields,
    ) -> Result<Option<Portfolio>, DatabaseError> {
        let write_txn = self.begin_write()?;

        let existing: Option<Portfolio> = {
            let table = write_txn.open_table(PORTFOLIOS)?;
            let result = match table.get(id)? {
                Some(data) => Some(rmp_serde::from_slice(data.value())?),
                None => None,
            };
            result
        };

        let updated = match existing {
            Some(mut row) => {
                row.apply_fields(fields.clone());
                let data = rmp_serde::to_vec_named(&row)?;
                let mut table = write_txn.open_table(PORTFOLIOS)?;
                table.insert(id, data.as_slice())?;
                Some(row)
            }
            None => None,
        };

        write_txn.commit()?;
        Ok(updated)
    }

    /// Delete a row by id. Returns whether a row was removed.
    pub fn delete_portfolio(&self, id: i64) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;
        let deleted = {
            let mut table = write_txn.open_table(PORTFOLIOS)?;
            let removed = table.remove(id)?.is_some();
            removed
        };
        write_txn.commit()?;
        Ok(deleted)
    }
}

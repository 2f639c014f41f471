use redb::TableDefinition;

/// Portfolio rows: id -> Portfolio (msgpack)
pub const PORTFOLIOS: TableDefinition<i64, &[u8]> = TableDefinition::new("portfolios");

/// Named counters: sequence name -> last allocated value
pub const SEQUENCES: TableDefinition<&str, i64> = TableDefinition::new("sequences");

/// Sequence key for portfolio ids
pub const PORTFOLIO_ID_SEQ: &str = "portfolio_id";

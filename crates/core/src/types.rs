/// Upstream primary keys are integer ids.
pub type EntityId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Monetary amounts are exact decimals, never floats.
pub type Amount = rust_decimal::Decimal;

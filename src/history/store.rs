//! Read-only sources of historical quotes.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::HistoricalQuoteRecord;
use crate::catalog::Sector;
use crate::error::HistoryError;

/// Source of past quotes.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Records for `client_key`, optionally narrowed to a sector.
    ///
    /// Records without a sector are always included, since they may belong to
    /// any sector.
    async fn query_by_sector_hint(
        &self,
        client_key: &str,
        sector: Option<&str>,
    ) -> Result<Vec<HistoricalQuoteRecord>, HistoryError>;
}

fn matches_hint(record: &HistoricalQuoteRecord, client_key: &str, hint: Option<Sector>) -> bool {
    if record.client_key != client_key {
        return false;
    }
    match (hint, record.sector.as_deref()) {
        (Some(wanted), Some(sector)) => Sector::resolve(sector) == wanted,
        _ => true,
    }
}

fn filter_records<'a>(
    records: impl IntoIterator<Item = &'a HistoricalQuoteRecord>,
    client_key: &str,
    sector: Option<&str>,
) -> Vec<HistoricalQuoteRecord> {
    let hint = sector
        .map(Sector::resolve)
        .filter(|s| *s != Sector::Other);
    records
        .into_iter()
        .filter(|r| matches_hint(r, client_key, hint))
        .cloned()
        .collect()
}

/// Store backed by a vector, for tests and embedding callers that already
/// hold their records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryStore {
    records: Vec<HistoricalQuoteRecord>,
}

impl InMemoryHistoryStore {
    pub fn new(records: Vec<HistoricalQuoteRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: HistoricalQuoteRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn query_by_sector_hint(
        &self,
        client_key: &str,
        sector: Option<&str>,
    ) -> Result<Vec<HistoricalQuoteRecord>, HistoryError> {
        Ok(filter_records(&self.records, client_key, sector))
    }
}

/// Store reading a JSON array of records from disk on every query.
#[derive(Debug, Clone)]
pub struct JsonFileHistoryStore {
    path: PathBuf,
}

impl JsonFileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoryStore for JsonFileHistoryStore {
    async fn query_by_sector_hint(
        &self,
        client_key: &str,
        sector: Option<&str>,
    ) -> Result<Vec<HistoricalQuoteRecord>, HistoryError> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let records: Vec<HistoricalQuoteRecord> = serde_json::from_str(&raw)?;
        debug!(path = %self.path.display(), records = records.len(), "History file loaded");
        Ok(filter_records(&records, client_key, sector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::io::Write;

    fn record(id: i64, client: &str, sector: Option<&str>) -> HistoricalQuoteRecord {
        HistoricalQuoteRecord {
            id,
            client_key: client.to_string(),
            sector: sector.map(str::to_string),
            title: format!("Obra {id}"),
            description: String::new(),
            total_amount: dec!(5000),
            embedding: json!([1.0, 0.0]),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_in_memory_filters_client_and_sector() {
        let store = InMemoryHistoryStore::new(vec![
            record(1, "acme", Some("Construcción")),
            record(2, "acme", Some("software")),
            record(3, "acme", None),
            record(4, "other", Some("construccion")),
        ]);

        let ids = |records: Vec<HistoricalQuoteRecord>| -> Vec<i64> {
            records.iter().map(|r| r.id).collect()
        };

        let all = store.query_by_sector_hint("acme", None).await.unwrap();
        assert_eq!(ids(all), vec![1, 2, 3]);

        let building = store
            .query_by_sector_hint("acme", Some("construccion"))
            .await
            .unwrap();
        assert_eq!(ids(building), vec![1, 3]);

        let unknown = store
            .query_by_sector_hint("acme", Some("astronautica"))
            .await
            .unwrap();
        assert_eq!(ids(unknown), vec![1, 2, 3]);

        assert!(store.query_by_sector_hint("nobody", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_json_file_store() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let records = vec![record(1, "acme", Some("software")), record(2, "acme", None)];
        write!(file, "{}", serde_json::to_string(&records).unwrap()).unwrap();

        let store = JsonFileHistoryStore::new(file.path());
        let loaded = store
            .query_by_sector_hint("acme", Some("software"))
            .await
            .unwrap();
        assert_eq!(loaded, records);
    }

    #[tokio::test]
    async fn test_json_file_store_errors() {
        let missing = JsonFileHistoryStore::new("/nonexistent/history.json");
        let err = missing.query_by_sector_hint("acme", None).await.unwrap_err();
        assert!(matches!(err, HistoryError::Io(_)));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let broken = JsonFileHistoryStore::new(file.path());
        let err = broken.query_by_sector_hint("acme", None).await.unwrap_err();
        assert!(matches!(err, HistoryError::Decode(_)));
    }
}

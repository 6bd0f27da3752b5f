use std::collections::HashMap;
use std::path::Path;

/// One CSV record keyed by header name.
#[derive(Debug, Clone, Default)]
pub(crate) struct CsvRow {
    fields: HashMap<String, String>,
}

impl CsvRow {
    /// Empty and missing fields both read as `None`, as `LOAD CSV` yields null for them.
    pub(crate) fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub(crate) fn get_owned(&self, column: &str) -> Option<String> {
        self.get(column).map(str::to_string)
    }
}

impl From<HashMap<String, String>> for CsvRow {
    fn from(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }
}

/// Reads every record of a headered CSV file.
pub(crate) fn read_rows(path: &Path) -> Result<Vec<CsvRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    reader
        .deserialize::<HashMap<String, String>>()
        .map(|record| record.map(CsvRow::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_field_reads_as_none() {
        let mut fields = HashMap::new();
        fields.insert("movieId".to_string(), "1".to_string());
        fields.insert("genres".to_string(), String::new());
        let row = CsvRow::from(fields);

        assert_eq!(row.get("movieId"), Some("1"));
        assert_eq!(row.get("genres"), None);
        assert_eq!(row.get("title"), None);
    }

    #[test]
    fn test_read_rows_handles_quoted_commas() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("movies.csv");
        std::fs::write(
            &path,
            "movieId,title,genres\n11,\"American President, The (1995)\",Comedy|Drama|Romance\n",
        )
        .unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("title"), Some("American President, The (1995)"));
        assert_eq!(rows[0].get("genres"), Some("Comedy|Drama|Romance"));
    }
}

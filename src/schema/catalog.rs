//! Schema catalog holding the star-schema table definitions
//!
//! Table definitions are persisted at `<data_dir>/metadata/schemas/table_<name>.json`,
//! one file per table. A malformed schema file is fatal when opening a warehouse.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{SchemaError, SchemaResult};
use super::types::{star_schema, TableSchema};

/// In-memory registry of table schemas, optionally backed by a directory on disk.
pub struct SchemaCatalog {
    schema_dir: PathBuf,
    tables: BTreeMap<String, TableSchema>,
}

impl SchemaCatalog {
    /// Creates an empty catalog for the given data directory.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            schema_dir: data_dir.join("metadata").join("schemas"),
            tables: BTreeMap::new(),
        }
    }

    /// Creates a catalog pre-populated with the four star-schema tables.
    pub fn star(data_dir: &Path) -> SchemaResult<Self> {
        let mut catalog = Self::new(data_dir);
        for table in star_schema() {
            catalog.register(table)?;
        }
        catalog.validate_references()?;
        Ok(catalog)
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads all table files from the schema directory.
    pub fn load_all(&mut self) -> SchemaResult<()> {
        if !self.schema_dir.exists() {
            return Ok(());
        }

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::malformed_schema(
                self.schema_dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed_schema(
                    self.schema_dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }
        // read_dir order is platform dependent
        paths.sort();

        for path in paths {
            self.load_table_file(&path)?;
        }

        self.validate_references()
    }

    fn load_table_file(&mut self, path: &Path) -> SchemaResult<()> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_schema(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;

        let table: TableSchema = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed_schema(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        table
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema(path.display().to_string(), e))?;

        self.tables.insert(table.name.clone(), table);
        Ok(())
    }

    /// Registers a table definition. Existing definitions are immutable.
    pub fn register(&mut self, table: TableSchema) -> SchemaResult<()> {
        table
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema(&table.name, e))?;

        if self.tables.contains_key(&table.name) {
            return Err(SchemaError::schema_immutable(&table.name));
        }

        self.tables.insert(table.name.clone(), table);
        Ok(())
    }

    /// Checks that every foreign key points at a registered table and column.
    pub fn validate_references(&self) -> SchemaResult<()> {
        for table in self.tables.values() {
            for fk in &table.foreign_keys {
                let target = self.tables.get(&fk.references_table).ok_or_else(|| {
                    SchemaError::malformed_schema(
                        &table.name,
                        format!("foreign key '{}' references unknown table '{}'", fk.column, fk.references_table),
                    )
                })?;
                if target.column(&fk.references_column).is_none() {
                    return Err(SchemaError::malformed_schema(
                        &table.name,
                        format!(
                            "foreign key '{}' references unknown column '{}.{}'",
                            fk.column, fk.references_table, fk.references_column
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Gets a table by name.
    pub fn get(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    /// Gets a table by name, failing with `DW_UNKNOWN_TABLE`.
    pub fn require(&self, name: &str) -> SchemaResult<&TableSchema> {
        self.get(name).ok_or_else(|| SchemaError::unknown_table(name))
    }

    /// Returns all tables ordered by name.
    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.values()
    }

    /// Returns the number of registered tables.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Writes every table definition to the schema directory, replacing old files.
    pub fn save_all(&self) -> SchemaResult<Vec<PathBuf>> {
        fs::create_dir_all(&self.schema_dir).map_err(|e| {
            SchemaError::malformed_schema(
                self.schema_dir.display().to_string(),
                format!("Failed to create schema directory: {}", e),
            )
        })?;

        let mut written = Vec::with_capacity(self.tables.len());
        for table in self.tables.values() {
            let path = self.schema_dir.join(format!("table_{}.json", table.name));
            let content = serde_json::to_string_pretty(table).map_err(|e| {
                SchemaError::malformed_schema(&table.name, format!("Failed to serialize schema: {}", e))
            })?;
            fs::write(&path, content).map_err(|e| {
                SchemaError::malformed_schema(path.display().to_string(), format!("Failed to write file: {}", e))
            })?;
            written.push(path);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{ColumnDef, ColumnType, ForeignKey, DIM_PRODUCT, FACT_SALES};
    use tempfile::TempDir;

    #[test]
    fn test_star_catalog_has_four_tables() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = SchemaCatalog::star(temp_dir.path()).unwrap();

        assert_eq!(catalog.table_count(), 4);
        assert!(catalog.get(FACT_SALES).is_some());
        assert!(catalog.get(DIM_PRODUCT).is_some());
    }

    #[test]
    fn test_schema_immutability() {
        let temp_dir = TempDir::new().unwrap();
        let mut catalog = SchemaCatalog::star(temp_dir.path()).unwrap();

        let dup = TableSchema::new(
            DIM_PRODUCT,
            "product_id",
            vec![ColumnDef::required("product_id", ColumnType::Text)],
        );
        let result = catalog.register(dup);
        assert_eq!(result.unwrap_err().code().code(), "DW_SCHEMA_IMMUTABLE");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = SchemaCatalog::star(temp_dir.path()).unwrap();
        let written = catalog.save_all().unwrap();
        assert_eq!(written.len(), 4);

        let mut reloaded = SchemaCatalog::new(temp_dir.path());
        reloaded.load_all().unwrap();

        assert_eq!(reloaded.table_count(), 4);
        assert_eq!(reloaded.get(FACT_SALES), catalog.get(FACT_SALES));
    }

    #[test]
    fn test_dangling_foreign_key_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut catalog = SchemaCatalog::new(temp_dir.path());

        let orphan = TableSchema::new(
            "fact_returns",
            "return_id",
            vec![
                ColumnDef::required("return_id", ColumnType::Text),
                ColumnDef::required("store_id", ColumnType::Text),
            ],
        )
        .with_foreign_key(ForeignKey::new("store_id", "dim_store", "store_id"));
        catalog.register(orphan).unwrap();

        let err = catalog.validate_references().unwrap_err();
        assert!(err.is_fatal());
        assert!(err.message().contains("dim_store"));
    }

    #[test]
    fn test_unknown_table() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = SchemaCatalog::star(temp_dir.path()).unwrap();

        let err = catalog.require("dim_store").unwrap_err();
        assert_eq!(err.code().code(), "DW_UNKNOWN_TABLE");
    }

    #[test]
    fn test_load_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut catalog = SchemaCatalog::new(temp_dir.path());

        assert!(catalog.load_all().is_ok());
        assert_eq!(catalog.table_count(), 0);
    }

    #[test]
    fn test_malformed_file_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = SchemaCatalog::new(temp_dir.path());
        fs::create_dir_all(catalog.schema_dir()).unwrap();
        fs::write(catalog.schema_dir().join("table_bad.json"), "{ not json").unwrap();

        let mut catalog = SchemaCatalog::new(temp_dir.path());
        let err = catalog.load_all().unwrap_err();
        assert!(err.is_fatal());
        assert!(err.message().contains("Invalid JSON"));
    }
}

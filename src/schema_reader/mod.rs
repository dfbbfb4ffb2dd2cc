// Schema reader module: catalog introspection backends
pub mod postgres;
pub mod snapshot;


pub use postgres::{ConnectionConfig, PostgresSchemaReader};
pub use snapshot::SnapshotSchemaReader;

use crate::error::ModelGenResult;
use crate::types::{ColumnDescriptor, TableDescriptor};

/// Read-only access to a database's table and column metadata
#[allow(async_fn_in_trait)]
pub trait SchemaReader {
    /// Names of the base tables, in catalog order
    async fn list_table_names(&self) -> ModelGenResult<Vec<String>>;

    /// Columns of one table, in declaration order
    async fn list_columns(&self, table_name: &str) -> ModelGenResult<Vec<ColumnDescriptor>>;

    /// Every table together with its columns. Stops at the first error.
    async fn list_tables(&self) -> ModelGenResult<Vec<TableDescriptor>> {
        let names = self.list_table_names().await?;
        let mut tables = Vec::with_capacity(names.len());
        for name in names {
            let columns = self.list_columns(&name).await?;
            tables.push(TableDescriptor { name, columns });
        }
        Ok(tables)
    }
}

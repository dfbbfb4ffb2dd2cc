use tracing::{debug, info};

use crate::codegen::batch::{BatchOrchestrator, BatchReport};
use crate::codegen::declaration::DeclarationGenerator;
use crate::codegen::output::OutputSink;
use crate::config::GeneratorConfig;
use crate::error::{ModelGenError, ModelGenResult};
use crate::schema_reader::SchemaReader;
use crate::types::TableDescriptor;

/// Reads a schema, generates one declaration per table and writes the
/// results plus a summary log to a sink
pub struct ModelPipeline {
    orchestrator: BatchOrchestrator,
    exclude_prefixes: Vec<String>,
    log_file_name: String,
}

impl ModelPipeline {
    pub fn new(
        orchestrator: BatchOrchestrator,
        exclude_prefixes: Vec<String>,
        log_file_name: impl Into<String>,
    ) -> Self {
        Self {
            orchestrator,
            exclude_prefixes,
            log_file_name: log_file_name.into(),
        }
    }

    /// Build a pipeline from validated configuration
    pub fn from_config(config: &GeneratorConfig) -> ModelGenResult<Self> {
        config.validate()?;
        let generator = DeclarationGenerator::with_config(
            config.type_mapping(),
            config.declaration_options(),
        );
        Ok(Self::new(
            BatchOrchestrator::new(generator),
            config.exclude_prefixes.clone(),
            config.log_file_name.clone(),
        ))
    }

    fn is_excluded(&self, table_name: &str) -> bool {
        self.exclude_prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && table_name.starts_with(prefix.as_str()))
    }

    /// Run a full generation. Only a failure to list tables or to write the
    /// summary log aborts the run; per-table problems end up in the report.
    pub async fn run<R, S>(&self, reader: &R, sink: &mut S) -> ModelGenResult<BatchReport>
    where
        R: SchemaReader,
        S: OutputSink,
    {
        let mut report = BatchReport::new();
        info!(run_id = %report.run_id, "Starting model generation");

        let table_names = reader.list_table_names().await.map_err(|e| {
            if e.is_schema_access() {
                e
            } else {
                ModelGenError::schema_access(e.to_string())
            }
        })?;
        info!(run_id = %report.run_id, tables = table_names.len(), "Read table list");

        for name in table_names {
            if self.is_excluded(&name) {
                debug!(table = %name, "Skipping excluded table");
                report.record_skipped(name);
                continue;
            }

            match reader.list_columns(&name).await {
                Ok(columns) => {
                    let table = TableDescriptor { name, columns };
                    self.orchestrator.process(&mut report, &table);
                }
                Err(e) => report.record_failure(name, e.to_string()),
            }
        }

        let written: Vec<(String, String, String)> = report
            .generated_tables()
            .into_iter()
            .filter_map(|table| {
                report.declarations.get(table).map(|d| {
                    (table.to_string(), d.file_name.clone(), d.source_text.clone())
                })
            })
            .collect();

        for (table, file_name, source_text) in written {
            if let Err(e) = sink.write(&file_name, &source_text) {
                report.mark_failed(&table, e.to_string());
            }
        }

        report.finish();
        sink.write(&self.log_file_name, &report.summary_log())?;
        Ok(report)
    }
}

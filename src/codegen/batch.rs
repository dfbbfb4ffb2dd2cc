use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;

use crate::codegen::declaration::DeclarationGenerator;
use crate::types::{BatchStatus, GeneratedDeclaration, TableDescriptor, TableOutcome};

/// Aggregated result of one generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// One entry per processed table, in processing order
    pub outcomes: Vec<TableOutcome>,
    /// Tables excluded by prefix before processing
    pub skipped: Vec<String>,
    /// Generated declarations keyed by table name. Duplicate table names
    /// overwrite earlier entries.
    #[serde(skip)]
    pub declarations: HashMap<String, GeneratedDeclaration>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            outcomes: Vec::new(),
            skipped: Vec::new(),
            declarations: HashMap::new(),
        }
    }

    /// Record a successfully generated declaration
    pub fn record_generated(&mut self, declaration: GeneratedDeclaration) {
        self.outcomes.push(TableOutcome::Generated {
            table: declaration.table_name.clone(),
            field_count: declaration.field_count,
            fallback_columns: declaration.fallback_columns.clone(),
        });
        self.declarations
            .insert(declaration.table_name.clone(), declaration);
    }

    /// Record a table that could not be generated
    pub fn record_failure(&mut self, table: impl Into<String>, reason: impl Into<String>) {
        let table = table.into();
        let reason = reason.into();
        warn!(run_id = %self.run_id, table = %table, reason = %reason, "Table failed");
        self.outcomes.push(TableOutcome::Failed { table, reason });
    }

    /// Downgrade every generated outcome for a table to a failure and drop
    /// its declaration, e.g. after the output sink rejected it
    pub fn mark_failed(&mut self, table: &str, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(run_id = %self.run_id, table = %table, reason = %reason, "Table failed after generation");
        for outcome in &mut self.outcomes {
            if outcome.is_generated() && outcome.table() == table {
                *outcome = TableOutcome::Failed {
                    table: table.to_string(),
                    reason: reason.clone(),
                };
            }
        }
        self.declarations.remove(table);
    }

    pub fn record_skipped(&mut self, table: impl Into<String>) {
        self.skipped.push(table.into());
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
        info!(
            run_id = %self.run_id,
            generated = self.generated_count(),
            failed = self.failed_count(),
            skipped = self.skipped.len(),
            status = ?self.status(),
            "Batch finished"
        );
    }

    pub fn generated_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_generated()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.generated_count()
    }

    pub fn status(&self) -> BatchStatus {
        match (self.generated_count(), self.failed_count()) {
            (_, 0) => BatchStatus::Success,
            (0, _) => BatchStatus::Failure,
            _ => BatchStatus::Partial,
        }
    }

    pub fn is_successful(&self) -> bool {
        self.status() == BatchStatus::Success
    }

    /// Table names of generated declarations, first-seen order, no repeats
    pub fn generated_tables(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for outcome in &self.outcomes {
            let table = outcome.table();
            if outcome.is_generated() && !seen.contains(&table) {
                seen.push(table);
            }
        }
        seen
    }

    /// Summary log: one line per processed table, in order
    pub fn summary_log(&self) -> String {
        let mut log = String::new();
        for outcome in &self.outcomes {
            log.push_str(&outcome.log_line());
            log.push('\n');
        }
        log
    }

    pub fn summary(&self) -> String {
        format!(
            "{} generated, {} failed, {} skipped ({:?})",
            self.generated_count(),
            self.failed_count(),
            self.skipped.len(),
            self.status()
        )
    }
}

impl Default for BatchReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the declaration generator over a set of tables
pub struct BatchOrchestrator {
    generator: DeclarationGenerator,
}

impl BatchOrchestrator {
    pub fn new(generator: DeclarationGenerator) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &DeclarationGenerator {
        &self.generator
    }

    /// Generate declarations for all tables. A failing table is recorded in
    /// the report and the remaining tables are still processed.
    pub fn generate_all(&self, tables: &[TableDescriptor]) -> BatchReport {
        let mut report = BatchReport::new();
        info!(run_id = %report.run_id, tables = tables.len(), "Starting batch generation");
        for table in tables {
            self.process(&mut report, table);
        }
        report.finish();
        report
    }

    /// Generate one table into an existing report
    pub fn process(&self, report: &mut BatchReport, table: &TableDescriptor) {
        match self.generator.generate(table) {
            Ok(declaration) => report.record_generated(declaration),
            Err(e) => report.record_failure(&table.name, e.to_string()),
        }
    }
}

impl Default for BatchOrchestrator {
    fn default() -> Self {
        Self::new(DeclarationGenerator::default())
    }
}

use serde::{Deserialize, Serialize};
use std::fmt::Write;
use tracing::debug;

use crate::codegen::type_mapper::TypeMapping;
use crate::error::ModelGenResult;
use crate::types::{validate_identifier, ColumnDescriptor, GeneratedDeclaration, TableDescriptor};

/// Lines emitted at the top of every generated file
const USING_DIRECTIVES: &[&str] = &[
    "using System;",
    "using System.ComponentModel.DataAnnotations;",
    "using System.ComponentModel.DataAnnotations.Schema;",
];

const CLASS_INDENT: &str = "    ";
const MEMBER_INDENT: &str = "        ";

/// Strategy for deciding which properties receive a `[Key]` marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyDetection {
    /// Mark the column whose name matches `key_column_name` exactly.
    /// Heuristic: the schema is not consulted.
    NamingConvention,
    /// Mark columns the catalog reports as primary key members
    Catalog,
    /// Never emit `[Key]`
    None,
}

/// Formatting options for generated declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationOptions {
    pub namespace: String,
    pub file_extension: String,
    pub key_detection: KeyDetection,
    pub key_column_name: String,
    pub emit_table_attribute: bool,
    pub emit_column_attributes: bool,
}

impl Default for DeclarationOptions {
    fn default() -> Self {
        Self {
            namespace: "AIModelGen.Models".to_string(),
            file_extension: ".cs".to_string(),
            key_detection: KeyDetection::NamingConvention,
            key_column_name: "Id".to_string(),
            emit_table_attribute: false,
            emit_column_attributes: false,
        }
    }
}

/// Turns one table descriptor into a C# class declaration
#[derive(Debug, Clone)]
pub struct DeclarationGenerator {
    mapping: TypeMapping,
    options: DeclarationOptions,
}

impl DeclarationGenerator {
    /// Create a generator with the default type mapping and options
    pub fn new() -> Self {
        Self::with_config(TypeMapping::default(), DeclarationOptions::default())
    }

    /// Create a generator with a custom type mapping and options
    pub fn with_config(mapping: TypeMapping, options: DeclarationOptions) -> Self {
        Self { mapping, options }
    }

    pub fn mapping(&self) -> &TypeMapping {
        &self.mapping
    }

    pub fn options(&self) -> &DeclarationOptions {
        &self.options
    }

    /// File name a table's declaration is written under
    pub fn file_name_for(&self, table_name: &str) -> String {
        format!("{}{}", table_name, self.options.file_extension)
    }

    /// Generate the declaration for a single table
    pub fn generate(&self, table: &TableDescriptor) -> ModelGenResult<GeneratedDeclaration> {
        validate_identifier(&table.name)?;
        for column in &table.columns {
            validate_identifier(&column.name)?;
        }

        let mut text = String::new();
        for directive in USING_DIRECTIVES {
            text.push_str(directive);
            text.push('\n');
        }
        text.push('\n');
        line(&mut text, "", &format!("namespace {}", self.options.namespace));
        line(&mut text, "", "{");
        if self.options.emit_table_attribute {
            line(&mut text, CLASS_INDENT, &format!("[Table(\"{}\")]", table.name));
        }
        line(&mut text, CLASS_INDENT, &format!("public class {}", table.name));
        line(&mut text, CLASS_INDENT, "{");

        let mut fallback_columns = Vec::new();
        for column in &table.columns {
            let resolution = self.mapping.resolve(&column.source_type);
            if resolution.fallback {
                fallback_columns.push(column.name.clone());
            }
            let field_type = self.mapping.map_type(&column.source_type, column.nullable);

            if self.is_key(column) {
                line(&mut text, MEMBER_INDENT, "[Key]");
            }
            if self.options.emit_column_attributes {
                line(&mut text, MEMBER_INDENT, &format!("[Column(\"{}\")]", column.name));
            }
            line(
                &mut text,
                MEMBER_INDENT,
                &format!("public {} {} {{ get; set; }}", field_type, column.name),
            );
            text.push('\n');
        }

        line(&mut text, CLASS_INDENT, "}");
        line(&mut text, "", "}");

        debug!(
            table = %table.name,
            fields = table.columns.len(),
            fallbacks = fallback_columns.len(),
            "Generated declaration"
        );

        Ok(GeneratedDeclaration {
            table_name: table.name.clone(),
            file_name: self.file_name_for(&table.name),
            source_text: text,
            field_count: table.columns.len(),
            fallback_columns,
        })
    }

    fn is_key(&self, column: &ColumnDescriptor) -> bool {
        match self.options.key_detection {
            KeyDetection::NamingConvention => column.name == self.options.key_column_name,
            KeyDetection::Catalog => column.primary_key,
            KeyDetection::None => false,
        }
    }
}

impl Default for DeclarationGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn line(out: &mut String, indent: &str, content: &str) {
    // Writing to a String cannot fail
    let _ = writeln!(out, "{}{}", indent, content);
}

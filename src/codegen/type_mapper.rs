use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// How a target type behaves with respect to NULL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// Numeric, boolean and temporal types; wrapped as `T?` when nullable
    Value,
    /// String-like and object types; already nullable, never wrapped
    Reference,
}

/// Target type for one source type token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRule {
    /// Target-language type name
    pub target: String,
    /// Wrapping behaviour for nullable columns
    pub kind: TypeKind,
}

impl TypeRule {
    pub fn value(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            kind: TypeKind::Value,
        }
    }

    pub fn reference(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            kind: TypeKind::Reference,
        }
    }
}

/// Result of looking up a source type token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeResolution<'a> {
    /// The rule that applies
    pub rule: &'a TypeRule,
    /// Normalized token that was looked up
    pub token: String,
    /// Whether the token was unknown and the fallback rule was used
    pub fallback: bool,
}

/// Default source token table: (tokens, target, kind)
const DEFAULT_RULES: &[(&[&str], &str, TypeKind)] = &[
    (&["int", "integer", "mediumint"], "int", TypeKind::Value),
    (&["bigint"], "long", TypeKind::Value),
    (&["smallint"], "short", TypeKind::Value),
    (&["decimal", "numeric"], "decimal", TypeKind::Value),
    (&["double", "double precision"], "double", TypeKind::Value),
    (&["float", "real"], "float", TypeKind::Value),
    (&["bit", "bool", "boolean"], "bool", TypeKind::Value),
    (
        &["datetime", "date", "timestamp", "timestamp without time zone"],
        "DateTime",
        TypeKind::Value,
    ),
    (&["timestamp with time zone"], "DateTimeOffset", TypeKind::Value),
    (&["time", "time without time zone"], "TimeSpan", TypeKind::Value),
    (&["uuid"], "Guid", TypeKind::Value),
    (
        &[
            "varchar",
            "char",
            "text",
            "character varying",
            "character",
            "tinytext",
            "mediumtext",
            "longtext",
            "json",
            "jsonb",
        ],
        "string",
        TypeKind::Reference,
    ),
    (&["bytea", "blob", "binary", "varbinary"], "byte[]", TypeKind::Reference),
];

pub const DEFAULT_FALLBACK_TYPE: &str = "object";

/// Maps SQL column types to target-language type names
#[derive(Debug, Clone)]
pub struct TypeMapping {
    rules: HashMap<String, TypeRule>,
    fallback: TypeRule,
}

impl TypeMapping {
    /// Create a mapping from explicit rules. Keys are normalized on insert.
    pub fn new(rules: HashMap<String, TypeRule>, fallback: TypeRule) -> Self {
        let rules = rules
            .into_iter()
            .map(|(token, rule)| (normalize_token(&token), rule))
            .collect();
        Self { rules, fallback }
    }

    /// Create a mapping with no rules, where every token falls back
    pub fn empty(fallback: TypeRule) -> Self {
        Self::new(HashMap::new(), fallback)
    }

    /// Add or replace the rule for a token
    pub fn with_rule(mut self, token: &str, rule: TypeRule) -> Self {
        self.rules.insert(normalize_token(token), rule);
        self
    }

    /// Merge overrides on top of the current rules
    pub fn extend(&mut self, overrides: impl IntoIterator<Item = (String, TypeRule)>) {
        for (token, rule) in overrides {
            self.rules.insert(normalize_token(&token), rule);
        }
    }

    /// Replace the fallback type name
    pub fn set_fallback_type(&mut self, target: impl Into<String>) {
        self.fallback = TypeRule::reference(target);
    }

    pub fn fallback(&self) -> &TypeRule {
        &self.fallback
    }

    /// Look up the rule for a source type without applying nullability
    pub fn resolve(&self, source_type: &str) -> TypeResolution<'_> {
        let token = normalize_token(source_type);
        match self.rules.get(&token) {
            Some(rule) => TypeResolution {
                rule,
                token,
                fallback: false,
            },
            None => TypeResolution {
                rule: &self.fallback,
                token,
                fallback: true,
            },
        }
    }

    /// Map a source type to a target type name, wrapping value types in the
    /// optional notation when the column is nullable
    pub fn map_type(&self, source_type: &str, nullable: bool) -> String {
        let resolution = self.resolve(source_type);
        if resolution.fallback {
            warn!(
                source_type = source_type,
                fallback = %resolution.rule.target,
                "Unrecognized source type, using fallback"
            );
        }
        render_type(resolution.rule, nullable)
    }
}

impl Default for TypeMapping {
    fn default() -> Self {
        let mut rules = HashMap::new();
        for (tokens, target, kind) in DEFAULT_RULES {
            for token in *tokens {
                rules.insert(
                    (*token).to_string(),
                    TypeRule {
                        target: (*target).to_string(),
                        kind: *kind,
                    },
                );
            }
        }
        Self::new(rules, TypeRule::reference(DEFAULT_FALLBACK_TYPE))
    }
}

/// Render a rule as a type name for a column with the given nullability
pub fn render_type(rule: &TypeRule, nullable: bool) -> String {
    match (rule.kind, nullable) {
        (TypeKind::Value, true) => format!("{}?", rule.target),
        _ => rule.target.clone(),
    }
}

/// Normalize a raw SQL type: lowercase, strip `(length, scale)` and
/// sign/zerofill modifiers, collapse whitespace.
pub fn normalize_token(source_type: &str) -> String {
    let lowered = source_type.to_lowercase();

    let mut stripped = String::with_capacity(lowered.len());
    let mut depth = 0usize;
    for c in lowered.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => stripped.push(c),
            _ => {}
        }
    }

    let mut words: Vec<&str> = stripped.split_whitespace().collect();
    while let Some(last) = words.last() {
        if matches!(*last, "unsigned" | "signed" | "zerofill") && words.len() > 1 {
            words.pop();
        } else {
            break;
        }
    }
    words.join(" ")
}

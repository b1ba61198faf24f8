//! Declarative field constraints and the one validator that enforces them.
//!
//! Each entity describes its request body as a table of [`FieldRule`]s. The
//! validator walks the raw JSON object in table order and reports the first
//! failing field only. Fields not in the table are ignored.

use sonic_rs::{JsonValueTrait, Value};

use super::predicates::{in_range, is_iso8601, is_member, is_uuid, within_length};
use crate::error::{AppError, Result};

/// Upper bound used for counters that only have a lower bound.
pub const UNBOUNDED: i64 = u32::MAX as i64;

#[derive(Debug, Clone, Copy)]
pub enum Kind {
    /// Character length bounds, counted after trimming surrounding whitespace.
    Str { min_len: usize, max_len: usize },
    /// Inclusive integer bounds. Fractions are rejected.
    Int { min: i64, max: i64 },
    Bool,
    Enum(&'static [&'static str]),
    Uuid,
    DateTime,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub kind: Kind,
    pub required: bool,
    pub nullable: bool,
}

impl FieldRule {
    pub const fn required(field: &'static str, kind: Kind) -> Self {
        Self {
            field,
            kind,
            required: true,
            nullable: false,
        }
    }

    pub const fn optional(field: &'static str, kind: Kind) -> Self {
        Self {
            field,
            kind,
            required: false,
            nullable: false,
        }
    }

    /// Allows an explicit `null`.
    pub const fn nullable(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }
}

fn invalid(field: &str, expectation: impl std::fmt::Display) -> AppError {
    AppError::Validation(format!("{} {}", field, expectation))
}

fn check_value(rule: &FieldRule, value: &Value) -> Result<()> {
    let field = rule.field;
    match rule.kind {
        Kind::Str { min_len, max_len } => {
            let s = value
                .as_str()
                .ok_or_else(|| invalid(field, "must be a string"))?;
            if min_len > 0 && s.trim().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
            if !within_length(s.trim(), min_len, max_len) {
                return Err(if min_len == 0 {
                    invalid(field, format!("must be at most {} characters", max_len))
                } else {
                    invalid(
                        field,
                        format!("must be between {} and {} characters", min_len, max_len),
                    )
                });
            }
        }
        Kind::Int { min, max } => {
            let out_of_range = || {
                if max >= UNBOUNDED {
                    invalid(field, format!("must be at least {}", min))
                } else {
                    invalid(field, format!("must be between {} and {}", min, max))
                }
            };
            match value.as_i64() {
                Some(n) if in_range(n, min, max) => {}
                Some(_) => return Err(out_of_range()),
                None if value.as_u64().is_some() => return Err(out_of_range()),
                None => return Err(invalid(field, "must be an integer")),
            }
        }
        Kind::Bool => {
            value
                .as_bool()
                .ok_or_else(|| invalid(field, "must be a boolean"))?;
        }
        Kind::Enum(members) => match value.as_str() {
            Some(s) if is_member(s, members) => {}
            _ => return Err(invalid(field, format!("must be one of: {}", members.join(", ")))),
        },
        Kind::Uuid => match value.as_str() {
            Some(s) if is_uuid(s) => {}
            _ => return Err(invalid(field, "must be a valid UUID")),
        },
        Kind::DateTime => match value.as_str() {
            Some(s) if is_iso8601(s) => {}
            _ => return Err(invalid(field, "must be an ISO-8601 datetime")),
        },
    }
    Ok(())
}

/// Checks `body` against `rules`, stopping at the first violation.
pub fn validate(body: &Value, rules: &[FieldRule]) -> Result<()> {
    if !body.is_object() {
        return Err(AppError::InvalidJson(
            "Request body must be a JSON object".to_string(),
        ));
    }

    for rule in rules {
        match body.get(rule.field) {
            None if rule.required => return Err(invalid(rule.field, "is required")),
            None => {}
            Some(value) if value.is_null() => {
                if rule.nullable {
                    continue;
                }
                return Err(if rule.required {
                    invalid(rule.field, "is required")
                } else {
                    invalid(rule.field, "must not be null")
                });
            }
            Some(value) => check_value(rule, value)?,
        }
    }

    Ok(())
}

//! Event Validator

use crate::error::ValidationError;
use alerting::{Event, EventKind, UnknownEventKind};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::debug;

/// Validator for incoming event payloads
#[derive(Debug, Clone, Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a decoded payload of the form
    /// `{"type": "deposit"|"withdraw", "amount": >= 0, "user_id": int, "t": int}`.
    ///
    /// Numbers may also be given as strings. Unknown fields are ignored.
    pub fn validate(&self, payload: &Value) -> Result<Event, Vec<ValidationError>> {
        let Some(fields) = payload.as_object() else {
            return Err(vec![ValidationError::InvalidFormat {
                field: "body",
                reason: "expected a JSON object".to_string(),
            }]);
        };

        let kind = self.validate_kind(fields);
        let amount = self.validate_amount(fields);
        let user_id = self.validate_integer(fields, "user_id");
        let t = self.validate_integer(fields, "t");

        match (kind, amount, user_id, t) {
            (Ok(kind), Ok(amount), Ok(user_id), Ok(t)) => Ok(Event { kind, amount, user_id, t }),
            (kind, amount, user_id, t) => {
                let errors: Vec<_> = [kind.err(), amount.err(), user_id.err(), t.err()]
                    .into_iter()
                    .flatten()
                    .collect();
                debug!("Rejected event payload: {:?}", errors);
                Err(errors)
            }
        }
    }

    /// Validate the event type
    pub fn validate_kind(&self, fields: &Map<String, Value>) -> Result<EventKind, ValidationError> {
        match required(fields, "type")? {
            Value::String(s) => s.parse().map_err(|e: UnknownEventKind| {
                ValidationError::InvalidFormat {
                    field: "type",
                    reason: e.to_string(),
                }
            }),
            other => Err(wrong_type("type", "a string", other)),
        }
    }

    /// Validate the amount as a non-negative decimal
    pub fn validate_amount(&self, fields: &Map<String, Value>) -> Result<Decimal, ValidationError> {
        let amount = match required(fields, "amount")? {
            Value::Number(n) => parse_decimal(&n.to_string()),
            Value::String(s) => parse_decimal(s.trim()),
            other => return Err(wrong_type("amount", "a decimal number", other)),
        }
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "amount",
            reason: "not a valid decimal number".to_string(),
        })?;

        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ValidationError::OutOfRange {
                field: "amount",
                value: amount,
                min: Decimal::ZERO,
            });
        }
        Ok(amount)
    }

    /// Validate an integer field
    pub fn validate_integer(
        &self,
        fields: &Map<String, Value>,
        field: &'static str,
    ) -> Result<i64, ValidationError> {
        let invalid = || ValidationError::InvalidFormat {
            field,
            reason: "not a valid integer".to_string(),
        };
        match required(fields, field)? {
            Value::Number(n) => n.as_i64().ok_or_else(invalid),
            Value::String(s) => s.trim().parse().map_err(|_| invalid()),
            other => Err(wrong_type(field, "an integer", other)),
        }
    }
}

fn required<'a>(
    fields: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, ValidationError> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(field)),
        Some(value) => Ok(value),
    }
}

fn wrong_type(field: &'static str, expected: &str, got: &Value) -> ValidationError {
    let got = match got {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    ValidationError::InvalidFormat {
        field,
        reason: format!("expected {}, got {}", expected, got),
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

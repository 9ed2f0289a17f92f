//! Pact values, commands and command results.
//!
//! This is the slice of the Chainweb/Pact wire protocol the SDK needs: Pact
//! code literals for contract invocations, the JSON command envelope accepted
//! by `/local` and `/send`, and the command result returned by a node.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

pub mod command;
pub mod response;

pub use command::{
    Capability, Command, CommandBuilder, CommandPayload, ExecPayload, Meta, Payload, Signature,
    Signer,
};
pub use response::{parse_chain_response, CommandResult};

/// An argument passed to a Pact function or capability.
#[derive(Clone, Debug, PartialEq)]
pub enum PactValue {
    String(String),
    Integer(i64),
    Decimal(PactDecimal),
    Bool(bool),
}

impl PactValue {
    /// Render as a Pact code literal.
    pub fn to_code(&self) -> String {
        match self {
            // JSON string escaping is valid Pact string syntax
            PactValue::String(s) => Value::String(s.clone()).to_string(),
            PactValue::Integer(i) => i.to_string(),
            PactValue::Decimal(d) => d.as_str().to_string(),
            PactValue::Bool(b) => b.to_string(),
        }
    }
}

impl Serialize for PactValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        match self {
            PactValue::String(s) => serializer.serialize_str(s),
            PactValue::Integer(i) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("int", i)?;
                map.end()
            }
            PactValue::Decimal(d) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("decimal", d.as_str())?;
                map.end()
            }
            PactValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl From<&str> for PactValue {
    fn from(s: &str) -> Self {
        PactValue::String(s.to_string())
    }
}

impl From<String> for PactValue {
    fn from(s: String) -> Self {
        PactValue::String(s)
    }
}

impl From<PactDecimal> for PactValue {
    fn from(d: PactDecimal) -> Self {
        PactValue::Decimal(d)
    }
}

/// A Pact decimal.
///
/// Keeps the digits exactly as the node rendered them, so an amount read
/// from the chain is written back unchanged. `value` is for comparisons only.
#[derive(Clone, Debug, PartialEq)]
pub struct PactDecimal {
    literal: String,
    value: f64,
}

impl PactDecimal {
    /// Parse plain decimal notation, e.g. `12.5`, `-3` or `0.000000000000000001`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let unsigned = text.strip_prefix('-').unwrap_or(text);
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !is_digits(whole) || !is_digits(fraction) {
            return None;
        }

        let value = text.parse::<f64>().ok()?;
        let literal = if fraction.is_empty() {
            format!("{}.0", text.trim_end_matches('.'))
        } else {
            text.to_string()
        };
        Some(Self { literal, value })
    }

    /// Read a numeric Pact result: a bare JSON number, `{"decimal": ..}` or `{"int": ..}`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Self::from),
            Value::Object(object) => object
                .get("decimal")
                .or_else(|| object.get("int"))
                .and_then(|inner| match inner {
                    Value::Number(n) => n.as_f64().map(Self::from),
                    Value::String(s) => Self::parse(s),
                    _ => None,
                }),
            _ => None,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.literal
    }
}

impl From<f64> for PactDecimal {
    fn from(value: f64) -> Self {
        Self {
            literal: format_decimal(value),
            value,
        }
    }
}

impl fmt::Display for PactDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal)
    }
}

/// Pact decimals always carry a fractional part: `5` is an integer, `5.0` a decimal.
pub fn format_decimal(value: f64) -> String {
    let s = value.to_string();
    if s.contains('.') {
        s
    } else {
        format!("{s}.0")
    }
}

/// Render a function application, e.g. `(ns.module.fn "a" 1)`.
pub fn function_call(qualified_name: &str, args: &[PactValue]) -> String {
    let mut code = format!("({qualified_name}");
    for arg in args {
        code.push(' ');
        code.push_str(&arg.to_code());
    }
    code.push(')');
    code
}

/// [`PactDecimal::from_value`] as an `f64`.
pub fn pact_number(value: &Value) -> Option<f64> {
    PactDecimal::from_value(value).map(|d| d.value())
}

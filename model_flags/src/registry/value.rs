//! Flag kinds and the values they hold.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The type of a flag, which governs how raw values are coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagKind {
    /// `true`/`false`, also accepting `t`/`f`/`1`/`0` in any case.
    Bool,
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit float.
    Float,
    /// Free-form string.
    String,
    /// Comma-separated list of strings.
    List,
    /// String restricted to a fixed set of choices.
    Enum {
        /// Accepted spellings, in display order.
        choices: Vec<String>,
    },
}

impl FlagKind {
    /// Builds an enumeration kind from any list of choices.
    #[must_use]
    pub fn choices<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    /// Short human-readable name used in diagnostics.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::List => "list",
            Self::Enum { .. } => "enum",
        }
    }

    /// Placeholder shown after the flag name in help output.
    #[must_use]
    pub(crate) const fn value_name(&self) -> &'static str {
        match self {
            Self::Bool => "BOOL",
            Self::Integer => "INT",
            Self::Float => "FLOAT",
            Self::String | Self::Enum { .. } => "STRING",
            Self::List => "LIST",
        }
    }

    /// Parses a raw command-line string into a value of this kind.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem when `raw` cannot represent a
    /// value of this kind.
    pub fn parse_str(&self, raw: &str) -> Result<FlagValue, String> {
        match self {
            Self::Bool => parse_bool(raw).map(FlagValue::Bool),
            Self::Integer => raw
                .trim()
                .parse::<i64>()
                .map(FlagValue::Integer)
                .map_err(|err| format!("expected an integer ({err})")),
            Self::Float => raw
                .trim()
                .parse::<f64>()
                .map(FlagValue::Float)
                .map_err(|err| format!("expected a float ({err})")),
            Self::String => Ok(FlagValue::String(raw.to_owned())),
            Self::List => Ok(FlagValue::List(split_list(raw))),
            Self::Enum { choices } => {
                if choices.iter().any(|choice| choice == raw) {
                    Ok(FlagValue::String(raw.to_owned()))
                } else {
                    Err(format!("value should be one of: {}", choices.join(", ")))
                }
            }
        }
    }

    /// Coerces a value supplied programmatically (for example a default) to
    /// this kind.
    ///
    /// Strings are parsed exactly as command-line input would be; integers
    /// widen to floats; scalars render into string flags.
    ///
    /// # Errors
    ///
    /// Returns a description of the mismatch when no sensible conversion
    /// exists.
    pub fn coerce(&self, value: FlagValue) -> Result<FlagValue, String> {
        match (self, value) {
            (_, FlagValue::String(raw)) => self.parse_str(&raw),
            (Self::Bool, value @ FlagValue::Bool(_))
            | (Self::Integer, value @ FlagValue::Integer(_))
            | (Self::Float, value @ FlagValue::Float(_))
            | (Self::List, value @ FlagValue::List(_)) => Ok(value),
            (Self::Float, FlagValue::Integer(int)) => Ok(FlagValue::Float(widen(int))),
            (
                Self::String,
                value @ (FlagValue::Bool(_) | FlagValue::Integer(_) | FlagValue::Float(_)),
            ) => Ok(FlagValue::String(value.to_string())),
            (kind, value) => Err(format!(
                "cannot use {} value {value} for a {} flag",
                value.describe(),
                kind.describe()
            )),
        }
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "integer defaults for float flags are small literals"
)]
fn widen(value: i64) -> f64 {
    value as f64
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => Ok(true),
        "false" | "f" | "0" => Ok(false),
        _ => Err(String::from("expected true or false")),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

/// A concrete flag value.
///
/// Enumeration flags store their selected choice as [`FlagValue::String`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Integer(i64),
    /// Floating-point value.
    Float(f64),
    /// String or enumeration value.
    String(String),
    /// List value.
    List(Vec<String>),
}

impl FlagValue {
    const fn describe(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
        }
    }

    /// Returns the boolean payload, if any.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer payload, if any.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the float payload, if any.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the list payload, if any.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
            Self::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FlagValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for FlagValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for FlagValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<String>> for FlagValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for FlagValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(str::to_owned).collect())
    }
}

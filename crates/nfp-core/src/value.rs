//! # Parameter Values
//!
//! The value model for supplied pipeline parameters and the pre-validation
//! normalization step.
//!
//! ## Value kinds
//!
//! A parameter is one of: string, number, boolean, null, duration, memory
//! quantity, list, or structured map. Durations, memory quantities and
//! structured maps have no JSON counterpart the schema can type-check, so
//! [`ParameterSet::cleaned`] renders them to their canonical string form
//! before the document is handed to the structural validator.
//!
//! ## Cleaning
//!
//! Cleaning drops every parameter whose value is falsy under host
//! semantics: null, `false`, zero, the empty string, and empty lists or
//! maps. A validly supplied `false` or `0` therefore never reaches the
//! structural validator.

use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

use crate::document::read_structured;
use crate::error::ParamError;

// ---------------------------------------------------------------------------
// Duration
// ---------------------------------------------------------------------------

/// A time span with millisecond precision, rendered in host notation
/// (`500ms`, `1.5s`, `2d 3h`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration {
    millis: u64,
}

impl Duration {
    const SECOND: u64 = 1_000;
    const MINUTE: u64 = 60 * Self::SECOND;
    const HOUR: u64 = 60 * Self::MINUTE;
    const DAY: u64 = 24 * Self::HOUR;

    /// Create a duration from milliseconds.
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// Create a duration from whole seconds.
    pub const fn from_secs(secs: u64) -> Self {
        Self::from_millis(secs * Self::SECOND)
    }

    /// Create a duration from whole minutes.
    pub const fn from_mins(mins: u64) -> Self {
        Self::from_millis(mins * Self::MINUTE)
    }

    /// Create a duration from whole hours.
    pub const fn from_hours(hours: u64) -> Self {
        Self::from_millis(hours * Self::HOUR)
    }

    /// Create a duration from whole days.
    pub const fn from_days(days: u64) -> Self {
        Self::from_millis(days * Self::DAY)
    }

    /// Total length in milliseconds.
    pub const fn as_millis(&self) -> u64 {
        self.millis
    }

    /// The string handed to the structural validator.
    ///
    /// Identical to the display form except that the first day unit is
    /// spelled out (`2d 4h` becomes `2day 4h`), which is the form duration
    /// patterns in pipeline schemas are written against.
    pub fn canonical_string(&self) -> String {
        expand_day_unit(&self.to_string())
    }

    /// Parse a host duration literal such as `2.h`, `30.min` or `500.ms`.
    pub fn parse_literal(raw: &str) -> Option<Self> {
        let (count, unit) = split_literal(raw)?;
        let scale = match unit {
            "ms" => 1,
            "s" | "sec" => Self::SECOND,
            "m" | "min" => Self::MINUTE,
            "h" | "hour" | "hours" => Self::HOUR,
            "d" | "day" | "days" => Self::DAY,
            _ => return None,
        };
        count.checked_mul(scale).map(Self::from_millis)
    }
}

impl From<std::time::Duration> for Duration {
    fn from(d: std::time::Duration) -> Self {
        Self::from_millis(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.millis < Self::SECOND {
            return write!(f, "{}ms", self.millis);
        }
        if self.millis < Self::MINUTE {
            let secs = (self.millis as f64 / 10.0).round() / 100.0;
            return write!(f, "{secs}s");
        }

        let mut rest = self.millis;
        let mut parts = Vec::with_capacity(4);
        for (unit, suffix) in [
            (Self::DAY, "d"),
            (Self::HOUR, "h"),
            (Self::MINUTE, "m"),
            (Self::SECOND, "s"),
        ] {
            let count = rest / unit;
            rest %= unit;
            if count > 0 {
                parts.push(format!("{count}{suffix}"));
            }
        }
        f.write_str(&parts.join(" "))
    }
}

/// Replace the first `d` that ends a token with `day`.
fn expand_day_unit(rendered: &str) -> String {
    for (i, c) in rendered.char_indices() {
        if c != 'd' {
            continue;
        }
        let rest = &rendered[i + 1..];
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            return format!("{}day{}", &rendered[..i], rest);
        }
    }
    rendered.to_string()
}

// ---------------------------------------------------------------------------
// MemoryUnit
// ---------------------------------------------------------------------------

/// A memory quantity in bytes, rendered with binary multiples (`8 GB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemoryUnit {
    bytes: u64,
}

impl MemoryUnit {
    const UNITS: [&'static str; 7] = ["B", "KB", "MB", "GB", "TB", "PB", "EB"];

    /// Create a quantity from bytes.
    pub const fn from_bytes(bytes: u64) -> Self {
        Self { bytes }
    }

    /// Create a quantity from kibibytes.
    pub const fn from_kb(kb: u64) -> Self {
        Self::from_bytes(kb << 10)
    }

    /// Create a quantity from mebibytes.
    pub const fn from_mb(mb: u64) -> Self {
        Self::from_bytes(mb << 20)
    }

    /// Create a quantity from gibibytes.
    pub const fn from_gb(gb: u64) -> Self {
        Self::from_bytes(gb << 30)
    }

    /// Create a quantity from tebibytes.
    pub const fn from_tb(tb: u64) -> Self {
        Self::from_bytes(tb << 40)
    }

    /// Size in bytes.
    pub const fn as_bytes(&self) -> u64 {
        self.bytes
    }

    /// Parse a host memory literal such as `8.GB` or `512.MB`.
    pub fn parse_literal(raw: &str) -> Option<Self> {
        let (count, unit) = split_literal(raw)?;
        let shift = Self::UNITS
            .iter()
            .position(|u| u.eq_ignore_ascii_case(unit))?
            * 10;
        count
            .checked_mul(1u64.checked_shl(u32::try_from(shift).ok()?)?)
            .map(Self::from_bytes)
    }
}

/// Split `<digits>.<unit>` into its count and unit.
fn split_literal(raw: &str) -> Option<(u64, &str)> {
    let (count, unit) = raw.split_once('.')?;
    if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) || unit.is_empty() {
        return None;
    }
    Some((count.parse().ok()?, unit))
}

impl fmt::Display for MemoryUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bytes == 0 {
            return f.write_str("0");
        }
        let mut scaled = self.bytes as f64;
        let mut unit = 0;
        while scaled >= 1024.0 && unit < Self::UNITS.len() - 1 {
            scaled /= 1024.0;
            unit += 1;
        }
        let rounded = (scaled * 10.0).round() / 10.0;
        write!(f, "{rounded} {}", Self::UNITS[unit])
    }
}

// ---------------------------------------------------------------------------
// ParamValue
// ---------------------------------------------------------------------------

/// A single supplied parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Explicit null.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Integer or floating-point number.
    Number(Number),
    /// Free text, paths, identifiers.
    String(String),
    /// Time span.
    Duration(Duration),
    /// Memory quantity.
    Memory(MemoryUnit),
    /// Ordered list of JSON values.
    List(Vec<Value>),
    /// Map-like structured value.
    Structured(Map<String, Value>),
}

impl ParamValue {
    /// Infer a value from a raw command-line string.
    ///
    /// `true`/`false` (any case) become booleans, plain decimal literals
    /// become numbers, host duration (`2.h`) and memory (`8.GB`) literals
    /// become durations and memory quantities, everything else stays a
    /// string.
    pub fn parse_scalar(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        if looks_numeric(raw) {
            if let Ok(n) = raw.parse::<i64>() {
                return Self::Number(Number::from(n));
            }
            if let Some(n) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
                return Self::Number(n);
            }
        }
        if let Some(duration) = Duration::parse_literal(raw) {
            return Self::Duration(duration);
        }
        if let Some(memory) = MemoryUnit::parse_literal(raw) {
            return Self::Memory(memory);
        }
        Self::String(raw.to_string())
    }

    /// Truthiness under host semantics.
    ///
    /// Null, `false`, zero, empty strings and empty collections are falsy.
    /// Durations and memory quantities are always truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Self::String(s) => !s.is_empty(),
            Self::Duration(_) | Self::Memory(_) => true,
            Self::List(items) => !items.is_empty(),
            Self::Structured(map) => !map.is_empty(),
        }
    }

    /// Short name of the value kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Duration(_) => "duration",
            Self::Memory(_) => "memory",
            Self::List(_) => "list",
            Self::Structured(_) => "structured",
        }
    }

    /// Borrow the inner text of a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The JSON form of this value as supplied.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::Duration(d) => Value::String(d.to_string()),
            Self::Memory(m) => Value::String(m.to_string()),
            Self::List(items) => Value::Array(items.clone()),
            Self::Structured(map) => Value::Object(map.clone()),
        }
    }

    /// The JSON form handed to the structural validator.
    pub fn normalized(&self) -> Value {
        match self {
            Self::Duration(d) => Value::String(d.canonical_string()),
            Self::Memory(m) => Value::String(m.to_string()),
            Self::Structured(map) => Value::String(Value::Object(map.clone()).to_string()),
            other => other.to_json(),
        }
    }
}

fn looks_numeric(raw: &str) -> bool {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    let mut seen_dot = false;
    !digits.is_empty()
        && !digits.starts_with('.')
        && !digits.ends_with('.')
        && digits.chars().all(|c| match c {
            '0'..='9' => true,
            '.' if !seen_dot => {
                seen_dot = true;
                true
            }
            _ => false,
        })
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Duration(d) => write!(f, "{d}"),
            Self::Memory(m) => write!(f, "{m}"),
            Self::List(_) | Self::Structured(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items),
            Value::Object(map) => Self::Structured(map),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        Self::Number(Number::from(n))
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        Self::Number(Number::from(n))
    }
}

impl From<Duration> for ParamValue {
    fn from(d: Duration) -> Self {
        Self::Duration(d)
    }
}

impl From<MemoryUnit> for ParamValue {
    fn from(m: MemoryUnit) -> Self {
        Self::Memory(m)
    }
}

/// Render a JSON value the way diagnostics display parameter values:
/// strings without quotes, everything else as compact JSON.
pub fn display_json(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// ParameterSet
// ---------------------------------------------------------------------------

/// The live parameter set, in the order parameters were supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    values: IndexMap<String, ParamValue>,
}

impl ParameterSet {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a parameter set from a parsed document whose top level must be
    /// a mapping. `origin` names the document in error messages.
    pub fn from_document(document: Value, origin: &str) -> Result<Self, ParamError> {
        match document {
            Value::Object(map) => Ok(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
            Value::Null => Ok(Self::new()),
            _ => Err(ParamError::NotAMapping {
                path: origin.to_string(),
            }),
        }
    }

    /// Load a parameter set from a YAML or JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ParamError> {
        let document: Value = read_structured(path).map_err(|reason| ParamError::ParamsLoad {
            path: path.display().to_string(),
            reason,
        })?;
        Self::from_document(document, &path.display().to_string())
    }

    /// Insert or replace a parameter, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        self.values.insert(name.into(), value.into())
    }

    /// Apply a `KEY=VALUE` override, inferring the value kind.
    pub fn apply_override(&mut self, raw: &str) -> Result<(), ParamError> {
        let (key, value) = raw
            .split_once('=')
            .filter(|(k, _)| !k.trim().is_empty())
            .ok_or_else(|| ParamError::InvalidOverride(raw.to_string()))?;
        let key = key.trim().trim_start_matches('-');
        tracing::debug!(param = key, "applying parameter override");
        self.insert(key, ParamValue::parse_scalar(value));
        Ok(())
    }

    /// Look up a parameter.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Returns true if the parameter was supplied.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns true if the parameter was supplied with a truthy value.
    pub fn is_truthy(&self, name: &str) -> bool {
        self.get(name).is_some_and(ParamValue::is_truthy)
    }

    /// Returns the number of supplied parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no parameters were supplied.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate supplied parameter names in supply order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterate `(name, value)` pairs in supply order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The whole set as a JSON object, values as supplied.
    pub fn to_json(&self) -> Value {
        Value::Object(self.values.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
    }

    /// Produce the cleaned document handed to the structural validator.
    ///
    /// Falsy values are dropped; the remaining values are normalized.
    pub fn cleaned(&self) -> Map<String, Value> {
        let mut cleaned = Map::with_capacity(self.values.len());
        for (name, value) in &self.values {
            if !value.is_truthy() {
                tracing::debug!(param = %name, kind = value.kind(), "dropping falsy parameter before validation");
                continue;
            }
            cleaned.insert(name.clone(), value.normalized());
        }
        cleaned
    }
}

impl FromIterator<(String, ParamValue)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = indexmap::map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

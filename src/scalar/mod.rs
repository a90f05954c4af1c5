//! Scalar resolution (spec.md §6): the pure post-processing boundary
//! function that turns a leaf scalar string the interpreter produced into a
//! typed value, dispatched by a fixed, ordered table of regexes rather than
//! by reflection.
//!
//! The schemas and their accepted literal forms are grounded in
//! `examples/original_source/node.py`'s `parse_bool` / `parse_int` /
//! `parse_float` / `parse_timestamp` / `parse_binary` family — see
//! DESIGN.md for the handful of places this module's behavior is adapted
//! (nanosecond vs. the original's seven-digit fraction padding) or
//! deliberately diverges (spec.md's documented fallback order instead of
//! node.py's `node_value` order).
#[cfg(test)]
mod tests;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

/// A resolved scalar value. `Str` is both a schema of its own (spec.md's
/// ordered list) and the universal fallback when nothing else matches.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Timestamp(DateTime<FixedOffset>),
    Binary(Vec<u8>),
    Str(String),
}

/// One of the seven schema names a caller may force via [resolve_as] or
/// [resolve_tagged], in the order spec.md §6 lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Null,
    Bool,
    Int,
    Float,
    Timestamp,
    Binary,
    Str,
}

impl Schema {
    pub const ORDER: [Schema; 7] = [
        Schema::Null,
        Schema::Bool,
        Schema::Int,
        Schema::Float,
        Schema::Timestamp,
        Schema::Binary,
        Schema::Str,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Schema::Null => "null",
            Schema::Bool => "bool",
            Schema::Int => "int",
            Schema::Float => "float",
            Schema::Timestamp => "timestamp",
            Schema::Binary => "binary",
            Schema::Str => "str",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ORDER.into_iter().find(|s| s.name() == name)
    }
}

/// Emitted by [resolve_tagged] when the caller's tag string names no known
/// schema (spec.md §7: "the scalar resolver's `kind-not-recognized` error
/// propagates to the caller unchanged").
#[derive(Debug, Clone)]
pub struct UnknownSchema(pub String);

impl Display for UnknownSchema {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "schema '{}' is not recognized", self.0)
    }
}

impl std::error::Error for UnknownSchema {}

/// `resolve(scalar_text, tag?) -> value` (spec.md §1/§6), the untagged case:
/// try every schema in spec.md's ordered list and return the first match,
/// falling back to the scalar text itself (the `str` schema always
/// matches).
pub fn resolve(text: &str) -> Value {
    for schema in Schema::ORDER {
        if let Some(value) = try_schema(text, schema) {
            return value;
        }
    }
    unreachable!("Schema::Str always matches")
}

/// The tagged case: resolve `text` against exactly one named schema,
/// returning [UnknownSchema] for an unrecognized tag and `None` (schema
/// named but the text doesn't fit it) otherwise.
pub fn resolve_tagged(text: &str, tag: &str) -> Result<Option<Value>, UnknownSchema> {
    let schema = Schema::from_name(tag).ok_or_else(|| UnknownSchema(tag.to_string()))?;
    Ok(try_schema(text, schema))
}

/// Resolve against one already-known [Schema], skipping the tag lookup.
pub fn resolve_as(text: &str, schema: Schema) -> Option<Value> {
    try_schema(text, schema)
}

fn try_schema(text: &str, schema: Schema) -> Option<Value> {
    match schema {
        Schema::Null => try_null(text),
        Schema::Bool => try_bool(text),
        Schema::Int => try_int(text),
        Schema::Float => try_float(text),
        Schema::Timestamp => try_timestamp(text),
        Schema::Binary => try_binary(text),
        Schema::Str => Some(Value::Str(text.to_string())),
    }
}

static NULL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:~|null|Null|NULL)$").unwrap());
static BOOL_TRUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:y|Y|yes|Yes|YES|true|True|TRUE|on|On|ON)$").unwrap()
});
static BOOL_FALSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:n|N|no|No|NO|false|False|FALSE|off|Off|OFF)$").unwrap()
});

fn try_null(text: &str) -> Option<Value> {
    if text.is_empty() || NULL_RE.is_match(text) {
        Some(Value::Null)
    } else {
        None
    }
}

fn try_bool(text: &str) -> Option<Value> {
    if BOOL_TRUE_RE.is_match(text) {
        Some(Value::Bool(true))
    } else if BOOL_FALSE_RE.is_match(text) {
        Some(Value::Bool(false))
    } else {
        None
    }
}

static INT_BIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0b([01_]+)$").unwrap());
static INT_OCT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0([0-7_]+)$").unwrap());
static INT_DEC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(0|[1-9][0-9_]*)$").unwrap());
static INT_HEX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x([0-9a-fA-F_]+)$").unwrap());
static INT_SEXAGESIMAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9][0-9_]*(?::[0-5]?[0-9])+$").unwrap());

/// Split a sign off the front of a scalar, returning `(multiplier, rest)`.
fn split_sign(s: &str) -> (i64, &str) {
    match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => (1, s),
    }
}

fn try_int(text: &str) -> Option<Value> {
    let (mult, rest) = split_sign(text);
    if rest.is_empty() {
        return None;
    }
    if let Some(caps) = INT_BIN_RE.captures(rest) {
        let digits = caps[1].replace('_', "");
        return i64::from_str_radix(&digits, 2).ok().map(|n| Value::Int(mult * n));
    }
    if let Some(caps) = INT_OCT_RE.captures(rest) {
        let digits = caps[1].replace('_', "");
        return i64::from_str_radix(&digits, 8).ok().map(|n| Value::Int(mult * n));
    }
    if let Some(caps) = INT_DEC_RE.captures(rest) {
        let digits = caps[1].replace('_', "");
        return digits.parse::<i64>().ok().map(|n| Value::Int(mult * n));
    }
    if let Some(caps) = INT_HEX_RE.captures(rest) {
        let digits = caps[1].replace('_', "");
        return i64::from_str_radix(&digits, 16).ok().map(|n| Value::Int(mult * n));
    }
    if INT_SEXAGESIMAL_RE.is_match(rest) {
        let mut n: i64 = 0;
        for part in rest.split(':') {
            let digits = part.replace('_', "");
            n = n.checked_mul(60)?.checked_add(digits.parse::<i64>().ok()?)?;
        }
        return Some(Value::Int(mult * n));
    }
    None
}

static FLOAT_ZERO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0+$").unwrap());
static FLOAT_NAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.(?:nan|NaN|NAN)$").unwrap());
static FLOAT_INF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.(?:inf|Inf|INF)$").unwrap());
static FLOAT_DECIMAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9][0-9_]*)?\.[0-9_]*(?:[eE][-+][0-9]+)?$").unwrap());
static FLOAT_SEXAGESIMAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9][0-9_]*(?::[0-5]?[0-9])+\.[0-9_]*$").unwrap());

fn try_float(text: &str) -> Option<Value> {
    // `.nan` is checked before sign stripping: YAML's NaN literal never
    // takes a sign, unlike `.inf` (node.py's `parse_float` mirrors this).
    if FLOAT_ZERO_RE.is_match(text) {
        return Some(Value::Float(0.0));
    }
    if FLOAT_NAN_RE.is_match(text) {
        return Some(Value::Float(f64::NAN));
    }
    let (mult, rest) = split_sign(text);
    let mult = mult as f64;
    if FLOAT_INF_RE.is_match(rest) {
        return Some(Value::Float(mult * f64::INFINITY));
    }
    if FLOAT_DECIMAL_RE.is_match(rest) {
        if rest == "." {
            return None;
        }
        let cleaned = rest.replace('_', "");
        return cleaned.parse::<f64>().ok().map(|n| Value::Float(mult * n));
    }
    if FLOAT_SEXAGESIMAL_RE.is_match(rest) {
        let mut acc = 0.0f64;
        for part in rest.split(':') {
            let cleaned = part.replace('_', "");
            acc = acc * 60.0 + cleaned.parse::<f64>().ok()?;
        }
        return Some(Value::Float(mult * acc));
    }
    None
}

static TS_DATE_ONLY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").unwrap());
static TS_FULL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)^
        ([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})   # year, month, day
        (?:[Tt]|[ \t]+)
        ([0-9]{1,2}):([0-9]{2}):([0-9]{2})     # hour, minute, second
        (?:\.([0-9]*))?                        # fraction
        [ \t]*
        (?:
            (Z)
            |([-+])([0-9]{1,2})(?::([0-9]{2}))?
        )?
        $",
    )
    .unwrap()
});

fn try_timestamp(text: &str) -> Option<Value> {
    if let Some(caps) = TS_DATE_ONLY_RE.captures(text) {
        let y: i32 = caps[1].parse().ok()?;
        let m: u32 = caps[2].parse().ok()?;
        let d: u32 = caps[3].parse().ok()?;
        let date = NaiveDate::from_ymd_opt(y, m, d)?;
        let naive = date.and_hms_opt(0, 0, 0)?;
        let utc = FixedOffset::east_opt(0)?;
        return Some(Value::Timestamp(utc.from_utc_datetime(&naive)));
    }
    let caps = TS_FULL_RE.captures(text)?;
    let y: i32 = caps[1].parse().ok()?;
    let mo: u32 = caps[2].parse().ok()?;
    let d: u32 = caps[3].parse().ok()?;
    let h: u32 = caps[4].parse().ok()?;
    let mi: u32 = caps[5].parse().ok()?;
    let s: u32 = caps[6].parse().ok()?;
    let nanos: u32 = match caps.get(7) {
        Some(m) if !m.as_str().is_empty() => {
            let mut digits = m.as_str().to_string();
            digits.truncate(9);
            while digits.len() < 9 {
                digits.push('0');
            }
            digits.parse().ok()?
        }
        _ => 0,
    };
    let date = NaiveDate::from_ymd_opt(y, mo, d)?;
    let time = NaiveTime::from_hms_nano_opt(h, mi, s, nanos)?;
    let naive = date.and_time(time);

    // spec.md §6: "Timestamp without timezone defaults to UTC"; a bare `Z`
    // means `+00:00`; a numeric offset without minutes implies `:00`.
    let offset = if caps.get(8).is_some() {
        FixedOffset::east_opt(0)?
    } else if let Some(sign) = caps.get(9) {
        let sign = if sign.as_str() == "-" { -1 } else { 1 };
        let oh: i32 = caps[10].parse().ok()?;
        let om: i32 = caps
            .get(11)
            .map(|m| m.as_str().parse().unwrap_or(0))
            .unwrap_or(0);
        FixedOffset::east_opt(sign * (oh * 3600 + om * 60))?
    } else {
        FixedOffset::east_opt(0)?
    };
    let dt: DateTime<FixedOffset> = offset.from_local_datetime(&naive).single()?;
    Some(Value::Timestamp(dt))
}

fn try_binary(text: &str) -> Option<Value> {
    use base64::Engine;
    let stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(stripped)
        .ok()
        .map(Value::Binary)
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Wait conditions: field paths into a document, expected values and timeouts.

use crate::constants::wait::INDEFINITE_TIMEOUT_SECS;
use crate::error::{CrError, Result};
use crate::types::document::ResourceDocument;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// A dot/bracket path such as `status.conditions[0].type` or
/// `metadata.labels["app.kubernetes.io/name"]`
#[derive(Clone, Debug)]
pub struct FieldPath {
    raw: String,
    segments: Vec<PathSegment>,
}

impl PartialEq for FieldPath {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl Eq for FieldPath {}

impl FieldPath {
    pub fn parse(path: &str) -> Result<Self> {
        let invalid = |reason: &str| CrError::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut chars = path.chars().peekable();
        // Whether a key is required next (start of path or right after a dot)
        let mut expect_key = true;

        while let Some(&c) = chars.peek() {
            match c {
                '.' => {
                    if expect_key {
                        return Err(invalid("empty segment"));
                    }
                    chars.next();
                    expect_key = true;
                }
                '[' => {
                    if expect_key && !segments.is_empty() {
                        return Err(invalid("empty segment before '['"));
                    }
                    chars.next();
                    let segment = match chars.peek() {
                        Some(&quote) if quote == '"' || quote == '\'' => {
                            chars.next();
                            let mut key = String::new();
                            loop {
                                match chars.next() {
                                    Some(ch) if ch == quote => break,
                                    Some(ch) => key.push(ch),
                                    None => return Err(invalid("unterminated quoted key")),
                                }
                            }
                            PathSegment::Key(key)
                        }
                        _ => {
                            let mut digits = String::new();
                            while let Some(&ch) = chars.peek() {
                                if ch == ']' {
                                    break;
                                }
                                digits.push(ch);
                                chars.next();
                            }
                            let index = digits
                                .parse::<usize>()
                                .map_err(|_| invalid("index must be a non-negative integer"))?;
                            PathSegment::Index(index)
                        }
                    };
                    if chars.next() != Some(']') {
                        return Err(invalid("missing ']'"));
                    }
                    segments.push(segment);
                    expect_key = false;
                }
                ']' => return Err(invalid("unexpected ']'")),
                _ => {
                    if !expect_key {
                        return Err(invalid("expected '.' or '[' between segments"));
                    }
                    let mut key = String::new();
                    while let Some(&ch) = chars.peek() {
                        if ch == '.' || ch == '[' || ch == ']' {
                            break;
                        }
                        key.push(ch);
                        chars.next();
                    }
                    segments.push(PathSegment::Key(key));
                    expect_key = false;
                }
            }
        }

        if segments.is_empty() {
            return Err(invalid("path is empty"));
        }
        if expect_key {
            return Err(invalid("trailing '.'"));
        }

        Ok(FieldPath {
            raw: path.to_string(),
            segments,
        })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl FromStr for FieldPath {
    type Err = CrError;

    fn from_str(s: &str) -> Result<Self> {
        FieldPath::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// How long a single condition may take to become true
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitTimeout {
    /// Check exactly once
    Once,
    After(Duration),
    /// Wait up to the one week ceiling
    Indefinite,
}

impl WaitTimeout {
    /// Positive timeouts never exceed the one week ceiling
    pub fn deadline_from(&self, start: Instant) -> Instant {
        let wait = match self {
            WaitTimeout::Once => return start,
            WaitTimeout::After(d) => (*d).min(ceiling()),
            WaitTimeout::Indefinite => ceiling(),
        };
        start.checked_add(wait).unwrap_or(start)
    }

    /// Parse `"0"`, a humantime duration like `"30s"`, plain seconds, or a
    /// negative value for an indefinite wait
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if let Some(rest) = value.strip_prefix('-') {
            return match parse_duration(rest) {
                Some(d) if !d.is_zero() => Ok(WaitTimeout::Indefinite),
                _ => Err(CrError::InvalidTimeout(value.to_string())),
            };
        }
        parse_duration(value)
            .map(WaitTimeout::from)
            .ok_or_else(|| CrError::InvalidTimeout(value.to_string()))
    }
}

fn ceiling() -> Duration {
    Duration::from_secs(INDEFINITE_TIMEOUT_SECS)
}

fn parse_duration(value: &str) -> Option<Duration> {
    value
        .parse::<u64>()
        .map(Duration::from_secs)
        .ok()
        .or_else(|| humantime::parse_duration(value).ok())
}

impl From<Duration> for WaitTimeout {
    fn from(d: Duration) -> Self {
        if d.is_zero() {
            WaitTimeout::Once
        } else {
            WaitTimeout::After(d.min(ceiling()))
        }
    }
}

impl fmt::Display for WaitTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitTimeout::Once => f.write_str("0s"),
            WaitTimeout::After(d) => write!(f, "{}", humantime::format_duration(*d)),
            WaitTimeout::Indefinite => f.write_str("indefinite"),
        }
    }
}

/// A predicate on the live object: `path` resolves (to `expected_value` if set)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConditionSpec {
    pub path: FieldPath,
    pub expected_value: Option<String>,
    pub timeout: WaitTimeout,
}

impl ConditionSpec {
    pub fn new(path: &str, expected_value: Option<&str>, timeout: WaitTimeout) -> Result<Self> {
        Ok(ConditionSpec {
            path: FieldPath::parse(path)?,
            expected_value: expected_value.map(String::from),
            timeout,
        })
    }

    /// Parse `path=value` or a bare `path`. The split happens at the first
    /// `=` outside a bracketed key, so values may contain `=`.
    pub fn parse(input: &str, timeout: WaitTimeout) -> Result<Self> {
        match split_expected(input) {
            Some((path, value)) => ConditionSpec::new(path.trim(), Some(value.trim()), timeout),
            None => ConditionSpec::new(input.trim(), None, timeout),
        }
    }

    pub fn is_satisfied(&self, document: &ResourceDocument) -> bool {
        let Some(actual) = document.get(&self.path) else {
            return false;
        };

        match &self.expected_value {
            Some(expected) => scalar_string(actual).is_some_and(|s| s == *expected),
            None => !is_empty_value(actual),
        }
    }
}

impl fmt::Display for ConditionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expected_value {
            Some(v) => write!(f, "{}={}", self.path, v),
            None => write!(f, "{}", self.path),
        }
    }
}

fn split_expected(input: &str) -> Option<(&str, &str)> {
    let mut in_bracket = false;
    let mut quote: Option<char> = None;

    for (i, c) in input.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' if in_bracket => quote = Some(c),
                '[' => in_bracket = true,
                ']' => in_bracket = false,
                '=' if !in_bracket => return Some((&input[..i], &input[i + 1..])),
                _ => {}
            },
        }
    }
    None
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

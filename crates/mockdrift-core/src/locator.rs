//! Schema lookup by request coordinates.

use crate::spec::{PathItem, SpecDocument};
use serde_json::Value;
use std::fmt;

/// Default method for checks that don't name one.
pub const DEFAULT_METHOD: &str = "get";
/// Default status for checks that don't name one.
pub const DEFAULT_STATUS: &str = "200";

/// The request a payload belongs to: path, method and response status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    pub path: String,
    pub method: String,
    pub status: String,
}

impl Coordinates {
    /// `GET path`, status `200`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: DEFAULT_METHOD.to_string(),
            status: DEFAULT_STATUS.to_string(),
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn status(mut self, status: impl ToString) -> Self {
        self.status = status.to_string();
        self
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}]",
            self.method.to_uppercase(),
            self.path,
            self.status
        )
    }
}

/// A response schema found for some coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedSchema {
    /// The path template that matched, e.g. `/users/{id}` for `/users/42`.
    pub template: String,
    /// The fully resolved schema.
    pub schema: Value,
}

impl SpecDocument {
    /// Find the resolved response schema for `coords`. `None` when the path,
    /// method, status or schema is absent; that is not an error.
    pub fn find_schema(&self, coords: &Coordinates) -> Option<LocatedSchema> {
        let item = self.match_path_item(&coords.path)?;
        let raw = item
            .operation(&coords.method)?
            .response(&coords.status)?
            .raw_schema()?;

        Some(LocatedSchema {
            template: item.template.clone(),
            schema: self.resolve_schema(raw),
        })
    }

    /// The path template `concrete` falls under, if any.
    pub fn match_path(&self, concrete: &str) -> Option<&str> {
        self.match_path_item(concrete).map(|item| item.template.as_str())
    }

    fn match_path_item(&self, concrete: &str) -> Option<&PathItem> {
        if let Some(exact) = self.path_item(concrete) {
            return Some(exact);
        }

        let mut best: Option<(&PathItem, usize)> = None;
        for item in self.paths() {
            let Some(literals) = template_match(&item.template, concrete) else {
                continue;
            };
            if best.is_none_or(|(_, score)| literals > score) {
                best = Some((item, literals));
            }
        }
        best.map(|(item, _)| item)
    }
}

/// Number of literal segments when `template` matches `concrete`.
fn template_match(template: &str, concrete: &str) -> Option<usize> {
    let template_segments: Vec<&str> = template.split('/').collect();
    let concrete_segments: Vec<&str> = concrete.split('/').collect();
    if template_segments.len() != concrete_segments.len() {
        return None;
    }

    let mut literals = 0;
    for (t, c) in template_segments.iter().zip(&concrete_segments) {
        if is_placeholder(t) {
            if c.is_empty() {
                return None;
            }
        } else if t == c {
            literals += 1;
        } else {
            return None;
        }
    }
    Some(literals)
}

fn is_placeholder(segment: &str) -> bool {
    segment.len() > 2 && segment.starts_with('{') && segment.ends_with('}')
}

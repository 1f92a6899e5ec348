//! URL pattern matching and matched route entries.

use std::fmt;

use crate::foundation::error::{RouterError, RouterResult};
use crate::navigation::config::RouteConfig;

/// Route parameters: path captures, query values and navigation params.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Render a param value the way it appears in a URL.
pub fn param_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// Compiled path pattern: literal segments, `:name` captures and an optional trailing `*`.
#[derive(Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
    wildcard: bool,
}

impl fmt::Debug for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoutePattern({:?})", self.raw)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

impl RoutePattern {
    pub fn parse(raw: &str) -> RouterResult<Self> {
        if !raw.starts_with('/') {
            return Err(RouterError::config(format!(
                "route pattern '{raw}' must start with '/'"
            )));
        }
        let parts: Vec<&str> = split_path(raw).collect();
        let mut segments = Vec::with_capacity(parts.len());
        let mut wildcard = false;
        for (i, part) in parts.iter().enumerate() {
            if *part == "*" {
                if i + 1 != parts.len() {
                    return Err(RouterError::config(format!(
                        "'*' must be the last segment of '{raw}'"
                    )));
                }
                wildcard = true;
            } else if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    return Err(RouterError::config(format!(
                        "empty parameter name in '{raw}'"
                    )));
                }
                segments.push(Segment::Param(name.to_string()));
            } else {
                segments.push(Segment::Literal((*part).to_string()));
            }
        }
        Ok(Self {
            raw: raw.to_string(),
            segments,
            wildcard,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a pathname (query string ignored) and return its captures.
    pub fn matches(&self, pathname: &str) -> Option<Params> {
        let (path, _) = split_query(pathname);
        let parts: Vec<&str> = split_path(path).collect();
        if parts.len() < self.segments.len()
            || (!self.wildcard && parts.len() != self.segments.len())
        {
            return None;
        }
        let mut params = Params::new();
        for (seg, part) in self.segments.iter().zip(&parts) {
            match seg {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), serde_json::Value::String((*part).to_string()));
                }
            }
        }
        if self.wildcard {
            let rest = parts[self.segments.len()..].join("/");
            params.insert("*".to_string(), serde_json::Value::String(rest));
        }
        Some(params)
    }
}

/// Split `path?query` into its two halves.
pub fn split_query(pathname: &str) -> (&str, Option<&str>) {
    match pathname.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (pathname, None),
    }
}

/// Deserialize a query string into params. Repeated keys keep the last value; values that parse
/// as JSON scalars (numbers, booleans) are stored as such.
pub fn parse_query(query: &str) -> Params {
    let mut params = Params::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        let value = match serde_json::from_str::<serde_json::Value>(v) {
            Ok(n @ (serde_json::Value::Number(_) | serde_json::Value::Bool(_))) => n,
            _ => serde_json::Value::String(v.to_string()),
        };
        params.insert(k.to_string(), value);
    }
    params
}

/// A pattern matched against a concrete location.
#[derive(Clone, Debug, Default)]
pub struct RouteEntry {
    /// `None` for the fallback route.
    pub pattern: Option<String>,
    pub resolved_pathname: String,
    pub params: Params,
    pub config: RouteConfig,
}

impl RouteEntry {
    /// Merge `params` over the current ones.
    pub fn set_params(&mut self, params: Params) {
        for (k, v) in params {
            self.params.insert(k, v);
        }
    }

    pub fn set_config(&mut self, config: RouteConfig) {
        self.config = config;
    }

    pub fn param(&self, name: &str) -> Option<String> {
        self.params.get(name).map(param_text)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/navigation/route.rs"]
mod tests;

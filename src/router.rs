//! Linear path-pattern router
//!
//! Routes are matched in registration order against a small fixed table.
//! A pattern is a `/`-separated list of literal segments and `{name}`
//! parameter segments. The first route whose method, segment count and
//! literal segments all agree wins; there is no specificity ranking.

use axum::http::Method;
use std::collections::HashMap;
use thiserror::Error;

/// Routing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("no route matches {method} {path}")]
    NotFound { method: Method, path: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    /// `{}`: a parameter without a name, never matches
    Unnamed,
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some("") => Segment::Unnamed,
            Some(name) => Segment::Param(name.to_string()),
            None => Segment::Literal(raw.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
struct Route<T> {
    method: Method,
    pattern: String,
    segments: Vec<Segment>,
    handler: T,
}

/// Result of a successful dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    pub handler: &'a T,
    pub pattern: &'a str,
    pub params: HashMap<String, String>,
}

impl<T> RouteMatch<'_, T> {
    /// Value bound to the `{name}` segment, if the pattern has one
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Split a path or pattern into segments, ignoring leading and trailing slashes
fn split_path(path: &str) -> Vec<&str> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

/// Method + path pattern router over handler values of type `T`
#[derive(Debug, Clone)]
pub struct PathRouter<T> {
    routes: Vec<Route<T>>,
}

impl<T> Default for PathRouter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PathRouter<T> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Register a route. Later registrations never shadow earlier ones.
    pub fn register(&mut self, method: Method, pattern: &str, handler: T) -> &mut Self {
        let segments = split_path(pattern).into_iter().map(Segment::parse).collect();
        self.routes.push(Route {
            method,
            pattern: pattern.to_string(),
            segments,
            handler,
        });
        self
    }

    /// Builder-style variant of [`register`](Self::register)
    pub fn route(mut self, method: Method, pattern: &str, handler: T) -> Self {
        self.register(method, pattern, handler);
        self
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Find the first registered route matching `method` and `path`
    pub fn dispatch(&self, method: &Method, path: &str) -> Result<RouteMatch<'_, T>, RouteError> {
        let actual = split_path(path);

        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| {
                Self::match_segments(&route.segments, &actual).map(|params| RouteMatch {
                    handler: &route.handler,
                    pattern: &route.pattern,
                    params,
                })
            })
            .ok_or_else(|| RouteError::NotFound {
                method: method.clone(),
                path: path.to_string(),
            })
    }

    fn match_segments(pattern: &[Segment], actual: &[&str]) -> Option<HashMap<String, String>> {
        if pattern.len() != actual.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, value) in pattern.iter().zip(actual) {
            match segment {
                Segment::Literal(literal) if literal == value => {}
                Segment::Literal(_) | Segment::Unnamed => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), (*value).to_string());
                }
            }
        }
        Some(params)
    }
}

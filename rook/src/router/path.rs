//! Path pattern compilation and matching.
//!
//! Patterns are absolute and made of static segments and `:name` parameter segments.
//! Matching is segment-wise, so `/a` never matches `/ab`, and a parameter never matches an
//! empty segment.

use std::collections::BTreeMap;

use super::error::RouterError;

/// Parameters captured while matching a path, keyed by parameter name.
pub type Params = BTreeMap<String, String>;

/// Matching flags shared by every pattern of a route table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathOptions {
    /// Compare static segments case-sensitively.
    pub sensitive: bool,
    /// Treat a trailing slash as significant.
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// A compiled route path.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
    trailing_slash: bool,
}

impl PathPattern {
    /// Compile a path pattern such as `/`, `/games` or `/games/:id`.
    pub fn parse(path: &str) -> Result<Self, RouterError> {
        let invalid = |reason: &str| RouterError::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        if !path.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }

        let trailing_slash = path.len() > 1 && path.ends_with('/');
        let body = path[1..].strip_suffix('/').unwrap_or(&path[1..]);

        let mut segments = Vec::new();
        if !body.is_empty() {
            for raw in body.split('/') {
                if raw.is_empty() {
                    return Err(invalid("empty segment"));
                }
                if let Some(name) = raw.strip_prefix(':') {
                    if name.is_empty() {
                        return Err(invalid("parameter without a name"));
                    }
                    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                        return Err(invalid("parameter names use [A-Za-z0-9_]"));
                    }
                    if segments
                        .iter()
                        .any(|s| matches!(s, Segment::Param(existing) if existing == name))
                    {
                        return Err(invalid("repeated parameter name"));
                    }
                    segments.push(Segment::Param(name.to_string()));
                } else {
                    segments.push(Segment::Static(raw.to_string()));
                }
            }
        }

        Ok(Self {
            source: path.to_string(),
            segments,
            trailing_slash,
        })
    }

    /// The pattern as written in the route record.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Names of the parameters in declaration order.
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Static(_) => None,
        })
    }

    /// Normalized form used to detect two patterns that would match the same URLs.
    pub fn shape(&self, options: PathOptions) -> String {
        let mut shape = String::from("/");
        let parts: Vec<String> = self
            .segments
            .iter()
            .map(|s| match s {
                Segment::Param(_) => ":".to_string(),
                Segment::Static(text) if options.sensitive => text.clone(),
                Segment::Static(text) => text.to_lowercase(),
            })
            .collect();
        shape.push_str(&parts.join("/"));
        if options.strict && self.trailing_slash {
            shape.push('/');
        }
        shape
    }

    /// Ranking key: static segments outrank parameters position by position.
    pub fn score(&self) -> Vec<u8> {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Static(_) => 1,
                Segment::Param(_) => 0,
            })
            .collect()
    }

    /// Match a URL path (already stripped of base, query and hash).
    pub fn matches(&self, path: &str, options: PathOptions) -> Option<Params> {
        let body = path.strip_prefix('/')?;
        let has_trailing = path.len() > 1 && path.ends_with('/');
        if options.strict && has_trailing != self.trailing_slash {
            return None;
        }

        let body = body.strip_suffix('/').unwrap_or(body);
        let parts: Vec<&str> = if body.is_empty() {
            Vec::new()
        } else {
            body.split('/').collect()
        };
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Params::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Static(text) => {
                    let equal = if options.sensitive {
                        text == part
                    } else {
                        text.eq_ignore_ascii_case(part)
                    };
                    if !equal {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(params)
    }

    /// Build a concrete path by substituting parameters. Returns the first missing name on error.
    pub fn build(&self, params: &Params) -> Result<String, String> {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Static(text) => path.push_str(text),
                Segment::Param(name) => match params.get(name) {
                    Some(value) if !value.is_empty() => path.push_str(value),
                    _ => return Err(name.clone()),
                },
            }
        }
        if path.is_empty() || self.trailing_slash {
            path.push('/');
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lenient() -> PathOptions {
        PathOptions::default()
    }

    #[test]
    fn test_root_matches_only_root() {
        let root = PathPattern::parse("/").unwrap();
        assert!(root.matches("/", lenient()).is_some());
        assert!(root.matches("/missing", lenient()).is_none());
        assert_eq!(root.shape(lenient()), "/");
    }

    #[test]
    fn test_params_are_captured() {
        let pattern = PathPattern::parse("/games/:id/moves/:ply").unwrap();
        let params = pattern.matches("/games/42/moves/7", lenient()).unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
        assert_eq!(params.get("ply").map(String::as_str), Some("7"));
        assert!(pattern.matches("/games//moves/7", lenient()).is_none());
        assert_eq!(pattern.params().collect::<Vec<_>>(), vec!["id", "ply"]);
    }

    #[test]
    fn test_trailing_slash_and_case() {
        let pattern = PathPattern::parse("/Openings").unwrap();
        assert!(pattern.matches("/openings/", lenient()).is_some());

        let strict = PathOptions { sensitive: true, strict: true };
        assert!(pattern.matches("/openings", strict).is_none());
        assert!(pattern.matches("/Openings/", strict).is_none());
        assert!(pattern.matches("/Openings", strict).is_some());
    }

    #[test]
    fn test_shapes_collapse_equivalent_patterns() {
        let a = PathPattern::parse("/games/:id").unwrap();
        let b = PathPattern::parse("/Games/:slug/").unwrap();
        assert_eq!(a.shape(lenient()), b.shape(lenient()));

        let strict = PathOptions { sensitive: true, strict: true };
        assert_ne!(a.shape(strict), b.shape(strict));
    }

    #[test]
    fn test_static_outranks_param() {
        let fixed = PathPattern::parse("/games/new").unwrap();
        let param = PathPattern::parse("/games/:id").unwrap();
        assert!(fixed.score() > param.score());
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(matches!(
            PathPattern::parse("games"),
            Err(RouterError::InvalidPath { .. })
        ));
        assert!(PathPattern::parse("/a//b").is_err());
        assert!(PathPattern::parse("/:").is_err());
        assert!(PathPattern::parse("/:id/:id").is_err());
        assert!(PathPattern::parse("/:bad-name").is_err());
    }

    #[test]
    fn test_build_substitutes_params() {
        let pattern = PathPattern::parse("/games/:id").unwrap();
        let mut params = Params::new();
        assert_eq!(pattern.build(&params), Err("id".to_string()));
        params.insert("id".into(), "9".into());
        assert_eq!(pattern.build(&params).unwrap(), "/games/9");
        assert_eq!(PathPattern::parse("/").unwrap().build(&Params::new()).unwrap(), "/");
    }
}

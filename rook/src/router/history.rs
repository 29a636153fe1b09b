//! Navigation history strategies.
//!
//! # Addressing
//! ```text
//! Web  (path):      base "/app"  + location "/games?x=1"  →  "/app/games?x=1"
//! Hash (fragment):  base "/app"  + location "/games?x=1"  →  "/app/#/games?x=1"
//! ```
//!
//! The entry stack lives in memory: the terminal has no address bar, so the host feeds browser
//! URLs in through [`History::strip_base`] and reads them back out through
//! [`History::create_href`].

use url::Url;

/// How application locations are encoded into URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// The real URL path carries the location.
    Web,
    /// The URL fragment carries the location.
    Hash,
}

/// Entry stack of application-relative locations plus the addressing strategy.
#[derive(Debug, Clone)]
pub struct History {
    mode: HistoryMode,
    base: String,
    entries: Vec<String>,
    position: usize,
}

/// History backed by the URL path, mounted under `base`.
pub fn create_web_history(base: &str) -> History {
    History::new(HistoryMode::Web, base)
}

/// History backed by the URL fragment, mounted under `base`.
pub fn create_web_hash_history(base: &str) -> History {
    History::new(HistoryMode::Hash, base)
}

/// Normalize a base: leading slash, no trailing slash, `""` for the root.
pub fn normalize_base(base: &str) -> String {
    let trimmed = base.trim();
    let path = match Url::parse(trimmed) {
        Ok(url) if url.has_host() => url.path().to_string(),
        _ => trimmed.to_string(),
    };
    let path = path.trim_end_matches('/');
    if path.is_empty() {
        String::new()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

impl History {
    pub fn new(mode: HistoryMode, base: &str) -> Self {
        Self {
            mode,
            base: normalize_base(base),
            entries: vec!["/".to_string()],
            position: 0,
        }
    }

    pub fn mode(&self) -> HistoryMode {
        self.mode
    }

    /// The normalized base (`""` when mounted at the root).
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The current application-relative location.
    pub fn location(&self) -> &str {
        &self.entries[self.position]
    }

    /// Push a location. Entries ahead of the current position are discarded.
    pub fn push(&mut self, location: impl Into<String>) {
        self.entries.truncate(self.position + 1);
        self.entries.push(location.into());
        self.position = self.entries.len() - 1;
    }

    /// Replace the current entry.
    pub fn replace(&mut self, location: impl Into<String>) {
        self.entries[self.position] = location.into();
    }

    /// The location `delta` entries away, without moving.
    pub fn peek(&self, delta: isize) -> Option<&str> {
        let target = self.position.checked_add_signed(delta)?;
        self.entries.get(target).map(String::as_str)
    }

    /// Move `delta` entries. Returns the new location, or `None` if out of range.
    pub fn go(&mut self, delta: isize) -> Option<&str> {
        let target = self.position.checked_add_signed(delta)?;
        if target >= self.entries.len() {
            return None;
        }
        self.position = target;
        Some(self.location())
    }

    pub fn can_go_back(&self) -> bool {
        self.position > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.position + 1 < self.entries.len()
    }

    /// Number of entries in the stack.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The browser URL for an application location.
    pub fn create_href(&self, location: &str) -> String {
        match self.mode {
            HistoryMode::Web => format!("{}{}", self.base, location),
            HistoryMode::Hash => format!("{}/#{}", self.base, location),
        }
    }

    /// The application location for a browser URL, or `None` if the URL lies outside the base.
    ///
    /// Accepts absolute URLs (`https://host/app/x`) as well as bare paths (`/app/x`).
    pub fn strip_base(&self, url: &str) -> Option<String> {
        let raw = match Url::parse(url) {
            Ok(parsed) if parsed.has_host() => {
                let mut raw = parsed.path().to_string();
                if let Some(query) = parsed.query() {
                    raw.push('?');
                    raw.push_str(query);
                }
                if let Some(fragment) = parsed.fragment() {
                    raw.push('#');
                    raw.push_str(fragment);
                }
                raw
            }
            _ => url.to_string(),
        };

        match self.mode {
            HistoryMode::Web => {
                let rest = self.strip_base_prefix(&raw)?;
                if rest.is_empty() || rest.starts_with('?') || rest.starts_with('#') {
                    Some(format!("/{}", rest))
                } else {
                    Some(rest.to_string())
                }
            }
            HistoryMode::Hash => {
                let (path, fragment) = match raw.split_once('#') {
                    Some((path, fragment)) => (path, Some(fragment)),
                    None => (raw.as_str(), None),
                };
                let rest = self.strip_base_prefix(path)?;
                if !(rest.is_empty() || rest == "/") {
                    return None;
                }
                match fragment {
                    Some(f) if f.starts_with('/') => Some(f.to_string()),
                    Some(f) if !f.is_empty() => Some(format!("/{}", f)),
                    _ => Some("/".to_string()),
                }
            }
        }
    }

    /// Remove the base from `path` on a segment boundary, case-insensitively.
    fn strip_base_prefix<'a>(&self, path: &'a str) -> Option<&'a str> {
        if self.base.is_empty() {
            return Some(path);
        }
        let head = path.get(..self.base.len())?;
        if !head.eq_ignore_ascii_case(&self.base) {
            return None;
        }
        let rest = &path[self.base.len()..];
        match rest.chars().next() {
            None | Some('/') | Some('?') | Some('#') => Some(rest),
            Some(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base("/"), "");
        assert_eq!(normalize_base(""), "");
        assert_eq!(normalize_base("/app/"), "/app");
        assert_eq!(normalize_base("app"), "/app");
        assert_eq!(normalize_base("https://example.com/app/"), "/app");
    }

    #[test]
    fn test_history_navigation() {
        let mut history = create_web_history("/");

        assert_eq!(history.location(), "/");
        assert!(!history.can_go_back());

        history.push("/games");
        history.push("/games/7");
        assert_eq!(history.len(), 3);
        assert!(history.can_go_back());

        assert_eq!(history.go(-1), Some("/games"));
        assert!(history.can_go_forward());
        assert_eq!(history.peek(1), Some("/games/7"));

        history.push("/openings");
        assert!(!history.can_go_forward());
        assert_eq!(history.len(), 3);

        assert_eq!(history.go(-5), None);
        assert_eq!(history.location(), "/openings");

        history.replace("/");
        assert_eq!(history.location(), "/");
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_web_strip_base() {
        let history = create_web_history("/app/");
        assert_eq!(history.strip_base("/app/").as_deref(), Some("/"));
        assert_eq!(history.strip_base("/app").as_deref(), Some("/"));
        assert_eq!(history.strip_base("/app/unknown").as_deref(), Some("/unknown"));
        assert_eq!(history.strip_base("/APP/x?y=1").as_deref(), Some("/x?y=1"));
        assert_eq!(history.strip_base("/app?y=1").as_deref(), Some("/?y=1"));
        assert_eq!(
            history.strip_base("https://example.com/app/games#top").as_deref(),
            Some("/games#top")
        );
        assert_eq!(history.strip_base("/application"), None);
        assert_eq!(history.strip_base("/other"), None);

        let root = create_web_history("/");
        assert_eq!(root.strip_base("/").as_deref(), Some("/"));
        assert_eq!(root.strip_base("/missing").as_deref(), Some("/missing"));
    }

    #[test]
    fn test_hash_strip_base() {
        let history = create_web_hash_history("/app/");
        assert_eq!(history.strip_base("/app/#/games").as_deref(), Some("/games"));
        assert_eq!(history.strip_base("/app/#games").as_deref(), Some("/games"));
        assert_eq!(history.strip_base("/app/").as_deref(), Some("/"));
        assert_eq!(history.strip_base("/app/games"), None);
        assert_eq!(history.strip_base("/elsewhere/#/games"), None);
    }

    #[test]
    fn test_create_href() {
        let web = create_web_history("/app/");
        assert_eq!(web.create_href("/"), "/app/");
        assert_eq!(web.create_href("/games?x=1"), "/app/games?x=1");

        let root = create_web_history("/");
        assert_eq!(root.create_href("/"), "/");

        let hash = create_web_hash_history("/app");
        assert_eq!(hash.create_href("/games"), "/app/#/games");
    }
}

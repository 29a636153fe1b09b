//! Application-relative locations: path, query and hash.

use std::fmt;

use url::Url;

const ORIGIN: &str = "http://rook.invalid/";

/// A parsed location inside the application (base already removed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    query: Option<String>,
    hash: Option<String>,
}

impl Location {
    /// Parse `input` relative to `current`, the path of the current location.
    ///
    /// Absolute inputs (`/games?x=1#top`) ignore `current`; relative inputs (`moves`) resolve
    /// against it the way a link inside the page would.
    pub fn parse(input: &str, current: &str) -> Result<Self, url::ParseError> {
        let origin = Url::parse(ORIGIN)?;
        let current = origin.join(current)?;
        let url = current.join(input)?;
        Ok(Self {
            path: url.path().to_string(),
            query: url.query().filter(|q| !q.is_empty()).map(str::to_string),
            hash: url.fragment().filter(|h| !h.is_empty()).map(str::to_string),
        })
    }

    /// Parse an absolute location.
    pub fn absolute(input: &str) -> Result<Self, url::ParseError> {
        Self::parse(input, "/")
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query string without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Decoded query pairs in order of appearance.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query
            .as_deref()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Fragment without the leading `#`.
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// Path, query and hash joined back together.
    pub fn full_path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        if let Some(hash) = &self.hash {
            write!(f, "#{}", hash)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute() {
        let loc = Location::absolute("/games?side=white&clock=5%2B3#board").unwrap();
        assert_eq!(loc.path(), "/games");
        assert_eq!(loc.query(), Some("side=white&clock=5%2B3"));
        assert_eq!(
            loc.query_pairs(),
            vec![
                ("side".to_string(), "white".to_string()),
                ("clock".to_string(), "5+3".to_string()),
            ]
        );
        assert_eq!(loc.hash(), Some("board"));
        assert_eq!(loc.full_path(), "/games?side=white&clock=5%2B3#board");
    }

    #[test]
    fn test_parse_relative_to_current() {
        let loc = Location::parse("moves", "/games/7/").unwrap();
        assert_eq!(loc.path(), "/games/7/moves");

        let loc = Location::parse("../", "/games/7/").unwrap();
        assert_eq!(loc.path(), "/games/");
    }

    #[test]
    fn test_empty_query_and_hash_are_dropped() {
        let loc = Location::absolute("/?#").unwrap();
        assert_eq!(loc.path(), "/");
        assert!(loc.query().is_none());
        assert!(loc.hash().is_none());
        assert_eq!(loc.full_path(), "/");
    }
}

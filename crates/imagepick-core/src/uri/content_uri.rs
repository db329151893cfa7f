use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use thiserror::Error;

/// Characters escaped when a filesystem path becomes a `file:` URI path.
const PATH_ESCAPES: &AsciiSet = &CONTROLS.add(b' ').add(b'%').add(b'?').add(b'#');

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    #[error("Missing scheme in URI: {0}")]
    MissingScheme(String),

    #[error("Invalid scheme in URI: {0}")]
    InvalidScheme(String),
}

/// A parsed hierarchical URI such as `content://authority/path?query`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentUri {
    scheme: String,
    authority: Option<String>,
    encoded_path: String,
    query: Option<String>,
}

impl ContentUri {
    pub fn parse(input: &str) -> Result<Self, UriError> {
        let (scheme, rest) = input
            .split_once(':')
            .ok_or_else(|| UriError::MissingScheme(input.to_string()))?;

        let valid_scheme = scheme
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !valid_scheme {
            return Err(UriError::InvalidScheme(input.to_string()));
        }

        // Fragments are never meaningful to a content provider.
        let rest = rest.split('#').next().unwrap_or_default();
        let (rest, query) = match rest.split_once('?') {
            Some((rest, query)) => (rest, Some(query.to_string())),
            None => (rest, None),
        };

        let (authority, encoded_path) = match rest.strip_prefix("//") {
            Some(hier) => match hier.find('/') {
                Some(idx) => (Some(&hier[..idx]), &hier[idx..]),
                None => (Some(hier), ""),
            },
            None => (None, rest),
        };

        Ok(Self {
            scheme: scheme.to_ascii_lowercase(),
            authority: authority.filter(|a| !a.is_empty()).map(str::to_string),
            encoded_path: encoded_path.to_string(),
            query,
        })
    }

    /// A `file:` URI for a local path.
    pub fn from_file_path(path: &std::path::Path) -> Self {
        Self {
            scheme: "file".to_string(),
            authority: None,
            encoded_path: utf8_percent_encode(&path.to_string_lossy(), PATH_ESCAPES).to_string(),
            query: None,
        }
    }

    /// Lower-cased scheme.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    pub fn encoded_path(&self) -> &str {
        &self.encoded_path
    }

    /// The percent-decoded path.
    pub fn path(&self) -> String {
        decode(&self.encoded_path)
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Decoded path segments. An encoded `/` (`%2F`) stays inside its segment.
    pub fn path_segments(&self) -> Vec<String> {
        self.encoded_path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(decode)
            .collect()
    }

    pub fn last_path_segment(&self) -> Option<String> {
        self.path_segments().pop()
    }

    /// This URI with `/<id>` appended to its path.
    pub fn with_appended_id(&self, id: i64) -> Self {
        let mut uri = self.clone();
        if !uri.encoded_path.ends_with('/') {
            uri.encoded_path.push('/');
        }
        uri.encoded_path.push_str(&id.to_string());
        uri
    }
}

fn decode(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

impl fmt::Display for ContentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme)?;
        if let Some(authority) = &self.authority {
            write!(f, "//{authority}")?;
        }
        f.write_str(&self.encoded_path)?;
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for ContentUri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

//! Repository names: resolution of raw property/facet names against the
//! namespace registry, and encoding of arbitrary strings into legal node
//! names.

use crate::error::{FacetNavError, Result};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").expect("valid prefix regex"));

/// Characters that may never appear in a local name.
const ILLEGAL_NAME_CHARS: &[char] = &['/', ':', '[', ']', '*', '|'];

/// A resolved repository name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    pub prefix: String,
    pub local: String,
    pub namespace_uri: String,
}

impl Name {
    /// Expanded `{uri}local` form.
    pub fn expanded(&self) -> String {
        if self.namespace_uri.is_empty() {
            self.local.clone()
        } else {
            format!("{{{}}}{}", self.namespace_uri, self.local)
        }
    }
}

impl fmt::Display for Name {
    /// Qualified `prefix:local` form, the form engines index facets under.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefix.is_empty() {
            write!(f, "{}", self.local)
        } else {
            write!(f, "{}:{}", self.prefix, self.local)
        }
    }
}

/// Resolves raw names to [`Name`]s.
///
/// Failures are [`FacetNavError::IllegalName`], [`FacetNavError::Namespace`]
/// or [`FacetNavError::MalformedPath`]; see [`FacetNavError::is_name_error`].
pub trait NameResolver: Send + Sync {
    fn resolve_name(&self, raw: &str) -> Result<Name>;
}

/// Prefix to namespace-URI registry.
#[derive(Debug, Clone)]
pub struct NamespaceRegistry {
    prefixes: IndexMap<String, String>,
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        let mut prefixes = IndexMap::new();
        prefixes.insert(String::new(), String::new());
        prefixes.insert("jcr".to_string(), "http://www.jcp.org/jcr/1.0".to_string());
        prefixes.insert("nt".to_string(), "http://www.jcp.org/jcr/nt/1.0".to_string());
        prefixes.insert(
            "hippo".to_string(),
            "http://www.onehippo.org/jcr/hippo/nt/2.0".to_string(),
        );
        prefixes.insert(
            "hippostd".to_string(),
            "http://www.onehippo.org/jcr/hippostd/nt/2.0".to_string(),
        );
        Self { prefixes }
    }
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or re-map) a prefix.
    pub fn register(&mut self, prefix: &str, uri: &str) -> Result<()> {
        if !PREFIX_RE.is_match(prefix) {
            return Err(FacetNavError::IllegalName(format!(
                "'{}' is not a valid namespace prefix",
                prefix
            )));
        }
        self.prefixes.insert(prefix.to_string(), uri.to_string());
        Ok(())
    }

    pub fn uri(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    pub fn prefix_for_uri(&self, uri: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|(_, u)| u.as_str() == uri)
            .map(|(p, _)| p.as_str())
    }
}

impl NameResolver for NamespaceRegistry {
    fn resolve_name(&self, raw: &str) -> Result<Name> {
        if raw.trim().is_empty() {
            return Err(FacetNavError::IllegalName("empty name".to_string()));
        }

        if let Some(rest) = raw.strip_prefix('{') {
            let (uri, local) = rest.split_once('}').ok_or_else(|| {
                FacetNavError::IllegalName(format!("unterminated namespace URI in '{}'", raw))
            })?;
            let prefix = self.prefix_for_uri(uri).ok_or_else(|| {
                FacetNavError::Namespace(format!("no prefix registered for URI '{}'", uri))
            })?;
            check_local_name(raw, local)?;
            return Ok(Name {
                prefix: prefix.to_string(),
                local: local.to_string(),
                namespace_uri: uri.to_string(),
            });
        }

        if raw.contains('/') {
            return Err(FacetNavError::MalformedPath(format!(
                "'{}' is a path, not a name",
                raw
            )));
        }

        let (prefix, local) = match raw.split_once(':') {
            Some((p, l)) => (p, l),
            None => ("", raw),
        };
        if !prefix.is_empty() && !PREFIX_RE.is_match(prefix) {
            return Err(FacetNavError::IllegalName(format!(
                "'{}' has an illegal prefix",
                raw
            )));
        }
        check_local_name(raw, local)?;

        let uri = self.uri(prefix).ok_or_else(|| {
            FacetNavError::Namespace(format!("unknown namespace prefix '{}' in '{}'", prefix, raw))
        })?;

        Ok(Name {
            prefix: prefix.to_string(),
            local: local.to_string(),
            namespace_uri: uri.to_string(),
        })
    }
}

fn check_local_name(raw: &str, local: &str) -> Result<()> {
    if local.is_empty()
        || local == "."
        || local == ".."
        || local.contains(ILLEGAL_NAME_CHARS)
        || local.trim() != local
    {
        return Err(FacetNavError::IllegalName(format!(
            "'{}' has an illegal local name",
            raw
        )));
    }
    Ok(())
}

/// How [`encode_node_name`] treats colons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// A `prefix:local` name: the first colon separates the prefix and is kept.
    Qualified,
    /// Free text such as a facet value: every colon is a literal character.
    Literal,
}

/// Encode `name` into a legal node name. Illegal characters become
/// `_xHHHH_`; a literal `_x` that would read as an escape is escaped itself.
pub fn encode_node_name(name: &str, kind: NameKind) -> Result<String> {
    if name.is_empty() {
        return Err(FacetNavError::IllegalName(
            "cannot encode an empty node name".to_string(),
        ));
    }
    if name == "." || name == ".." {
        return Ok(name.chars().map(|_| "_x002e_").collect());
    }

    let keep_colon_at = match kind {
        NameKind::Qualified => name
            .split_once(':')
            .filter(|(prefix, local)| PREFIX_RE.is_match(prefix) && !local.is_empty())
            .map(|(prefix, _)| prefix.len()),
        NameKind::Literal => None,
    };

    let chars: Vec<(usize, char)> = name.char_indices().collect();
    let last = chars.len() - 1;
    let mut out = String::with_capacity(name.len());
    for (pos, &(idx, ch)) in chars.iter().enumerate() {
        let must_escape = match ch {
            ':' => Some(idx) != keep_colon_at,
            '/' | '[' | ']' | '*' | '|' | '\t' | '\r' | '\n' => true,
            ' ' => pos == 0 || pos == last,
            '_' => starts_escape(&name[idx..]),
            _ => false,
        };
        if must_escape {
            out.push_str(&format!("_x{:04x}_", ch as u32));
        } else {
            out.push(ch);
        }
    }
    Ok(out)
}

/// Reverse of [`encode_node_name`].
pub fn decode_node_name(encoded: &str) -> String {
    let mut out = String::with_capacity(encoded.len());
    let mut rest = encoded;
    while !rest.is_empty() {
        if starts_escape(rest) {
            if let Some(ch) = u32::from_str_radix(&rest[2..6], 16)
                .ok()
                .and_then(char::from_u32)
            {
                out.push(ch);
                rest = &rest[7..];
                continue;
            }
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            out.push(ch);
        }
        rest = chars.as_str();
    }
    out
}

fn starts_escape(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 7
        && b[0] == b'_'
        && b[1] == b'x'
        && b[2..6].iter().all(|c| c.is_ascii_hexdigit())
        && b[6] == b'_'
}

//! Pattern compilation.
//!
//! # Responsibilities
//! - Split `gopkg` arguments into path, VCS and URI templates
//! - Compile a path template (`/github/$1/$2`) into an anchored regex
//! - Expand `$N` placeholders from the captures of a match
//!
//! # Design Decisions
//! - A placeholder matches exactly one path segment (`[-0-9A-Za-z_]+`, no `/`)
//! - Literal text is escaped: a configured `.` only matches a `.`
//! - Anchored at the start of the path only; trailing segments are sub-packages

use regex::{Captures, Regex};

use crate::routing::router::ResolvedVars;
use crate::routing::CompileError;

/// VCS identifier used when a directive names none.
pub const DEFAULT_VCS: &str = "git";

/// Capture group substituted for every path placeholder.
const SEGMENT: &str = "([-0-9A-Za-z_]+)";

/// One configuration entry before compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub path: String,
    pub vcs: Option<String>,
    pub uri: String,
}

impl RouteEntry {
    /// Interpret a raw directive argument list.
    ///
    /// Two arguments are `<path> <uri>`, three are `<path> <vcs> <uri>`.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, CompileError> {
        match args {
            [path, uri] => Ok(Self {
                path: path.as_ref().to_string(),
                vcs: None,
                uri: uri.as_ref().to_string(),
            }),
            [path, vcs, uri] => Ok(Self {
                path: path.as_ref().to_string(),
                vcs: Some(vcs.as_ref().to_string()),
                uri: uri.as_ref().to_string(),
            }),
            _ => Err(CompileError::ArgumentCount(args.len())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Placeholder(usize),
}

/// A template string split into literal text and `$N` placeholders.
///
/// A `$` that is not followed by a digit is ordinary text. All digits after
/// the `$` belong to the placeholder, so `$12` is placeholder twelve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    raw: String,
    tokens: Vec<Token>,
}

impl Template {
    pub fn parse(raw: &str) -> Self {
        let bytes = raw.as_bytes();
        let mut tokens = Vec::new();
        let mut literal_start = 0;
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] == b'$' {
                let digits = bytes[i + 1..]
                    .iter()
                    .take_while(|b| b.is_ascii_digit())
                    .count();
                if digits > 0 {
                    if literal_start < i {
                        tokens.push(Token::Literal(raw[literal_start..i].to_string()));
                    }
                    let end = i + 1 + digits;
                    // Absurdly long numbers saturate and fail the range checks later.
                    let index = raw[i + 1..end].parse().unwrap_or(usize::MAX);
                    tokens.push(Token::Placeholder(index));
                    i = end;
                    literal_start = end;
                    continue;
                }
            }
            i += 1;
        }

        if literal_start < bytes.len() {
            tokens.push(Token::Literal(raw[literal_start..].to_string()));
        }

        Self {
            raw: raw.to_string(),
            tokens,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Placeholder numbers in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = usize> + '_ {
        self.tokens.iter().filter_map(|t| match t {
            Token::Placeholder(index) => Some(*index),
            Token::Literal(_) => None,
        })
    }

    pub fn has_placeholders(&self) -> bool {
        self.placeholders().next().is_some()
    }

    /// Substitute every `$N` with the Nth capture group.
    pub fn expand(&self, captures: &Captures<'_>) -> String {
        if !self.has_placeholders() {
            return self.raw.clone();
        }

        let mut out = String::with_capacity(self.raw.len());
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Placeholder(index) => {
                    if let Some(m) = captures.get(*index) {
                        out.push_str(m.as_str());
                    }
                }
            }
        }
        out
    }
}

/// A compiled configuration entry.
///
/// Immutable once built; shared read-only by every request.
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    path: Template,
    uri: Template,
    vcs: String,
    regex: Regex,
}

impl CompiledMatcher {
    /// Compile a raw directive argument list.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, CompileError> {
        Self::compile(&RouteEntry::from_args(args)?)
    }

    pub fn compile(entry: &RouteEntry) -> Result<Self, CompileError> {
        if entry.path.is_empty() {
            return Err(CompileError::EmptyPath);
        }

        let path = Template::parse(&entry.path);
        let uri = Template::parse(&entry.uri);

        let mut expression = String::from("^");
        let mut captured = 0;
        for token in &path.tokens {
            match token {
                Token::Literal(text) => expression.push_str(&regex::escape(text)),
                Token::Placeholder(index) => {
                    captured += 1;
                    if *index != captured {
                        return Err(CompileError::PlaceholderOrder {
                            template: entry.path.clone(),
                            expected: captured,
                            found: *index,
                        });
                    }
                    expression.push_str(SEGMENT);
                }
            }
        }

        // Without path placeholders the URI template is used verbatim.
        let unknown = uri.placeholders().find(|&i| i == 0 || i > captured);
        if let Some(index) = unknown.filter(|_| captured > 0) {
            return Err(CompileError::UnknownPlaceholder {
                template: entry.uri.clone(),
                index,
                available: captured,
            });
        }

        let regex = Regex::new(&expression).map_err(|source| CompileError::Regex {
            template: entry.path.clone(),
            source,
        })?;

        Ok(Self {
            path,
            uri,
            vcs: entry.vcs.clone().unwrap_or_else(|| DEFAULT_VCS.to_string()),
            regex,
        })
    }

    pub fn path_template(&self) -> &str {
        self.path.as_str()
    }

    pub fn uri_template(&self) -> &str {
        self.uri.as_str()
    }

    pub fn vcs(&self) -> &str {
        &self.vcs
    }

    /// The derived expression, for diagnostics.
    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }

    /// Match the start of `path` and expand both templates from the captures.
    ///
    /// Only the matched prefix is consulted: `/github/$1/$2` against
    /// `/github/a/b/c` yields module path `/github/a/b`. A placeholder-free
    /// path leaves the URI template untouched.
    pub fn resolve(&self, host: &str, path: &str) -> Option<ResolvedVars> {
        let captures = self.regex.captures(path)?;
        let uri = if self.path.has_placeholders() {
            self.uri.expand(&captures)
        } else {
            self.uri.as_str().to_string()
        };
        Some(ResolvedVars {
            host: host.to_string(),
            path: self.path.expand(&captures),
            vcs: self.vcs.clone(),
            uri,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(args: &[&str]) -> CompiledMatcher {
        CompiledMatcher::from_args(args).unwrap()
    }

    #[test]
    fn test_entry_arguments() {
        let two = RouteEntry::from_args(&["/chrisify", "https://github.com/zikes/chrisify"]).unwrap();
        assert_eq!(two.vcs, None);

        let three = RouteEntry::from_args(&["/myrepo", "hg", "https://bitbucket.org/zikes/myrepo"]).unwrap();
        assert_eq!(three.vcs.as_deref(), Some("hg"));
        assert_eq!(three.uri, "https://bitbucket.org/zikes/myrepo");

        for bad in [&["/only"][..], &[][..], &["a", "b", "c", "d"][..]] {
            let err = RouteEntry::from_args(bad).unwrap_err();
            assert!(err.is_parse_error());
        }
    }

    #[test]
    fn test_template_tokens() {
        let t = Template::parse("/github/$1/$2");
        assert_eq!(t.placeholders().collect::<Vec<_>>(), vec![1, 2]);

        let literal = Template::parse("/price/$/x");
        assert!(!literal.has_placeholders());

        let wide = Template::parse("$12x");
        assert_eq!(wide.placeholders().collect::<Vec<_>>(), vec![12]);
    }

    #[test]
    fn test_default_vcs() {
        let m = compile(&["/chrisify", "https://github.com/zikes/chrisify"]);
        assert_eq!(m.vcs(), "git");
        assert_eq!(m.path_template(), "/chrisify");
        assert_eq!(m.uri_template(), "https://github.com/zikes/chrisify");
    }

    #[test]
    fn test_regex_is_anchored_and_escaped() {
        let m = compile(&["/gopkg.in/$1", "https://github.com/x/$1"]);
        assert_eq!(m.as_regex().as_str(), r"^/gopkg\.in/([-0-9A-Za-z_]+)");

        assert!(m.resolve("h", "/gopkg.in/yaml").is_some());
        assert!(m.resolve("h", "/gopkgxin/yaml").is_none());
        assert!(m.resolve("h", "/vendor/gopkg.in/yaml").is_none());
    }

    #[test]
    fn test_placeholder_is_one_segment() {
        let m = compile(&["/$1", "https://example.org/$1"]);
        let vars = m.resolve("h", "/a/b").unwrap();
        assert_eq!(vars.path, "/a");
        assert_eq!(vars.uri, "https://example.org/a");

        let vars = m.resolve("h", "/my-repo_2").unwrap();
        assert_eq!(vars.path, "/my-repo_2");

        assert!(m.resolve("h", "/").is_none());
        assert!(m.resolve("h", "/.hidden").is_none());
    }

    #[test]
    fn test_literal_path_ignores_trailing_segments() {
        let m = compile(&["/chrisify", "https://github.com/zikes/chrisify"]);
        let vars = m.resolve("example.com", "/chrisify/sub/pkg").unwrap();
        assert_eq!(vars.path, "/chrisify");
        assert_eq!(vars.uri, "https://github.com/zikes/chrisify");
        assert!(m.resolve("example.com", "/other/chrisify").is_none());
    }

    #[test]
    fn test_uri_may_reuse_placeholders() {
        let m = compile(&["/$1", "https://git.example.org/$1/$1.git"]);
        let vars = m.resolve("h", "/tool").unwrap();
        assert_eq!(vars.uri, "https://git.example.org/tool/tool.git");
    }

    #[test]
    fn test_compile_errors() {
        assert!(matches!(
            CompiledMatcher::from_args(&["", "https://x"]),
            Err(CompileError::EmptyPath)
        ));
        assert!(matches!(
            CompiledMatcher::from_args(&["/$2/$1", "https://x/$1"]),
            Err(CompileError::PlaceholderOrder { expected: 1, found: 2, .. })
        ));
        assert!(matches!(
            CompiledMatcher::from_args(&["/$1", "https://x/$1/$2"]),
            Err(CompileError::UnknownPlaceholder { index: 2, available: 1, .. })
        ));
        assert!(matches!(
            CompiledMatcher::from_args(&["/$1", "https://x/$0"]),
            Err(CompileError::UnknownPlaceholder { index: 0, .. })
        ));
    }

    #[test]
    fn test_literal_path_uri_is_not_expanded() {
        let m = compile(&["/pkg", "https://example.org/$1/$0"]);
        let vars = m.resolve("h", "/pkg").unwrap();
        assert_eq!(vars.uri, "https://example.org/$1/$0");
    }
}

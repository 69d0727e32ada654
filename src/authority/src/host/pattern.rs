//! Host pattern parsing and matching
//!
//! Grant-table style patterns: `%` matches any run of characters, `_`
//! matches exactly one, `\` escapes the next character. Everything else is
//! literal.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The "any host" marker
pub const ANY_HOST: &str = "%";

/// Result type for host pattern operations
pub type HostPatternResult<T> = Result<T, HostPatternError>;

/// Errors that can occur while parsing a host pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostPatternError {
    /// Empty pattern string provided
    EmptyPattern,
    /// Pattern ends with an escape character that escapes nothing
    DanglingEscape(String),
}

impl fmt::Display for HostPatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPattern => write!(f, "Host pattern cannot be empty"),
            Self::DanglingEscape(pattern) => {
                write!(f, "Host pattern '{}' ends with a dangling escape", pattern)
            }
        }
    }
}

impl std::error::Error for HostPatternError {}

/// How specific a host pattern is, least specific first
///
/// Derived `Ord` follows declaration order, so `Exact` is the greatest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Specificity {
    /// The bare `%` marker, matches every host
    AnyHost,
    /// Starts with a wildcard, e.g. `%.example.com`
    WildcardPrefix,
    /// Fixed leading characters followed by a wildcard, e.g. `10.0.0.%`
    WildcardSuffix,
    /// No wildcard at all
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Token {
    Literal(char),
    /// `%`
    AnyRun,
    /// `_`
    AnyChar,
}

/// A compiled host pattern
///
/// # Examples
///
/// ```
/// use proxy_authority::host::{HostPattern, Specificity};
///
/// let pattern = HostPattern::new("10.0.0.%").unwrap();
/// assert_eq!(pattern.specificity(), Specificity::WildcardSuffix);
/// assert!(pattern.matches("10.0.0.9"));
/// assert!(!pattern.matches("10.0.1.9"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostPattern {
    /// Pattern text, lowercased when case folding is on
    raw: String,
    tokens: Vec<Token>,
    specificity: Specificity,
    /// Number of literal characters
    fixed_len: usize,
    fold_case: bool,
}

impl HostPattern {
    /// Parses a case-insensitive host pattern
    pub fn new(pattern: &str) -> HostPatternResult<Self> {
        Self::parse(pattern, true)
    }

    /// Parses a host pattern
    ///
    /// With `fold_case` set the pattern is stored lowercased and hosts are
    /// compared ASCII case-insensitively.
    pub fn parse(pattern: &str, fold_case: bool) -> HostPatternResult<Self> {
        if pattern.is_empty() {
            return Err(HostPatternError::EmptyPattern);
        }

        let raw = if fold_case {
            pattern.to_ascii_lowercase()
        } else {
            pattern.to_string()
        };

        let mut tokens = Vec::with_capacity(raw.len());
        let mut chars = raw.chars();
        while let Some(c) = chars.next() {
            let token = match c {
                '%' => Token::AnyRun,
                '_' => Token::AnyChar,
                '\\' => match chars.next() {
                    Some(escaped) => Token::Literal(escaped),
                    None => return Err(HostPatternError::DanglingEscape(pattern.to_string())),
                },
                other => Token::Literal(other),
            };
            tokens.push(token);
        }

        let fixed_len = tokens
            .iter()
            .filter(|t| matches!(t, Token::Literal(_)))
            .count();

        let specificity = if fixed_len == tokens.len() {
            Specificity::Exact
        } else if tokens.iter().all(|t| *t == Token::AnyRun) {
            Specificity::AnyHost
        } else if matches!(tokens[0], Token::Literal(_)) {
            Specificity::WildcardSuffix
        } else {
            Specificity::WildcardPrefix
        };

        Ok(Self {
            raw,
            tokens,
            specificity,
            fixed_len,
            fold_case,
        })
    }

    /// The "any host" pattern
    pub fn any() -> Self {
        Self {
            raw: ANY_HOST.to_string(),
            tokens: vec![Token::AnyRun],
            specificity: Specificity::AnyHost,
            fixed_len: 0,
            fold_case: true,
        }
    }

    /// Returns the normalized pattern text
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the specificity tier of this pattern
    pub fn specificity(&self) -> Specificity {
        self.specificity
    }

    /// Returns the number of literal (non-wildcard) characters
    pub fn fixed_len(&self) -> usize {
        self.fixed_len
    }

    /// Returns whether this is the "any host" marker
    pub fn is_any(&self) -> bool {
        self.specificity == Specificity::AnyHost
    }

    /// Checks whether an actual client host matches this pattern
    pub fn matches(&self, host: &str) -> bool {
        match self.specificity {
            Specificity::AnyHost => true,
            Specificity::Exact => self.literal_eq(host),
            _ => self.matches_wildcard(host),
        }
    }

    /// Orders patterns by lookup precedence, most specific first
    ///
    /// Tier first, then more literal characters, then pattern text. The text
    /// comparison makes the order total, so every index built from the same
    /// patterns scans them in the same order.
    pub fn precedence_cmp(&self, other: &Self) -> Ordering {
        other
            .specificity
            .cmp(&self.specificity)
            .then_with(|| other.fixed_len.cmp(&self.fixed_len))
            .then_with(|| self.raw.cmp(&other.raw))
    }

    /// Returns whether this pattern and `other` rank equally apart from text
    ///
    /// When both match the same host the winner is decided by the text
    /// tie-break alone.
    pub fn ties_with(&self, other: &Self) -> bool {
        self.specificity == other.specificity && self.fixed_len == other.fixed_len
    }

    fn literal_eq(&self, host: &str) -> bool {
        self.tokens.len() == host.chars().count()
            && self
                .tokens
                .iter()
                .zip(host.chars())
                .all(|(t, h)| self.char_matches(*t, h))
    }

    fn char_matches(&self, token: Token, h: char) -> bool {
        match token {
            Token::AnyChar => true,
            Token::Literal(c) if self.fold_case => c == h.to_ascii_lowercase(),
            Token::Literal(c) => c == h,
            Token::AnyRun => false,
        }
    }

    /// Greedy wildcard match with single-point backtracking on the last `%`
    fn matches_wildcard(&self, host: &str) -> bool {
        let host: Vec<char> = host.chars().collect();
        let tokens = &self.tokens;

        let (mut t, mut h) = (0usize, 0usize);
        let mut backtrack: Option<(usize, usize)> = None;

        while h < host.len() {
            if t < tokens.len() && tokens[t] == Token::AnyRun {
                backtrack = Some((t, h));
                t += 1;
            } else if t < tokens.len() && self.char_matches(tokens[t], host[h]) {
                t += 1;
                h += 1;
            } else if let Some((star_t, star_h)) = backtrack {
                t = star_t + 1;
                h = star_h + 1;
                backtrack = Some((star_t, star_h + 1));
            } else {
                return false;
            }
        }

        tokens[t..].iter().all(|token| *token == Token::AnyRun)
    }
}

impl FromStr for HostPattern {
    type Err = HostPatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for HostPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

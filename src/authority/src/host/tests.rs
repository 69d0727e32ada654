//! Test suite for host pattern matching
//!
//! Tests cover:
//! - Literal matching
//! - `%` and `_` wildcards
//! - Case folding
//! - Property checks against a reference matcher

use super::*;
use proptest::prelude::*;
use std::str::FromStr;

// ============================================================================
// Literal Matching Tests
// ============================================================================

#[test]
fn test_literal_matches_only_itself() {
    let pattern = HostPattern::new("10.0.0.5").unwrap();
    assert!(pattern.matches("10.0.0.5"));
    assert!(!pattern.matches("10.0.0.50"));
    assert!(!pattern.matches("10.0.0."));
    assert!(!pattern.matches(""));
}

#[test]
fn test_literal_hostname_case_insensitive() {
    let pattern = HostPattern::new("DB.Example.COM").unwrap();
    assert_eq!(pattern.as_str(), "db.example.com");
    assert!(pattern.matches("db.example.com"));
    assert!(pattern.matches("DB.EXAMPLE.COM"));
}

#[test]
fn test_literal_hostname_case_sensitive() {
    let pattern = HostPattern::parse("DB.Example.COM", false).unwrap();
    assert_eq!(pattern.as_str(), "DB.Example.COM");
    assert!(pattern.matches("DB.Example.COM"));
    assert!(!pattern.matches("db.example.com"));
}

#[test]
fn test_underscore_is_not_literal() {
    let pattern = HostPattern::new("db_1").unwrap();
    assert_eq!(pattern.specificity(), Specificity::WildcardSuffix);
    assert!(pattern.matches("db_1"));
    assert!(pattern.matches("dbx1"));
    assert!(!pattern.matches("db1"));
}

// ============================================================================
// Wildcard Tests
// ============================================================================

#[test]
fn test_suffix_wildcard() {
    let pattern = HostPattern::new("192.168.%").unwrap();
    assert!(pattern.matches("192.168.1.1"));
    assert!(pattern.matches("192.168."));
    assert!(!pattern.matches("192.169.1.1"));
}

#[test]
fn test_prefix_wildcard() {
    let pattern = HostPattern::new("%.example.com").unwrap();
    assert!(pattern.matches("a.example.com"));
    assert!(pattern.matches("a.b.example.com"));
    assert!(!pattern.matches("example.com"));
    assert!(!pattern.matches("a.example.com.evil"));
}

#[test]
fn test_inner_wildcard() {
    let pattern = HostPattern::new("10.%.0.1").unwrap();
    assert!(pattern.matches("10.20.0.1"));
    assert!(pattern.matches("10.1.2.0.1"));
    assert!(!pattern.matches("10.20.0.2"));
}

#[test]
fn test_single_char_wildcard() {
    let pattern = HostPattern::new("10.0.0._").unwrap();
    assert!(pattern.matches("10.0.0.7"));
    assert!(!pattern.matches("10.0.0.17"));
}

#[test]
fn test_backtracking_across_runs() {
    let pattern = HostPattern::new("%a%b%c").unwrap();
    assert!(pattern.matches("xxaxxbxxc"));
    assert!(pattern.matches("abc"));
    assert!(!pattern.matches("acb"));
}

#[test]
fn test_any_host_matches_everything() {
    let pattern = HostPattern::from_str(ANY_HOST).unwrap();
    assert!(pattern.is_any());
    assert!(pattern.matches(""));
    assert!(pattern.matches("127.0.0.1"));
    assert!(pattern.matches("::1"));
    assert!(pattern.matches("anything.at.all"));
}

#[test]
fn test_display_shows_normalized_text() {
    let pattern = HostPattern::new("%.EXAMPLE.com").unwrap();
    assert_eq!(format!("{}", pattern), "%.example.com");
}

// ============================================================================
// Property Tests
// ============================================================================

/// Straightforward recursive matcher used as the reference
fn reference_match(pattern: &[char], host: &[char]) -> bool {
    match (pattern.first(), host.first()) {
        (None, None) => true,
        (None, Some(_)) => false,
        (Some('%'), _) => {
            reference_match(&pattern[1..], host)
                || (!host.is_empty() && reference_match(pattern, &host[1..]))
        }
        (Some('_'), Some(_)) => reference_match(&pattern[1..], &host[1..]),
        (Some(p), Some(h)) if p == h => reference_match(&pattern[1..], &host[1..]),
        _ => false,
    }
}

proptest! {
    #[test]
    fn prop_matches_reference(pattern in "[ab%_.]{1,8}", host in "[ab.]{0,10}") {
        let compiled = HostPattern::new(&pattern).unwrap();
        let p: Vec<char> = pattern.chars().collect();
        let h: Vec<char> = host.chars().collect();
        prop_assert_eq!(compiled.matches(&host), reference_match(&p, &h));
    }

    #[test]
    fn prop_literal_matches_itself(host in "[a-z0-9.-]{1,24}") {
        let compiled = HostPattern::new(&host).unwrap();
        prop_assert_eq!(compiled.specificity(), Specificity::Exact);
        prop_assert!(compiled.matches(&host));
    }

    #[test]
    fn prop_any_host_matches(host in ".{0,32}") {
        prop_assert!(HostPattern::any().matches(&host));
    }
}

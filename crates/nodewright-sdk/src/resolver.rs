// Copyright (C) 2026 Nodewright Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Token resolution over a fetched listing.
//!
//! Human-supplied tokens come in two flavors: all-digit strings are treated as
//! IDs and checked against the listing, everything else is matched by a
//! per-kind rule (exact location/abbreviation, exact label, or substring).
//! Either way the canonical label of the matched record is surfaced, so a
//! caller that passed a bare ID still learns what it points at.

use crate::types::ResolvedResource;

/// Resolve a token against listing records, in listing order.
///
/// - An empty token never matches anything.
/// - An all-ASCII-digit token is an ID: it resolves iff a record carries that
///   exact ID. Digits that overflow the ID type cannot match any record and
///   resolve to `None`.
/// - Any other token is lowercased once and handed to `matches` per record;
///   the first hit wins.
pub fn resolve<T, I, L, M>(
    token: &str,
    records: &[T],
    id_of: I,
    label_of: L,
    matches: M,
) -> Option<ResolvedResource>
where
    I: Fn(&T) -> u32,
    L: Fn(&T) -> &str,
    M: Fn(&T, &str) -> bool,
{
    if token.is_empty() {
        return None;
    }

    if token.bytes().all(|b| b.is_ascii_digit()) {
        let id: u32 = token.parse().ok()?;
        return records.iter().find(|record| id_of(record) == id).map(|record| {
            ResolvedResource {
                id,
                label: label_of(record).to_string(),
            }
        });
    }

    let needle = token.to_lowercase();
    records
        .iter()
        .find(|record| matches(record, &needle))
        .map(|record| ResolvedResource {
            id: id_of(record),
            label: label_of(record).to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Entry {
        id: u32,
        label: &'static str,
    }

    fn entries() -> Vec<Entry> {
        vec![
            Entry { id: 10, label: "Latest 64 bit (4.1.0-x86_64-linode59)" },
            Entry { id: 20, label: "4.1.0-x86_64-linode59" },
            Entry { id: 30, label: "GRUB 2" },
        ]
    }

    fn resolve_exact(token: &str) -> Option<ResolvedResource> {
        let records = entries();
        resolve(
            token,
            &records,
            |e| e.id,
            |e| e.label,
            |e, needle| e.label.to_lowercase() == needle,
        )
    }

    fn resolve_substring(token: &str) -> Option<ResolvedResource> {
        let records = entries();
        resolve(
            token,
            &records,
            |e| e.id,
            |e| e.label,
            |e, needle| e.label.to_lowercase().contains(needle),
        )
    }

    #[test]
    fn test_numeric_token_matches_record_id() {
        let found = resolve_exact("20").unwrap();
        assert_eq!(found.id, 20);
        assert_eq!(found.label, "4.1.0-x86_64-linode59");
    }

    #[test]
    fn test_numeric_token_without_record_is_none() {
        assert!(resolve_exact("999").is_none());
    }

    #[test]
    fn test_numeric_token_overflow_is_none() {
        // Too many digits for the ID type; no listing entry can match.
        assert!(resolve_exact("99999999999999999999").is_none());
    }

    #[test]
    fn test_signed_or_spaced_digits_are_not_numeric_tokens() {
        // "+20" and " 20" fall through to label matching, not ID parsing.
        assert!(resolve_exact("+20").is_none());
        assert!(resolve_exact(" 20").is_none());
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let found = resolve_exact("grub 2").unwrap();
        assert_eq!(found.id, 30);
        assert_eq!(found.label, "GRUB 2");
    }

    #[test]
    fn test_exact_match_rejects_partial() {
        assert!(resolve_exact("grub").is_none());
    }

    #[test]
    fn test_substring_match_takes_first_in_listing_order() {
        // Both the first and second entries contain this fragment; listing
        // order wins, not closest match.
        let found = resolve_substring("4.1.0").unwrap();
        assert_eq!(found.id, 10);
    }

    #[test]
    fn test_empty_token_never_matches() {
        // An empty needle would be a substring of every label.
        assert!(resolve_substring("").is_none());
        assert!(resolve_exact("").is_none());
    }

    #[test]
    fn test_no_records_resolves_nothing() {
        let records: Vec<Entry> = Vec::new();
        let found = resolve(
            "10",
            &records,
            |e: &Entry| e.id,
            |e: &Entry| e.label,
            |_, _| true,
        );
        assert!(found.is_none());
    }
}

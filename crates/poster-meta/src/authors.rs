//! Author and affiliation resolution.
//!
//! Affiliations are numbered from 1 in the order they are first referenced
//! across all authors. Later references to the same (trimmed) name reuse the
//! number, so the header can print one footnote-style list shared by every
//! author.

use std::collections::HashMap;

use serde::Serialize;

use crate::frontmatter::AuthorEntry;

/// Author with the numbers of the affiliations they reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAuthor {
    pub name: String,
    pub affiliation_numbers: Vec<usize>,
}

/// Affiliation with its assigned number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedAffiliation {
    pub name: String,
    pub number: usize,
}

/// Authors and affiliations ready for the poster header.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedAuthors {
    /// Authors in document order.
    pub authors: Vec<ResolvedAuthor>,
    /// Affiliations ordered by number (first-seen order).
    pub affiliations: Vec<ResolvedAffiliation>,
}

/// Resolve author entries into numbered authors and affiliations.
///
/// Names are trimmed. An author listing the same affiliation twice gets a
/// single number for it.
///
/// ```
/// use poster_meta::{AuthorEntry, resolve_authors};
///
/// let entries = [
///     AuthorEntry::Affiliated(vec![("A".into(), vec!["X".into(), "Y".into()])]),
///     AuthorEntry::Affiliated(vec![("B".into(), vec!["Y".into()])]),
/// ];
/// let resolved = resolve_authors(&entries);
///
/// assert_eq!(resolved.affiliations[1].name, "Y");
/// assert_eq!(resolved.authors[1].affiliation_numbers, vec![2]);
/// ```
pub fn resolve_authors<'a>(entries: impl IntoIterator<Item = &'a AuthorEntry>) -> ResolvedAuthors {
    let mut numbers: HashMap<String, usize> = HashMap::new();
    let mut resolved = ResolvedAuthors::default();

    for (name, affiliation_names) in entries.into_iter().flat_map(AuthorEntry::iter) {
        let mut affiliation_numbers = Vec::with_capacity(affiliation_names.len());

        for affiliation in affiliation_names.iter().map(|a| a.trim()) {
            if !numbers.contains_key(affiliation) {
                let number = resolved.affiliations.len() + 1;
                numbers.insert(affiliation.to_owned(), number);
                resolved.affiliations.push(ResolvedAffiliation {
                    name: affiliation.to_owned(),
                    number,
                });
            }

            let Some(&number) = numbers.get(affiliation) else {
                // Unreachable: the name was inserted above.
                tracing::warn!(affiliation, "Affiliation missing from number map");
                continue;
            };
            if !affiliation_numbers.contains(&number) {
                affiliation_numbers.push(number);
            }
        }

        resolved.authors.push(ResolvedAuthor {
            name: name.trim().to_owned(),
            affiliation_numbers,
        });
    }

    resolved
}

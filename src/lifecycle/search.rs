use regex::{Regex, RegexBuilder};

use crate::errors::ServiceError;
use crate::models::{CatalogItem, RowRef, Table};

const WILDCARD: char = '*';

/// Compiled form of a search query.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Blank query: matches nothing.
    Nothing,
    /// Case-insensitive substring, stored lowercased.
    Contains(String),
    /// Wildcard query compiled to a case-insensitive regex.
    Pattern(Regex),
}

impl Matcher {
    pub fn compile(query: &str) -> Result<Self, ServiceError> {
        if query.is_empty() {
            return Ok(Matcher::Nothing);
        }
        if !query.contains(WILDCARD) {
            return Ok(Matcher::Contains(query.to_lowercase()));
        }

        let pattern = regex::escape(query).replace(r"\*", ".*");
        RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map(Matcher::Pattern)
            .map_err(|e| ServiceError::ValidationError(format!("invalid search query: {}", e)))
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        match self {
            Matcher::Nothing => false,
            Matcher::Contains(needle) => haystack.to_lowercase().contains(needle.as_str()),
            Matcher::Pattern(regex) => regex.is_match(haystack),
        }
    }
}

/// Lazily evaluated search over a catalog table.
///
/// Nothing is matched until iterated, and every call to [`SearchResults::iter`]
/// starts again from the first row.
#[derive(Debug, Clone)]
pub struct SearchResults<'a> {
    catalog: &'a Table,
    columns: Vec<usize>,
    matcher: Matcher,
    limit: Option<usize>,
}

/// Searches `columns` of `catalog` for `query`.
///
/// Multiple columns are joined with a space before matching. A `limit` of
/// `None` or `Some(0)` returns every match.
pub fn search<'a>(
    catalog: &'a Table,
    query: &str,
    columns: &[&str],
    limit: Option<usize>,
) -> Result<SearchResults<'a>, ServiceError> {
    let columns = columns
        .iter()
        .map(|name| {
            catalog
                .column_index(name)
                .ok_or_else(|| ServiceError::UnknownColumn(name.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SearchResults {
        catalog,
        columns,
        matcher: Matcher::compile(query)?,
        limit: limit.filter(|&n| n > 0),
    })
}

impl<'a> SearchResults<'a> {
    pub fn iter(&self) -> SearchIter<'_, 'a> {
        SearchIter {
            results: self,
            next_row: 0,
            yielded: 0,
        }
    }

    /// Matches that carry an item number, as catalog items.
    pub fn items(&self) -> ItemIter<'_, 'a> {
        self.iter()
            .filter_map(row_to_item as fn(RowRef<'a>) -> Option<CatalogItem>)
    }

    fn haystack(&self, row: &RowRef<'a>) -> String {
        self.columns
            .iter()
            .map(|&i| row.get_at(i))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<'s, 'a> IntoIterator for &'s SearchResults<'a> {
    type Item = RowRef<'a>;
    type IntoIter = SearchIter<'s, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub type ItemIter<'s, 'a> =
    std::iter::FilterMap<SearchIter<'s, 'a>, fn(RowRef<'a>) -> Option<CatalogItem>>;

fn row_to_item(row: RowRef<'_>) -> Option<CatalogItem> {
    CatalogItem::from_row(&row)
}

pub struct SearchIter<'s, 'a> {
    results: &'s SearchResults<'a>,
    next_row: usize,
    yielded: usize,
}

impl<'s, 'a> Iterator for SearchIter<'s, 'a> {
    type Item = RowRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let results = self.results;
        if matches!(results.matcher, Matcher::Nothing) {
            return None;
        }
        if results.limit.map_or(false, |limit| self.yielded >= limit) {
            return None;
        }
        while let Some(row) = results.catalog.row(self.next_row) {
            self.next_row += 1;
            if results.matcher.is_match(&results.haystack(&row)) {
                self.yielded += 1;
                return Some(row);
            }
        }
        None
    }
}

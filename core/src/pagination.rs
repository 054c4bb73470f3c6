//! Page numbers derived from the API's count headers.

/// Header carrying the total number of records in a paginated collection.
pub const HEADER_TOTAL_RECORDS: &str = "X-WP-Total";

/// Header carrying the total number of pages in a paginated collection.
pub const HEADER_TOTAL_PAGES: &str = "X-WP-TotalPages";

/// Pagination values for one response.
///
/// Any field may be zero for responses that are not part of a paginated set.
/// A `next_page` of zero means there is no further page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub total_records: u64,
    pub total_pages: u64,
    pub previous_page: u64,
    pub next_page: u64,
}

impl Pagination {
    /// Derive pagination from response headers and the request's query string.
    pub fn from_parts(total_records: Option<&str>, total_pages: Option<&str>, query: Option<&str>) -> Self {
        let parsed_records = total_records.map(parse_count).unwrap_or(0);
        let parsed_pages = total_pages.map(parse_count).unwrap_or(0);

        let mut previous_page = query.map(page_param).unwrap_or(0);
        let paginated = total_records.is_some_and(|v| !v.is_empty())
            && total_pages.is_some_and(|v| !v.is_empty());
        if paginated && previous_page == 0 {
            previous_page = 1;
        }

        let next_page = previous_page
            .checked_add(1)
            .filter(|next| *next <= parsed_pages)
            .unwrap_or(0);

        Self {
            total_records: parsed_records,
            total_pages: parsed_pages,
            previous_page,
            next_page,
        }
    }

    pub fn has_next(&self) -> bool {
        self.next_page != 0
    }
}

fn parse_count(value: &str) -> u64 {
    value.trim().parse().unwrap_or(0)
}

fn page_param(query: &str) -> u64 {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "page")
        .map(|(_, value)| parse_count(&value))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::first_page_implied(Some("42"), Some("5"), None, 1, 2)]
    #[case::explicit_middle(Some("42"), Some("5"), Some("page=3&per_page=10"), 3, 4)]
    #[case::last_page(Some("42"), Some("5"), Some("page=5"), 5, 0)]
    #[case::not_paginated(None, None, None, 0, 0)]
    #[case::only_one_header(Some("42"), None, None, 0, 0)]
    #[case::single_page(Some("3"), Some("1"), None, 1, 0)]
    #[case::garbage_page(Some("42"), Some("5"), Some("page=abc"), 1, 2)]
    #[case::page_at_u64_max(Some("1"), Some("1"), Some("page=18446744073709551615"), u64::MAX, 0)]
    fn derives_page_numbers(
        #[case] total: Option<&str>,
        #[case] pages: Option<&str>,
        #[case] query: Option<&str>,
        #[case] previous: u64,
        #[case] next: u64,
    ) {
        let p = Pagination::from_parts(total, pages, query);
        assert_eq!(p.previous_page, previous);
        assert_eq!(p.next_page, next);
    }

    #[test]
    fn unparseable_counts_are_zero() {
        let p = Pagination::from_parts(Some("lots"), Some("-1"), None);
        assert_eq!(p.total_records, 0);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.previous_page, 1);
        assert_eq!(p.next_page, 0);
        assert!(!p.has_next());
    }
}

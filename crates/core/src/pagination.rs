//! Page-number pagination.
//!
//! Responses carry the standard envelope: total `count`, links to the `next`
//! and `previous` pages, and the current page's `results`. Page 1 always
//! exists, even when there are no results at all.

use serde::Serialize;

use crate::error::CoreError;

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Name of the query parameter selecting a page.
pub const PAGE_QUERY_PARAM: &str = "page";

/// A page selector as written by the client (`?page=3`, `?page=last`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumber {
    Number(i64),
    Last,
}

impl PageNumber {
    /// Parse the raw `page` query value. Absent means the first page.
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(PageNumber::Number(1)),
            Some("last") => Ok(PageNumber::Last),
            Some(value) => value
                .parse::<i64>()
                .map(PageNumber::Number)
                .map_err(|_| CoreError::InvalidPage),
        }
    }
}

/// A resolved page within a result set of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub page_size: i64,
    pub num_pages: i64,
}

impl PageWindow {
    /// Resolve `requested` against `count` records split into `page_size` pages.
    ///
    /// Pages outside `1..=num_pages` are [`CoreError::InvalidPage`].
    pub fn resolve(requested: PageNumber, count: i64, page_size: i64) -> Result<Self, CoreError> {
        let page_size = page_size.max(1);
        let num_pages = num_pages(count, page_size);
        let page = match requested {
            PageNumber::Number(n) => n,
            PageNumber::Last => num_pages,
        };
        if page < 1 || page > num_pages {
            return Err(CoreError::InvalidPage);
        }
        Ok(Self {
            page,
            page_size,
            num_pages,
        })
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    pub fn next_page(&self) -> Option<i64> {
        (self.page < self.num_pages).then_some(self.page + 1)
    }

    pub fn previous_page(&self) -> Option<i64> {
        (self.page > 1).then_some(self.page - 1)
    }
}

/// Number of pages needed for `count` records; never less than one.
pub fn num_pages(count: i64, page_size: i64) -> i64 {
    let page_size = page_size.max(1);
    let count = count.max(0);
    ((count + page_size - 1) / page_size).max(1)
}

/// Build the link to `page` from a base URL and the request's query string.
///
/// The `page` parameter is replaced and other parameters are kept in order.
/// The link to page 1 drops `page` entirely.
pub fn page_link(base: &str, query: Option<&str>, page: i64) -> String {
    let mut pairs: Vec<String> = query
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some(PAGE_QUERY_PARAM))
        .map(str::to_owned)
        .collect();
    if page > 1 {
        pairs.push(format!("{PAGE_QUERY_PARAM}={page}"));
    }
    if pairs.is_empty() {
        base.to_owned()
    } else {
        format!("{base}?{}", pairs.join("&"))
    }
}

/// The paginated response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_defaults_to_first_page() {
        assert_eq!(PageNumber::parse(None).unwrap(), PageNumber::Number(1));
        assert_eq!(PageNumber::parse(Some("")).unwrap(), PageNumber::Number(1));
    }

    #[test]
    fn parse_accepts_numbers_and_last() {
        assert_eq!(PageNumber::parse(Some("3")).unwrap(), PageNumber::Number(3));
        assert_eq!(PageNumber::parse(Some("last")).unwrap(), PageNumber::Last);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_matches!(PageNumber::parse(Some("two")), Err(CoreError::InvalidPage));
    }

    #[test]
    fn num_pages_has_a_floor_of_one() {
        assert_eq!(num_pages(0, 2), 1);
        assert_eq!(num_pages(1, 2), 1);
        assert_eq!(num_pages(4, 2), 2);
        assert_eq!(num_pages(5, 2), 3);
    }

    #[test]
    fn five_records_in_pages_of_two() {
        let first = PageWindow::resolve(PageNumber::Number(1), 5, 2).unwrap();
        assert_eq!((first.offset(), first.limit()), (0, 2));
        assert_eq!(first.next_page(), Some(2));
        assert_eq!(first.previous_page(), None);

        let last = PageWindow::resolve(PageNumber::Last, 5, 2).unwrap();
        assert_eq!(last.page, 3);
        assert_eq!(last.offset(), 4);
        assert_eq!(last.next_page(), None);
        assert_eq!(last.previous_page(), Some(2));
    }

    #[test]
    fn empty_result_set_still_has_page_one() {
        let window = PageWindow::resolve(PageNumber::Number(1), 0, 2).unwrap();
        assert_eq!(window.num_pages, 1);
        assert_eq!(window.next_page(), None);
        assert_eq!(window.previous_page(), None);
    }

    #[test]
    fn out_of_range_pages_are_invalid() {
        assert_matches!(
            PageWindow::resolve(PageNumber::Number(0), 5, 2),
            Err(CoreError::InvalidPage)
        );
        assert_matches!(
            PageWindow::resolve(PageNumber::Number(4), 5, 2),
            Err(CoreError::InvalidPage)
        );
        assert_matches!(
            PageWindow::resolve(PageNumber::Number(2), 0, 2),
            Err(CoreError::InvalidPage)
        );
    }

    #[test]
    fn page_link_replaces_page_and_keeps_other_params() {
        assert_eq!(
            page_link("http://h/cursos", Some("page=2&ordem=asc"), 3),
            "http://h/cursos?ordem=asc&page=3"
        );
    }

    #[test]
    fn page_link_to_first_page_drops_param() {
        assert_eq!(page_link("/cursos", Some("page=2"), 1), "/cursos");
        assert_eq!(page_link("/cursos", None, 1), "/cursos");
    }

    #[test]
    fn page_link_without_query() {
        assert_eq!(page_link("/cursos", None, 2), "/cursos?page=2");
    }

    #[test]
    fn envelope_serializes_null_links() {
        let page: Page<i64> = Page {
            count: 0,
            next: None,
            previous: None,
            results: vec![],
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["count"], 0);
        assert!(json["next"].is_null());
        assert!(json["previous"].is_null());
        assert_eq!(json["results"], serde_json::json!([]));
    }
}

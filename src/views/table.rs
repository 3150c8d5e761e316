//! Link building for the sortable, paginated tables. Every header, pager
//! button and refresh control re-requests the table partial with the current
//! filters carried along.

use crate::listing::{Pager, SortState};

/// Number of page links shown around the current page.
const PAGE_WINDOW: u32 = 5;

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
    pub sortable: bool,
}

impl Column {
    pub const fn sortable(key: &'static str, label: &'static str) -> Self {
        Self { key, label, sortable: true }
    }

    pub const fn plain(key: &'static str, label: &'static str) -> Self {
        Self { key, label, sortable: false }
    }
}

pub struct Header {
    pub label: &'static str,
    pub url: Option<String>,
    pub indicator: &'static str,
}

pub struct PageLink {
    pub number: u32,
    pub url: String,
    pub current: bool,
}

/// Everything the pager footer needs, precomputed.
pub struct PagerView {
    pub previous: Option<String>,
    pub next: Option<String>,
    pub links: Vec<PageLink>,
    pub summary: String,
    pub total_pages: u64,
}

pub struct TableNav {
    endpoint: &'static str,
    params: Vec<(&'static str, String)>,
    sort: SortState,
    pager: Pager,
}

impl TableNav {
    pub fn new(endpoint: &'static str, sort: SortState, pager: Pager) -> Self {
        Self {
            endpoint,
            params: Vec::new(),
            sort,
            pager,
        }
    }

    /// Carry a filter into every generated link. Blank values are dropped.
    pub fn param(mut self, key: &'static str, value: &str) -> Self {
        let value = value.trim();
        if !value.is_empty() {
            self.params.push((key, value.to_string()));
        }
        self
    }

    fn url(&self, page: u32, sort: &SortState) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.params {
            query.append_pair(key, value);
        }
        query.append_pair("page", &page.to_string());
        if let Some(field) = &sort.field {
            query.append_pair("sort", field);
            query.append_pair("dir", sort.direction.as_str());
        }
        format!("{}?{}", self.endpoint, query.finish())
    }

    pub fn refresh_url(&self) -> String {
        self.url(self.pager.page, &self.sort)
    }

    /// Sorting always returns to the first page.
    pub fn headers(&self, columns: &[Column]) -> Vec<Header> {
        columns
            .iter()
            .map(|col| Header {
                label: col.label,
                url: col
                    .sortable
                    .then(|| self.url(1, &self.sort.toggle(col.key))),
                indicator: if col.sortable { self.sort.indicator(col.key) } else { "" },
            })
            .collect()
    }

    pub fn pager(&self) -> PagerView {
        let pager = &self.pager;
        PagerView {
            previous: pager
                .has_previous()
                .then(|| self.url(pager.previous(), &self.sort)),
            next: pager.has_next().then(|| self.url(pager.next(), &self.sort)),
            links: pager
                .window(PAGE_WINDOW)
                .into_iter()
                .map(|number| PageLink {
                    number,
                    url: self.url(number, &self.sort),
                    current: number == pager.page,
                })
                .collect(),
            summary: if pager.count == 0 {
                "No results".to_string()
            } else {
                format!(
                    "Showing {} to {} of {}",
                    pager.first_item(),
                    pager.last_item(),
                    pager.count
                )
            },
            total_pages: pager.total_pages(),
        }
    }
}

/// One rendered table: rows plus the controls around them.
pub struct TableData<R> {
    pub rows: Vec<R>,
    pub headers: Vec<Header>,
    pub pager: PagerView,
    pub refresh_url: String,
    pub count: u64,
    pub error: Option<String>,
}

impl<R> TableData<R> {
    pub fn new(nav: &TableNav, columns: &[Column], rows: Vec<R>, error: Option<String>) -> Self {
        Self {
            headers: nav.headers(columns),
            pager: nav.pager(),
            refresh_url: nav.refresh_url(),
            count: nav.pager.count,
            rows,
            error,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

//! The list-fetch cycle shared by every table screen: sort state, pagination
//! controls, and settling an upstream result into something renderable.

use std::future::Future;

use crate::api::page::Page;
use crate::api::query::{OrderBy, SortDirection};
use crate::api::ApiError;
use crate::error::AppError;
use crate::notify::Notice;
use crate::sequence::RequestSequencer;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    pub field: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    /// Build from raw query parameters, ignoring fields outside `allowed`.
    pub fn from_params(field: Option<&str>, direction: Option<&str>, allowed: &[&str]) -> Self {
        let field = field
            .map(str::trim)
            .filter(|f| allowed.contains(f))
            .map(str::to_string);
        let direction = direction.and_then(SortDirection::parse).unwrap_or_default();
        Self { field, direction }
    }

    /// Same field flips the direction; a new field starts descending.
    pub fn toggle(&self, field: &str) -> Self {
        if self.field.as_deref() == Some(field) {
            Self {
                field: self.field.clone(),
                direction: self.direction.toggled(),
            }
        } else {
            Self {
                field: Some(field.to_string()),
                direction: SortDirection::Desc,
            }
        }
    }

    pub fn order_by(&self) -> Option<OrderBy> {
        self.field
            .as_ref()
            .map(|f| OrderBy::new(f.clone(), self.direction))
    }

    pub fn indicator(&self, field: &str) -> &'static str {
        match (self.field.as_deref() == Some(field), self.direction) {
            (false, _) => "",
            (true, SortDirection::Asc) => "▲",
            (true, SortDirection::Desc) => "▼",
        }
    }

    pub fn field_str(&self) -> &str {
        self.field.as_deref().unwrap_or_default()
    }
}

/// Pagination controls, derived from the server-side total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub page: u32,
    pub page_size: u32,
    pub count: u64,
}

impl Pager {
    pub fn new(page: u32, page_size: u32, count: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            count,
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.count.div_ceil(self.page_size as u64)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        (self.page as u64) < self.total_pages()
    }

    pub fn previous(&self) -> u32 {
        self.page.saturating_sub(1).max(1)
    }

    pub fn next(&self) -> u32 {
        self.page.saturating_add(1)
    }

    /// Up to `width` page numbers centered on the current page.
    pub fn window(&self, width: u32) -> Vec<u32> {
        let total = self.total_pages().min(u32::MAX as u64) as u32;
        if total == 0 || width == 0 {
            return Vec::new();
        }
        let width = width.min(total);
        let half = width / 2;
        let mut start = self.page.saturating_sub(half).max(1);
        if start + width - 1 > total {
            start = total - width + 1;
        }
        (start..start + width).collect()
    }

    pub fn first_item(&self) -> u64 {
        if self.count == 0 {
            0
        } else {
            (self.page as u64 - 1) * self.page_size as u64 + 1
        }
    }

    pub fn last_item(&self) -> u64 {
        (self.page as u64 * self.page_size as u64).min(self.count)
    }
}

/// Titles used for the load notifications of one screen.
#[derive(Debug, Clone, Copy)]
pub struct ListLabels {
    pub loaded_title: &'static str,
    pub loaded: &'static str,
    pub failed: &'static str,
}

/// A settled list load: the page to render plus the toast for it.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    pub page: Page<T>,
    pub error: Option<String>,
    pub notice: Notice,
}

impl<T> ListView<T> {
    pub fn is_empty(&self) -> bool {
        self.page.results.is_empty()
    }
}

/// Turn an upstream result into a view. Any failure wipes the list and
/// count; only an expired session escapes as an error.
pub fn settle<T>(result: Result<Page<T>, ApiError>, labels: &ListLabels) -> Result<ListView<T>, AppError> {
    match result {
        Ok(page) => {
            tracing::debug!(count = page.count, rows = page.results.len(), "{}", labels.loaded_title);
            Ok(ListView {
                page,
                error: None,
                notice: Notice::success(labels.loaded_title, labels.loaded),
            })
        }
        Err(ApiError::Unauthorized) => Err(AppError::Unauthorized(
            "Session expired".to_string(),
        )),
        Err(e) => {
            tracing::error!("{}: {e}", labels.failed);
            let message = e.message();
            Ok(ListView {
                page: Page::empty(),
                error: Some(message.clone()),
                notice: Notice::error(labels.failed, message),
            })
        }
    }
}

/// Run one list fetch under a sequencer ticket. Returns `None` when a newer
/// request for the same widget was dispatched while this one was in flight.
pub async fn run_list<T, F>(
    sequencer: &RequestSequencer,
    token: &str,
    widget: &'static str,
    labels: &ListLabels,
    fetch: F,
) -> Result<Option<ListView<T>>, AppError>
where
    F: Future<Output = Result<Page<T>, ApiError>>,
{
    let ticket = sequencer.begin(token, widget);
    let result = fetch.await;
    if sequencer.is_stale(&ticket) {
        tracing::debug!(widget, seq = ticket.seq(), "Discarding superseded list response");
        return Ok(None);
    }
    settle(result, labels).map(Some)
}

/// Full-page variant of [`run_list`]: takes a ticket so any partial still in
/// flight for the widget is superseded, but always renders its own result.
pub async fn load_list<T, F>(
    sequencer: &RequestSequencer,
    token: &str,
    widget: &'static str,
    labels: &ListLabels,
    fetch: F,
) -> Result<ListView<T>, AppError>
where
    F: Future<Output = Result<Page<T>, ApiError>>,
{
    let _ticket = sequencer.begin(token, widget);
    settle(fetch.await, labels)
}

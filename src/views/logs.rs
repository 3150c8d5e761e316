//! SMS and push-notification (FCM) delivery logs. Read-only tables.

use askama::Template;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::api::query::ListQuery;
use crate::auth::session::Session;
use crate::error::AppError;
use crate::listing::{self, ListLabels, ListView, Pager, SortState};
use crate::models::de::format_timestamp;
use crate::models::log::{kind_class, status_class};
use crate::models::{FcmLog, SmsLog};
use crate::notify::{self, Notice};
use crate::state::SharedState;
use crate::views::table::{Column, TableData, TableNav};
use crate::views::{render, superseded, text, Layout};

pub const SMS_PAGE_SIZE: u32 = 20;
pub const FCM_PAGE_SIZES: [u32; 3] = [50, 100, 200];
pub const FCM_DEFAULT_PAGE_SIZE: u32 = 100;

const SMS_WIDGET: &str = "sms-logs";
const FCM_WIDGET: &str = "fcm-logs";

const SMS_SORT_FIELDS: &[&str] = &["created_at", "phone_number"];
const FCM_SORT_FIELDS: &[&str] = &["created_at", "device_id"];

const SMS_COLUMNS: &[Column] = &[
    Column::sortable("phone_number", "Phone number"),
    Column::plain("message", "Message"),
    Column::plain("type", "Type"),
    Column::plain("status", "Status"),
    Column::plain("cost", "Cost"),
    Column::sortable("created_at", "Sent"),
];

const FCM_COLUMNS: &[Column] = &[
    Column::sortable("device_id", "Device"),
    Column::plain("message", "Message"),
    Column::plain("data", "Data"),
    Column::plain("status", "Status"),
    Column::sortable("created_at", "Sent"),
];

const SMS_LABELS: ListLabels = ListLabels {
    loaded_title: "SMS logs loaded",
    loaded: "The SMS log is up to date.",
    failed: "Failed to load SMS logs",
};

const FCM_LABELS: ListLabels = ListLabels {
    loaded_title: "FCM logs loaded",
    loaded: "The notification log is up to date.",
    failed: "Failed to load FCM logs",
};

fn clean(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default().trim()
}

/// A select value, with "all" meaning no filter.
fn choice(value: &Option<String>) -> &str {
    match clean(value) {
        "all" => "",
        other => other,
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SmsParams {
    pub page: Option<u32>,
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

impl SmsParams {
    fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    fn sort(&self) -> SortState {
        SortState::from_params(self.sort.as_deref(), self.dir.as_deref(), SMS_SORT_FIELDS)
    }

    fn query(&self) -> ListQuery {
        ListQuery::paged(self.page(), SMS_PAGE_SIZE)
            .search(clean(&self.search))
            .filter("type", choice(&self.kind))
            .filter("status", choice(&self.status))
            .ordering(self.sort().order_by())
    }

    fn table(&self, view: &ListView<SmsLog>) -> TableData<SmsRow> {
        let nav = TableNav::new(
            "/htmx/sms-logs/table",
            self.sort(),
            Pager::new(self.page(), SMS_PAGE_SIZE, view.page.count),
        )
        .param("search", clean(&self.search))
        .param("type", choice(&self.kind))
        .param("status", choice(&self.status));
        let rows = view.page.results.iter().map(SmsRow::from).collect();
        TableData::new(&nav, SMS_COLUMNS, rows, view.error.clone())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FcmParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub device_id: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

impl FcmParams {
    fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Only the offered sizes are honored.
    fn page_size(&self) -> u32 {
        self.page_size
            .filter(|size| FCM_PAGE_SIZES.contains(size))
            .unwrap_or(FCM_DEFAULT_PAGE_SIZE)
    }

    fn sort(&self) -> SortState {
        SortState::from_params(self.sort.as_deref(), self.dir.as_deref(), FCM_SORT_FIELDS)
    }

    fn query(&self) -> ListQuery {
        ListQuery::paged(self.page(), self.page_size())
            .search(clean(&self.search))
            .filter("device_id", clean(&self.device_id))
            .ordering(self.sort().order_by())
    }

    fn table(&self, view: &ListView<FcmLog>) -> TableData<FcmRow> {
        let nav = TableNav::new(
            "/htmx/fcm-logs/table",
            self.sort(),
            Pager::new(self.page(), self.page_size(), view.page.count),
        )
        .param("search", clean(&self.search))
        .param("device_id", clean(&self.device_id))
        .param("page_size", &self.page_size().to_string());
        let rows = view.page.results.iter().map(FcmRow::from).collect();
        TableData::new(&nav, FCM_COLUMNS, rows, view.error.clone())
    }
}

pub struct SmsRow {
    pub phone_number: String,
    pub message: String,
    pub kind: String,
    pub kind_class: &'static str,
    pub status: String,
    pub status_class: &'static str,
    pub cost: String,
    pub created_at: String,
}

impl From<&SmsLog> for SmsRow {
    fn from(log: &SmsLog) -> Self {
        let kind = text(log.kind.as_deref());
        let status = text(log.status.as_deref());
        Self {
            phone_number: text(log.phone_number.as_deref()),
            message: text(log.message.as_deref()),
            kind_class: kind_class(&kind.to_lowercase()),
            status_class: status_class(&status.to_lowercase()),
            kind,
            status,
            cost: log
                .cost
                .map(|c| format!("{c:.2}"))
                .unwrap_or_else(|| "N/A".to_string()),
            created_at: format_timestamp(log.created_at.as_ref()),
        }
    }
}

pub struct FcmRow {
    pub device_id: String,
    pub message: String,
    pub data: Option<String>,
    pub status: String,
    pub status_class: &'static str,
    pub created_at: String,
}

impl From<&FcmLog> for FcmRow {
    fn from(log: &FcmLog) -> Self {
        let status = text(log.status.as_deref());
        Self {
            device_id: text(log.device_id.as_deref()),
            message: text(log.message.as_deref()),
            data: log
                .data
                .as_ref()
                .filter(|d| !d.is_null())
                .map(|d| serde_json::to_string_pretty(d).unwrap_or_default()),
            status_class: status_class(&status.to_lowercase()),
            status,
            created_at: format_timestamp(log.created_at.as_ref()),
        }
    }
}

#[derive(Template)]
#[template(path = "logs/sms_list.html")]
struct SmsPageTemplate {
    layout: Layout,
    table: TableData<SmsRow>,
    search: String,
    kind: String,
    status: String,
}

#[derive(Template)]
#[template(path = "logs/sms_table_partial.html")]
struct SmsTableTemplate {
    table: TableData<SmsRow>,
    notice: Option<Notice>,
}

#[derive(Template)]
#[template(path = "logs/fcm_list.html")]
struct FcmPageTemplate {
    layout: Layout,
    table: TableData<FcmRow>,
    search: String,
    device_id: String,
    page_size: u32,
    page_sizes: [u32; 3],
}

#[derive(Template)]
#[template(path = "logs/fcm_table_partial.html")]
struct FcmTableTemplate {
    table: TableData<FcmRow>,
    notice: Option<Notice>,
}

pub async fn sms_page(
    session: Session,
    State(state): State<SharedState>,
    Query(params): Query<SmsParams>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let (jar, flash) = notify::take_flash(jar);
    let query = params.query();
    let view = listing::load_list(
        &state.sequencer,
        &session.token,
        SMS_WIDGET,
        &SMS_LABELS,
        state.api.list_sms_logs(&session.token, &query),
    )
    .await?;

    let template = SmsPageTemplate {
        layout: Layout::new(&state, "SMS logs", "sms-logs")
            .with_notice(flash.or(Some(view.notice.clone()))),
        table: params.table(&view),
        search: clean(&params.search).to_string(),
        kind: choice(&params.kind).to_string(),
        status: choice(&params.status).to_string(),
    };
    Ok((jar, render(&template)?).into_response())
}

pub async fn sms_table(
    session: Session,
    State(state): State<SharedState>,
    Query(params): Query<SmsParams>,
) -> Result<Response, AppError> {
    let query = params.query();
    let Some(view) = listing::run_list(
        &state.sequencer,
        &session.token,
        SMS_WIDGET,
        &SMS_LABELS,
        state.api.list_sms_logs(&session.token, &query),
    )
    .await?
    else {
        return Ok(superseded());
    };

    let template = SmsTableTemplate {
        table: params.table(&view),
        notice: Some(view.notice),
    };
    Ok(render(&template)?.into_response())
}

pub async fn fcm_page(
    session: Session,
    State(state): State<SharedState>,
    Query(params): Query<FcmParams>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let (jar, flash) = notify::take_flash(jar);
    let query = params.query();
    let view = listing::load_list(
        &state.sequencer,
        &session.token,
        FCM_WIDGET,
        &FCM_LABELS,
        state.api.list_fcm_logs(&session.token, &query),
    )
    .await?;

    let template = FcmPageTemplate {
        layout: Layout::new(&state, "FCM logs", "fcm-logs")
            .with_notice(flash.or(Some(view.notice.clone()))),
        table: params.table(&view),
        search: clean(&params.search).to_string(),
        device_id: clean(&params.device_id).to_string(),
        page_size: params.page_size(),
        page_sizes: FCM_PAGE_SIZES,
    };
    Ok((jar, render(&template)?).into_response())
}

pub async fn fcm_table(
    session: Session,
    State(state): State<SharedState>,
    Query(params): Query<FcmParams>,
) -> Result<Response, AppError> {
    let query = params.query();
    let Some(view) = listing::run_list(
        &state.sequencer,
        &session.token,
        FCM_WIDGET,
        &FCM_LABELS,
        state.api.list_fcm_logs(&session.token, &query),
    )
    .await?
    else {
        return Ok(superseded());
    };

    let template = FcmTableTemplate {
        table: params.table(&view),
        notice: Some(view.notice),
    };
    Ok(render(&template)?.into_response())
}

use askama::Template;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::api::query::ListQuery;
use crate::api::ApiError;
use crate::auth::session::Session;
use crate::error::AppError;
use crate::listing::{self, ListLabels, ListView, Pager, SortState};
use crate::models::de::format_timestamp;
use crate::models::partner::format_xof;
use crate::models::{Partner, PartnerStats};
use crate::notify::{self, Notice};
use crate::state::SharedState;
use crate::views::table::{Column, TableData, TableNav};
use crate::views::users::UserRow;
use crate::views::{render, superseded, Layout};

pub const PAGE_SIZE: u32 = 20;
const WIDGET: &str = "partners";
const TABLE_PATH: &str = "/htmx/partners/table";

const SORT_FIELDS: &[&str] = &["display_name", "email", "created_at"];
const COLUMNS: &[Column] = &[
    Column::sortable("display_name", "Partner"),
    Column::sortable("email", "Contact"),
    Column::plain("status", "Status"),
    Column::plain("commissions", "Commissions"),
    Column::plain("balance", "Balance"),
    Column::plain("transactions", "Transactions"),
    Column::sortable("created_at", "Joined"),
    Column::plain("actions", ""),
];

const LABELS: ListLabels = ListLabels {
    loaded_title: "Partners loaded",
    loaded: "The partner list is up to date.",
    failed: "Failed to load partners",
};

#[derive(Debug, Default, Deserialize)]
pub struct PartnerListParams {
    pub page: Option<u32>,
    pub search: Option<String>,
    pub is_active: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

impl PartnerListParams {
    fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    fn search(&self) -> &str {
        self.search.as_deref().unwrap_or_default().trim()
    }

    fn is_active(&self) -> &str {
        match self.is_active.as_deref().map(str::trim) {
            Some(v @ ("true" | "false")) => v,
            _ => "all",
        }
    }

    fn sort(&self) -> SortState {
        SortState::from_params(self.sort.as_deref(), self.dir.as_deref(), SORT_FIELDS)
    }

    fn query(&self) -> ListQuery {
        ListQuery::paged(self.page(), PAGE_SIZE)
            .search(self.search())
            .filter("is_active", self.is_active())
            .ordering(self.sort().order_by())
    }

    fn table(&self, view: &ListView<Partner>) -> TableData<PartnerRow> {
        let nav = TableNav::new(
            TABLE_PATH,
            self.sort(),
            Pager::new(self.page(), PAGE_SIZE, view.page.count),
        )
        .param("search", self.search())
        .param("is_active", self.is_active());
        let rows = view.page.results.iter().map(PartnerRow::from).collect();
        TableData::new(&nav, COLUMNS, rows, view.error.clone())
    }
}

pub struct PartnerRow {
    pub user: UserRow,
    pub commissions: String,
    pub balance: String,
    pub transactions: u64,
}

impl From<&Partner> for PartnerRow {
    fn from(partner: &Partner) -> Self {
        Self {
            user: UserRow::from(&partner.user),
            commissions: format_xof(partner.total_commissions_received.unwrap_or(0.0)),
            balance: format_xof(partner.account_balance.unwrap_or(0.0)),
            transactions: partner.total_transactions.unwrap_or(0),
        }
    }
}

pub struct StatsView {
    pub total: u64,
    pub total_commissions: String,
    pub active: usize,
    pub active_percent: u64,
    pub total_transactions: u64,
}

impl StatsView {
    fn from_view(view: &ListView<Partner>) -> Self {
        let stats = PartnerStats::compute(&view.page.results, view.page.count);
        Self {
            total: view.page.count,
            total_commissions: format_xof(stats.total_commissions),
            active: stats.active,
            active_percent: stats.active_percent,
            total_transactions: stats.total_transactions,
        }
    }
}

pub struct PartnerDetail {
    pub row: PartnerRow,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub can_process_ussd: bool,
    pub last_login_at: String,
}

#[derive(Template)]
#[template(path = "partners/list.html")]
struct PartnersPageTemplate {
    layout: Layout,
    stats: StatsView,
    table: TableData<PartnerRow>,
    search: String,
    is_active: String,
}

#[derive(Template)]
#[template(path = "partners/table_partial.html")]
struct PartnersTableTemplate {
    stats: StatsView,
    table: TableData<PartnerRow>,
    notice: Option<Notice>,
}

#[derive(Template)]
#[template(path = "partners/detail.html")]
struct PartnerDetailTemplate {
    partner: Option<PartnerDetail>,
    error: Option<String>,
    notice: Option<Notice>,
}

fn ensure_enabled(state: &SharedState) -> Result<(), AppError> {
    if state.config.partners_enabled {
        Ok(())
    } else {
        Err(AppError::NotFound("The partner screen is disabled".to_string()))
    }
}

pub async fn list_page(
    session: Session,
    State(state): State<SharedState>,
    Query(params): Query<PartnerListParams>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    ensure_enabled(&state)?;

    let (jar, flash) = notify::take_flash(jar);
    let query = params.query();
    let view = listing::load_list(
        &state.sequencer,
        &session.token,
        WIDGET,
        &LABELS,
        state.api.list_partners(&session.token, &query),
    )
    .await?;

    let template = PartnersPageTemplate {
        layout: Layout::new(&state, "Partners", "partners")
            .with_notice(flash.or(Some(view.notice.clone()))),
        stats: StatsView::from_view(&view),
        table: params.table(&view),
        search: params.search().to_string(),
        is_active: params.is_active().to_string(),
    };
    Ok((jar, render(&template)?).into_response())
}

pub async fn table_partial(
    session: Session,
    State(state): State<SharedState>,
    Query(params): Query<PartnerListParams>,
) -> Result<Response, AppError> {
    ensure_enabled(&state)?;

    let query = params.query();
    let Some(view) = listing::run_list(
        &state.sequencer,
        &session.token,
        WIDGET,
        &LABELS,
        state.api.list_partners(&session.token, &query),
    )
    .await?
    else {
        return Ok(superseded());
    };

    let template = PartnersTableTemplate {
        stats: StatsView::from_view(&view),
        table: params.table(&view),
        notice: Some(view.notice),
    };
    Ok(render(&template)?.into_response())
}

pub async fn detail_modal(
    session: Session,
    State(state): State<SharedState>,
    Path(uid): Path<String>,
) -> Result<Html<String>, AppError> {
    ensure_enabled(&state)?;

    let template = match state.api.partner_detail(&session.token, &uid).await {
        Ok(partner) => PartnerDetailTemplate {
            partner: Some(PartnerDetail {
                email_verified: partner.user.email_verified,
                phone_verified: partner.user.phone_verified,
                can_process_ussd: partner.user.can_process_ussd_transaction,
                last_login_at: format_timestamp(partner.user.last_login_at.as_ref()),
                row: PartnerRow::from(&partner),
            }),
            error: None,
            notice: None,
        },
        Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized.into()),
        Err(e) => {
            tracing::warn!(uid = %uid, "Failed to load partner detail: {e}");
            let message = e.message();
            PartnerDetailTemplate {
                partner: None,
                notice: Some(Notice::error("Failed to load partner", message.clone())),
                error: Some(message),
            }
        }
    };
    render(&template)
}

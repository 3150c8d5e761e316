use askama::Template;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::api::query::ListQuery;
use crate::api::ApiError;
use crate::auth::session::Session;
use crate::error::AppError;
use crate::forms::RegisterForm;
use crate::listing::{self, ListLabels, ListView, Pager, SortState};
use crate::models::de::format_timestamp;
use crate::models::{User, UserFlag};
use crate::notify::{self, Notice};
use crate::state::SharedState;
use crate::views::table::{Column, TableData, TableNav};
use crate::views::{render, superseded, text, Layout};

pub const PAGE_SIZE: u32 = 10;
const WIDGET: &str = "users";
const TABLE_PATH: &str = "/htmx/users/table";

const SORT_FIELDS: &[&str] = &["display_name", "email", "created_at"];
const COLUMNS: &[Column] = &[
    Column::plain("select", ""),
    Column::sortable("display_name", "User"),
    Column::sortable("email", "Contact"),
    Column::plain("status", "Status"),
    Column::plain("roles", "Roles"),
    Column::sortable("created_at", "Joined"),
    Column::plain("actions", ""),
];

const LABELS: ListLabels = ListLabels {
    loaded_title: "Users loaded",
    loaded: "The user list is up to date.",
    failed: "Failed to load users",
};

const FLAGS: [UserFlag; 4] = [
    UserFlag::EmailVerified,
    UserFlag::PhoneVerified,
    UserFlag::IsPartner,
    UserFlag::CanProcessUssdTransaction,
];

#[derive(Debug, Default, Deserialize)]
pub struct UserListParams {
    pub page: Option<u32>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

impl UserListParams {
    fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    fn search(&self) -> &str {
        self.search.as_deref().unwrap_or_default().trim()
    }

    fn status(&self) -> &str {
        match self.status.as_deref().map(str::trim) {
            Some(s @ ("active" | "inactive" | "pending")) => s,
            _ => "all",
        }
    }

    fn sort(&self) -> SortState {
        SortState::from_params(self.sort.as_deref(), self.dir.as_deref(), SORT_FIELDS)
    }

    /// Pending users live under their own endpoint rather than a filter value.
    fn pending_only(&self) -> bool {
        self.status() == "pending"
    }

    fn query(&self) -> ListQuery {
        let status = if self.pending_only() { "all" } else { self.status() };
        ListQuery::paged(self.page(), PAGE_SIZE)
            .search(self.search())
            .filter("status", status)
            .ordering(self.sort().order_by())
    }

    fn table(&self, view: &ListView<User>) -> TableData<UserRow> {
        let nav = TableNav::new(
            TABLE_PATH,
            self.sort(),
            Pager::new(self.page(), PAGE_SIZE, view.page.count),
        )
        .param("search", self.search())
        .param("status", self.status());
        let rows = view.page.results.iter().map(UserRow::from).collect();
        TableData::new(&nav, COLUMNS, rows, view.error.clone())
    }
}

pub struct UserRow {
    pub uid: String,
    pub name: String,
    pub initial: String,
    pub email: String,
    pub phone: String,
    pub is_active: bool,
    pub is_partner: bool,
    pub can_process_ussd: bool,
    pub created_at: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            uid: user.uid.clone(),
            name: user.name(),
            initial: user.initial(),
            email: text(user.email.as_deref()),
            phone: text(user.phone.as_deref()),
            is_active: user.is_active,
            is_partner: user.is_partner,
            can_process_ussd: user.can_process_ussd_transaction,
            created_at: format_timestamp(user.created_at.as_ref()),
        }
    }
}

pub struct FlagView {
    pub field: &'static str,
    pub label: &'static str,
    pub enabled: bool,
    pub next_value: &'static str,
}

pub struct UserDetail {
    pub row: UserRow,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub last_login_at: String,
    pub flags: Vec<FlagView>,
}

impl From<&User> for UserDetail {
    fn from(user: &User) -> Self {
        let flags = FLAGS
            .iter()
            .map(|flag| {
                let enabled = match flag {
                    UserFlag::EmailVerified => user.email_verified,
                    UserFlag::PhoneVerified => user.phone_verified,
                    UserFlag::IsPartner => user.is_partner,
                    UserFlag::CanProcessUssdTransaction => user.can_process_ussd_transaction,
                };
                FlagView {
                    field: flag.field(),
                    label: flag.label(),
                    enabled,
                    next_value: if enabled { "false" } else { "true" },
                }
            })
            .collect();

        Self {
            row: UserRow::from(user),
            email_verified: user.email_verified,
            phone_verified: user.phone_verified,
            last_login_at: format_timestamp(user.last_login_at.as_ref()),
            flags,
        }
    }
}

#[derive(Template)]
#[template(path = "users/list.html")]
struct UsersPageTemplate {
    layout: Layout,
    table: TableData<UserRow>,
    search: String,
    status: String,
}

#[derive(Template)]
#[template(path = "users/table_partial.html")]
struct UsersTableTemplate {
    table: TableData<UserRow>,
    notice: Option<Notice>,
}

#[derive(Template)]
#[template(path = "users/row_partial.html")]
struct UserRowTemplate {
    row: UserRow,
    notice: Option<Notice>,
}

#[derive(Template)]
#[template(path = "users/detail.html")]
struct UserDetailTemplate {
    user: Option<UserDetail>,
    error: Option<String>,
    notice: Option<Notice>,
}

#[derive(Template)]
#[template(path = "users/register.html")]
struct RegisterTemplate {
    layout: Layout,
    first_name: String,
    last_name: String,
    identifier: String,
    is_partner: bool,
    can_process_ussd: bool,
    error: Option<String>,
    success: Option<String>,
}

pub async fn list_page(
    session: Session,
    State(state): State<SharedState>,
    Query(params): Query<UserListParams>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let (jar, flash) = notify::take_flash(jar);
    let query = params.query();
    let view = listing::load_list(
        &state.sequencer,
        &session.token,
        WIDGET,
        &LABELS,
        state.api.list_users(&session.token, params.pending_only(), &query),
    )
    .await?;

    let template = UsersPageTemplate {
        layout: Layout::new(&state, "Users", "users")
            .with_notice(flash.or(Some(view.notice.clone()))),
        table: params.table(&view),
        search: params.search().to_string(),
        status: params.status().to_string(),
    };
    Ok((jar, render(&template)?).into_response())
}

pub async fn table_partial(
    session: Session,
    State(state): State<SharedState>,
    Query(params): Query<UserListParams>,
) -> Result<Response, AppError> {
    let query = params.query();
    let Some(view) = listing::run_list(
        &state.sequencer,
        &session.token,
        WIDGET,
        &LABELS,
        state.api.list_users(&session.token, params.pending_only(), &query),
    )
    .await?
    else {
        return Ok(superseded());
    };

    let template = UsersTableTemplate {
        table: params.table(&view),
        notice: Some(view.notice),
    };
    Ok(render(&template)?.into_response())
}

/// Fetched fresh on every open; nothing is cached between openings.
pub async fn detail_modal(
    session: Session,
    State(state): State<SharedState>,
    Path(uid): Path<String>,
) -> Result<Html<String>, AppError> {
    match state.api.user_detail(&session.token, &uid).await {
        Ok(user) => detail_fragment(Some(&user), None, None),
        Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized.into()),
        Err(e) => {
            tracing::warn!(uid = %uid, "Failed to load user detail: {e}");
            let message = e.message();
            detail_fragment(
                None,
                Some(message.clone()),
                Some(Notice::error("Failed to load user", message)),
            )
        }
    }
}

pub async fn register_page(
    _session: Session,
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let (jar, flash) = notify::take_flash(jar);
    let page = register_form(&state, &RegisterForm::default(), None, None, flash)?;
    Ok((jar, page).into_response())
}

pub fn row_fragment(user: &User, notice: Notice) -> Result<Html<String>, AppError> {
    render(&UserRowTemplate {
        row: UserRow::from(user),
        notice: Some(notice),
    })
}

pub fn detail_fragment(
    user: Option<&User>,
    error: Option<String>,
    notice: Option<Notice>,
) -> Result<Html<String>, AppError> {
    render(&UserDetailTemplate {
        user: user.map(UserDetail::from),
        error,
        notice,
    })
}

/// Passwords are never echoed back into the form.
pub fn register_form(
    state: &SharedState,
    form: &RegisterForm,
    error: Option<String>,
    success: Option<String>,
    notice: Option<Notice>,
) -> Result<Html<String>, AppError> {
    render(&RegisterTemplate {
        layout: Layout::new(state, "Register user", "register").with_notice(notice),
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        identifier: form.identifier.clone(),
        is_partner: form.is_partner(),
        can_process_ussd: form.can_process_ussd(),
        error,
        success,
    })
}

use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PaginationMeta {
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u64>,
}

/// Every list shape the upstream API is known to answer with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Paginated {
        results: Vec<T>,
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
    },
    Users {
        users: Vec<T>,
        #[serde(default)]
        pagination: Option<PaginationMeta>,
    },
    Partners {
        partners: Vec<T>,
        #[serde(default)]
        pagination: Option<PaginationMeta>,
    },
    Bare(Vec<T>),
}

/// A list normalized to a single shape. `count` is the server-side total.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: DeserializeOwned> ListResponse<T> {
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn normalize(self) -> Page<T> {
        match self {
            ListResponse::Paginated {
                results,
                count,
                next,
                previous,
            } => Page {
                count: count.unwrap_or(results.len() as u64),
                next,
                previous,
                results,
            },
            ListResponse::Users {
                users: results,
                pagination,
            }
            | ListResponse::Partners {
                partners: results,
                pagination,
            } => Page {
                count: pagination
                    .and_then(|p| p.total_count)
                    .unwrap_or(results.len() as u64),
                next: None,
                previous: None,
                results,
            },
            ListResponse::Bare(results) => Page {
                count: results.len() as u64,
                next: None,
                previous: None,
                results,
            },
        }
    }
}

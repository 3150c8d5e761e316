use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Lenient parse used for query strings coming back from the browser.
    /// Accepts the sign form as well so old bookmarked URLs keep working.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "asc" | "+" => Some(SortDirection::Asc),
            "desc" | "-" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

/// How a sort direction is written into the upstream `ordering` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingStyle {
    /// `+field` / `-field`. The `+` is sent literally, never as `%2B`.
    Signed,
    /// `field` / `-field`.
    Django,
}

impl FromStr for OrderingStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "signed" => Ok(OrderingStyle::Signed),
            "django" => Ok(OrderingStyle::Django),
            other => Err(format!("unknown ordering style '{other}' (expected 'signed' or 'django')")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Value of the `ordering` parameter, before any URL encoding.
    pub fn wire_value(&self, style: OrderingStyle) -> String {
        let prefix = match (self.direction, style) {
            (SortDirection::Desc, _) => "-",
            (SortDirection::Asc, OrderingStyle::Signed) => "+",
            (SortDirection::Asc, OrderingStyle::Django) => "",
        };
        format!("{prefix}{}", self.field)
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction.as_str())
    }
}

/// Query parameters of one list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub filters: Vec<(String, String)>,
    pub ordering: Option<OrderBy>,
}

impl ListQuery {
    pub fn paged(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page.max(1)),
            page_size: Some(page_size.max(1)),
            ..Self::default()
        }
    }

    pub fn unpaged() -> Self {
        Self::default()
    }

    /// Blank search text is never sent.
    pub fn search(mut self, term: &str) -> Self {
        let term = term.trim();
        self.search = if term.is_empty() {
            None
        } else {
            Some(term.to_string())
        };
        self
    }

    /// Adds a filter unless it is empty or the catch-all `all`.
    pub fn filter(mut self, key: &str, value: &str) -> Self {
        let value = value.trim();
        if !value.is_empty() && value != "all" {
            self.filters.push((key.to_string(), value.to_string()));
        }
        self
    }

    pub fn ordering(mut self, ordering: Option<OrderBy>) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn to_query_string(&self, style: OrderingStyle) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(page) = self.page {
            serializer.append_pair("page", &page.to_string());
        }
        if let Some(page_size) = self.page_size {
            serializer.append_pair("page_size", &page_size.to_string());
        }
        if let Some(search) = &self.search {
            serializer.append_pair("search", search);
        }
        for (key, value) in &self.filters {
            serializer.append_pair(key, value);
        }
        let mut query = serializer.finish();

        if let Some(ordering) = &self.ordering {
            let encoded_field: String = form_urlencoded::byte_serialize(ordering.field.as_bytes()).collect();
            let value = OrderBy::new(encoded_field, ordering.direction).wire_value(style);
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str("ordering=");
            query.push_str(&value);
        }

        query
    }
}

use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

/// A toast. Rendered inline with a partial, or carried across a redirect in
/// the flash cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }

    pub fn css_class(&self) -> &'static str {
        match self.level {
            Level::Success => "toast toast-success",
            Level::Error => "toast toast-error",
        }
    }

    fn encode(&self) -> String {
        let level = match self.level {
            Level::Success => "success",
            Level::Error => "error",
        };
        form_urlencoded::Serializer::new(String::new())
            .append_pair("level", level)
            .append_pair("title", &self.title)
            .append_pair("description", &self.description)
            .finish()
    }

    fn decode(raw: &str) -> Option<Self> {
        let mut level = None;
        let mut title = None;
        let mut description = String::new();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "level" => {
                    level = match value.as_ref() {
                        "success" => Some(Level::Success),
                        "error" => Some(Level::Error),
                        _ => None,
                    }
                }
                "title" => title = Some(value.into_owned()),
                "description" => description = value.into_owned(),
                _ => {}
            }
        }
        Some(Self {
            level: level?,
            title: title?,
            description,
        })
    }
}

/// Queue a notice for the next rendered page.
pub fn set_flash(jar: CookieJar, notice: &Notice) -> CookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, notice.encode()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(5))
        .build();
    jar.add(cookie)
}

/// Pop the pending notice, if any. The returned jar clears the cookie.
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<Notice>) {
    let notice = jar.get(FLASH_COOKIE).and_then(|c| Notice::decode(c.value()));
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, notice);
    }
    let removal = Cookie::build((FLASH_COOKIE, "")).path("/").build();
    (jar.remove(removal), notice)
}

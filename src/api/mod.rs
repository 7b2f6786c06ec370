use serde::{Deserialize, Serialize};
use strum::AsRefStr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Network,
    Http,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Default bibo server address when the page origin is unavailable.
const FALLBACK_API_URL: &str = "http://localhost:5000";

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
    pub bib_file: Option<String>,
}

fn env_string(env: &wasm_bindgen::JsValue, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        js_sys::Reflect::get(env, &(*name).into())
            .ok()
            .and_then(|v| v.as_string())
    })
}

impl EnvConfig {
    pub fn new() -> Self {
        let window = web_sys::window();

        // `window.ENV.API_URL` wins, `window.ENV.api_url` is accepted too.
        let env = window
            .as_ref()
            .and_then(|w| w.get("ENV"))
            .filter(|env| !env.is_undefined() && env.is_object());

        let api_url = env
            .as_ref()
            .and_then(|env| env_string(env, &["API_URL", "api_url"]))
            .or_else(|| window.as_ref().and_then(|w| w.location().origin().ok()))
            .filter(|url| !url.trim().is_empty() && url != "null")
            .unwrap_or_else(|| FALLBACK_API_URL.to_string());

        let bib_file = env
            .as_ref()
            .and_then(|env| env_string(env, &["BIB_FILE", "bib_file"]));

        Self { api_url, bib_file }
    }
}

/// Server path for an action on one entry: `/entry/{key}/{action}`.
pub(crate) fn entry_path(entry_key: &str, action: &str) -> String {
    format!("/entry/{}/{}", urlencoding::encode(entry_key), action)
}

/// What the server is asked to do with one entry. The kebab-case name is the
/// last path segment.
#[derive(Clone, Debug, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum EntryAction {
    OpenFile,
    FieldEdit { field: String, value: String },
    FieldRemove { field: String },
}

/// One request to the per-entry endpoints, described before it is sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct EntryCall {
    pub entry_key: String,
    pub action: EntryAction,
}

impl EntryCall {
    pub fn open_file(entry_key: impl Into<String>) -> Self {
        Self {
            entry_key: entry_key.into(),
            action: EntryAction::OpenFile,
        }
    }

    pub fn field_edit(
        entry_key: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            entry_key: entry_key.into(),
            action: EntryAction::FieldEdit {
                field: field.into(),
                value: value.into(),
            },
        }
    }

    pub fn field_remove(entry_key: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            entry_key: entry_key.into(),
            action: EntryAction::FieldRemove {
                field: field.into(),
            },
        }
    }

    pub fn path(&self) -> String {
        entry_path(&self.entry_key, self.action.as_ref())
    }

    /// Form body: `{field: value}` for an edit, `{"field": name}` for a
    /// removal, none for open-file.
    pub fn form(&self) -> Option<[(&str, &str); 1]> {
        match &self.action {
            EntryAction::OpenFile => None,
            EntryAction::FieldEdit { field, value } => Some([(field.as_str(), value.as_str())]),
            EntryAction::FieldRemove { field } => Some([("field", field.as_str())]),
        }
    }
}

/// Client for the per-entry endpoints of the bibo server.
///
/// Every call is meant to be dispatched in the background; callers never wait
/// on the result before updating the page.
#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn url(&self, call: &EntryCall) -> String {
        format!("{}{}", self.base_url, call.path())
    }

    async fn check(res: reqwest::Response, ctx: &str) -> ApiResult<()> {
        if res.status().is_success() {
            Ok(())
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, ctx))
        }
    }

    /// GET for open-file, form-encoded POST for the field calls.
    pub async fn send(&self, call: &EntryCall) -> ApiResult<()> {
        let client = reqwest::Client::new();
        let req = match call.form() {
            None => client.get(self.url(call)),
            Some(form) => client.post(self.url(call)).form(&form),
        };
        let res = req.send().await.map_err(ApiError::network)?;
        Self::check(res, &format!("{} failed", call.action.as_ref())).await
    }
}

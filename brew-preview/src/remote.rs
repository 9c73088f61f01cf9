//! Homebrewery site client
//!
//! Everything the preview needs from a Homebrewery server: the parser
//! bundle, the theme list, theme stylesheets and theme snippets. Transport is
//! behind [`Fetch`] so the client can be exercised without a server.

use crate::error::FetchError;
use crate::snippets::SnippetGroup;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use ureq::Agent;
use url::Url;

/// Path of the parser bundle on the server
pub const PARSER_ENDPOINT: &str = "/api/homebreweryParser.js";
/// Path of the theme list on the server
pub const THEMES_ENDPOINT: &str = "/api/themes.json";

/// Stylesheet URL of `theme` on the server at `base_url`.
pub fn stylesheet_url(base_url: &str, theme: &str) -> String {
    format!("{}/api/themes/{theme}/style.css", base_url.trim_end_matches('/'))
}

/// Minimal blocking HTTP transport.
pub trait Fetch {
    fn get(&self, url: &Url) -> Result<String, FetchError>;
    fn post(&self, url: &Url, body: &str) -> Result<String, FetchError>;
}

/// [`Fetch`] over a pooled `ureq` agent.
pub struct HttpFetcher {
    agent: Agent,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &Url) -> Result<String, FetchError> {
        let response = self.agent.get(url.as_str()).call().map_err(|e| FetchError::Http {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        read_response(url, response)
    }

    fn post(&self, url: &Url, body: &str) -> Result<String, FetchError> {
        let response = self
            .agent
            .post(url.as_str())
            .header("Content-Type", "text/plain")
            .send(body.as_bytes())
            .map_err(|e| FetchError::Http {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        read_response(url, response)
    }
}

fn read_response(
    url: &Url,
    response: ureq::http::Response<ureq::Body>,
) -> Result<String, FetchError> {
    let status = response.status().as_u16();
    let mut body = response.into_body();

    if status >= 400 {
        let error_body = body
            .read_to_string()
            .unwrap_or_else(|_| String::from("(unable to read error body)"));
        return Err(FetchError::Http {
            url: url.to_string(),
            message: format!("HTTP {status}: {error_body}"),
        });
    }

    body.read_to_string().map_err(|e| FetchError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// A theme offered by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeInfo {
    /// Identifier used in stylesheet and snippet URLs
    pub path: String,
    pub name: String,
}

#[derive(Deserialize)]
struct ThemeList {
    #[serde(rename = "homebrewery-themes")]
    themes: Vec<ThemeInfo>,
}

/// Client for one Homebrewery server.
pub struct RemoteClient<F> {
    base_url: Url,
    fetcher: F,
}

impl RemoteClient<HttpFetcher> {
    /// Client over HTTP with the given request timeout
    pub fn http(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        Self::new(base_url, HttpFetcher::new(timeout))
    }
}

impl<F: Fetch> RemoteClient<F> {
    pub fn new(base_url: &str, fetcher: F) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url).map_err(|e| FetchError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { base_url, fetcher })
    }

    /// Resolve `path` against the server; absolute URLs are kept as given.
    pub fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url.join(path).map_err(|e| FetchError::InvalidUrl {
            url: path.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn parser_url(&self) -> Result<Url, FetchError> {
        self.endpoint(PARSER_ENDPOINT)
    }

    /// Download the parser bundle source
    pub fn fetch_parser(&self) -> Result<String, FetchError> {
        let url = self.parser_url()?;
        tracing::info!(url = %url, "Downloading Homebrewery parser");
        self.fetcher.get(&url)
    }

    /// Themes the server offers
    pub fn themes(&self) -> Result<Vec<ThemeInfo>, FetchError> {
        let url = self.endpoint(THEMES_ENDPOINT)?;
        let body = self.fetcher.get(&url)?;
        let list: ThemeList = decode(&url, &body)?;
        Ok(list.themes)
    }

    /// Snippet groups of `theme` that apply to the text editor
    pub fn snippets(&self, theme: &str) -> Result<Vec<SnippetGroup>, FetchError> {
        let url = self.endpoint(&format!("/api/themes/{theme}/snippets.json"))?;
        let body = self.fetcher.get(&url)?;
        let groups: Vec<SnippetGroup> = decode(&url, &body)?;
        let total = groups.len();
        let groups: Vec<_> = groups.into_iter().filter(SnippetGroup::is_text).collect();
        tracing::debug!(theme, total, kept = groups.len(), "Loaded snippet groups");
        Ok(groups)
    }

    /// Run the snippet at `path` and return the text it generates
    pub fn run_snippet(&self, path: &str) -> Result<String, FetchError> {
        let url = self.endpoint(path)?;
        self.fetcher.post(&url, "")
    }

    pub fn stylesheet_url(&self, theme: &str) -> String {
        stylesheet_url(self.base_url.as_str(), theme)
    }
}

fn decode<T: serde::de::DeserializeOwned>(url: &Url, body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// On-disk location of the downloaded parser bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserCache {
    dir: PathBuf,
    file_name: String,
}

impl ParserCache {
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    pub fn is_present(&self) -> bool {
        self.path().is_file()
    }

    /// Download the parser unless it is already cached.
    ///
    /// Returns `true` when a download happened.
    pub fn ensure<F: Fetch>(&self, client: &RemoteClient<F>) -> Result<bool, FetchError> {
        if self.is_present() {
            tracing::debug!(path = %self.path().display(), "Parser already present");
            return Ok(false);
        }
        self.refresh(client)?;
        Ok(true)
    }

    /// Download the parser, replacing any cached copy
    pub fn refresh<F: Fetch>(&self, client: &RemoteClient<F>) -> Result<PathBuf, FetchError> {
        let source = client.fetch_parser()?;
        fs::create_dir_all(&self.dir)?;
        let path = self.path();
        fs::write(&path, source)?;
        tracing::info!(path = %path.display(), "Saved Homebrewery parser");
        Ok(path)
    }
}

//! Location of the page hosting the chat client.
//!
//! The chat socket lives on the same host as the page, at a fixed `/chat`
//! path, and is secure exactly when the page was loaded securely.

use url::Url;

pub const CHAT_PATH: &str = "/chat";

#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("invalid page URL: {0}")]
    Invalid(#[from] url::ParseError),
    #[error("unsupported page scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),
    #[error("page URL has no host")]
    MissingHost,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    secure: bool,
    host: String,
    chat_url: Url,
}

impl PageLocation {
    /// Parse the page URL (e.g. `https://chat.example.com/app`).
    pub fn parse(page_url: &str) -> Result<Self, LocationError> {
        let page = Url::parse(page_url)?;
        let secure = match page.scheme() {
            "https" => true,
            "http" => false,
            other => return Err(LocationError::UnsupportedScheme(other.to_string())),
        };

        let host_name = page.host_str().ok_or(LocationError::MissingHost)?;
        // `port()` is None for the scheme's default port
        let host = match page.port() {
            Some(port) => format!("{host_name}:{port}"),
            None => host_name.to_string(),
        };

        let scheme = if secure { "wss" } else { "ws" };
        let chat_url = Url::parse(&format!("{scheme}://{host}{CHAT_PATH}"))?;

        Ok(Self {
            secure,
            host,
            chat_url,
        })
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// Host including a non-default port
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }
}

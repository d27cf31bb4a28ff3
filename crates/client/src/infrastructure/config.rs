//! Client configuration

use std::env;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use chrono::FixedOffset;

use crate::application::ReconnectSequencing;
use crate::infrastructure::page_location::PageLocation;
use crate::infrastructure::websocket::BackoffPolicy;

/// Client configuration loaded from environment
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Page the client is served from; decides socket scheme and host
    pub page: PageLocation,
    /// Log in as this user on startup
    pub user: Option<String>,
    /// Ordering of the post-reconnect login and catch-up request
    pub sequencing: ReconnectSequencing,
    /// Socket reconnect policy
    pub backoff: BackoffPolicy,
    /// Offset used when rendering message timestamps
    pub utc_offset: FixedOffset,
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let page_url = get("CHAT_PAGE_URL").unwrap_or_else(|| "http://localhost:8000".to_string());
        let page = PageLocation::parse(&page_url)
            .with_context(|| format!("CHAT_PAGE_URL '{page_url}' is not a usable page URL"))?;

        let sequencing = match get("CHAT_RECONNECT_SEQUENCING") {
            Some(value) => value
                .parse()
                .context("CHAT_RECONNECT_SEQUENCING is invalid")?,
            None => ReconnectSequencing::default(),
        };

        let defaults = BackoffPolicy::default();
        let initial_delay = match get("CHAT_RECONNECT_INITIAL_DELAY_MS") {
            Some(v) => Duration::from_millis(
                v.parse()
                    .context("CHAT_RECONNECT_INITIAL_DELAY_MS must be a number of milliseconds")?,
            ),
            None => defaults.initial_delay,
        };
        let max_delay = match get("CHAT_RECONNECT_MAX_DELAY_MS") {
            Some(v) => Duration::from_millis(
                v.parse()
                    .context("CHAT_RECONNECT_MAX_DELAY_MS must be a number of milliseconds")?,
            ),
            None => defaults.max_delay,
        };
        // A zero delay never grows, so the socket would redial without pausing.
        ensure!(
            !initial_delay.is_zero(),
            "CHAT_RECONNECT_INITIAL_DELAY_MS must be greater than zero"
        );
        ensure!(
            initial_delay <= max_delay,
            "CHAT_RECONNECT_INITIAL_DELAY_MS must not exceed CHAT_RECONNECT_MAX_DELAY_MS"
        );
        let max_attempts = get("CHAT_RECONNECT_MAX_ATTEMPTS")
            .map(|v| v.parse::<u32>())
            .transpose()
            .context("CHAT_RECONNECT_MAX_ATTEMPTS must be a positive integer")?;
        ensure!(
            max_attempts != Some(0),
            "CHAT_RECONNECT_MAX_ATTEMPTS must be a positive integer"
        );

        let offset_minutes: i32 = get("CHAT_UTC_OFFSET_MINUTES")
            .unwrap_or_else(|| "0".to_string())
            .parse()
            .context("CHAT_UTC_OFFSET_MINUTES must be a whole number of minutes")?;
        let utc_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .context("CHAT_UTC_OFFSET_MINUTES is out of range")?;

        Ok(Self {
            page,
            user: get("CHAT_USER"),
            sequencing,
            backoff: BackoffPolicy {
                initial_delay,
                max_delay,
                multiplier: defaults.multiplier,
                max_attempts,
            },
            utc_offset,
        })
    }
}

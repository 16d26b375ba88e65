//! Firebase Remote Config REST provider.
//!
//! # Responsibility
//! - Perform the `namespaces/firebase:fetch` round trip.
//! - Serve the last successful entries while inside the minimum fetch
//!   interval.
//!
//! # Invariants
//! - An unconfigured provider never touches the network.
//! - Failed fetches do not replace the cache.

use super::provider::{FetchError, RawFlagValues, RemoteConfigProvider};
use crate::config::RemoteConfigSettings;
use crate::model::now_epoch_ms;
use log::{debug, info};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FetchRequest<'a> {
    app_instance_id: &'a str,
    app_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct FetchResponse {
    #[serde(default)]
    entries: RawFlagValues,
    #[serde(default)]
    state: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedEntries {
    fetched_at_ms: i64,
    entries: RawFlagValues,
}

pub struct HttpRemoteConfigProvider {
    client: Client,
    settings: RemoteConfigSettings,
    app_instance_id: String,
    cache: Option<CachedEntries>,
    clock: fn() -> i64,
}

impl HttpRemoteConfigProvider {
    /// Builds a provider with the configured request timeout.
    pub fn new(settings: RemoteConfigSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(settings.fetch_timeout_ms))
            .build()?;
        Ok(Self {
            client,
            settings,
            app_instance_id: uuid::Uuid::new_v4().to_string(),
            cache: None,
            clock: now_epoch_ms,
        })
    }

    pub fn fetch_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/namespaces/firebase:fetch",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.project_id.trim()
        )
    }

    fn cached_entries(&self, now_ms: i64) -> Option<RawFlagValues> {
        let cache = self.cache.as_ref()?;
        let age_ms = now_ms.saturating_sub(cache.fetched_at_ms);
        if age_ms >= 0 && (age_ms as u64) < self.settings.minimum_fetch_interval_ms {
            Some(cache.entries.clone())
        } else {
            None
        }
    }

    fn fetch_remote(&self) -> Result<RawFlagValues, FetchError> {
        let body = FetchRequest {
            app_instance_id: &self.app_instance_id,
            app_id: &self.settings.app_id,
        };
        let resp = self
            .client
            .post(self.fetch_url())
            .query(&[("key", self.settings.api_key.as_str())])
            .json(&body)
            .send()?;

        let status = resp.status();
        let text = resp.text().unwrap_or_default();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        parse_fetch_response(&text)
    }
}

impl RemoteConfigProvider for HttpRemoteConfigProvider {
    fn fetch(&mut self) -> Result<RawFlagValues, FetchError> {
        if !self.settings.is_configured() {
            return Err(FetchError::NotConfigured);
        }

        let now = (self.clock)();
        if let Some(entries) = self.cached_entries(now) {
            debug!("event=remote_config_fetch module=flags status=cached entries={}", entries.len());
            return Ok(entries);
        }

        let entries = self.fetch_remote()?;
        info!(
            "event=remote_config_fetch module=flags status=ok entries={}",
            entries.len()
        );
        self.cache = Some(CachedEntries {
            fetched_at_ms: now,
            entries: entries.clone(),
        });
        Ok(entries)
    }
}

/// Decodes a fetch response body into raw entries.
///
/// `NO_TEMPLATE` and `EMPTY_CONFIG` responses carry no entries and decode to
/// an empty map.
pub fn parse_fetch_response(body: &str) -> Result<RawFlagValues, FetchError> {
    let parsed: FetchResponse =
        serde_json::from_str(body).map_err(|err| FetchError::InvalidPayload(err.to_string()))?;
    if let Some(state) = parsed.state.as_deref() {
        debug!("event=remote_config_fetch module=flags status=decoded state={state}");
    }
    Ok(parsed.entries)
}

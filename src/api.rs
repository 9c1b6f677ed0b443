/// Synchronous client for the **fitness-tracker HTTP service**.
///
/// Covers the activity and user endpoints the tracker exposes and returns typed
/// `models` values. Requests are sent once: there are no automatic retries, and any
/// non-2xx status is reported as an error without decoding the body.
///
/// Typical usage:
/// ```no_run
/// # use fitplot::{Client, DateRange};
/// let client = Client::new("http://localhost:8080")?;
/// let range = DateRange::parse("2025-01-01", "2025-06-01")?;
/// let rows = client.activities_to_plot("3", &range)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
use crate::models::{
    ActivityRecord, ActivityUpdate, DateRange, ListQuery, NewActivity, NewUser, User,
};
use crate::session::ActivitySource;
use anyhow::{Context, Result, bail};
use log::{debug, warn};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use reqwest::redirect::Policy;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Where the tracker service listens unless told otherwise.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL).expect("reqwest client build")
    }
}

// Allow -, _, . unescaped in path segments
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc_segment(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s.trim(), SAFE).to_string()
}

impl Client {
    /// Build a client for the service at `base_url` (trailing slashes are ignored).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(concat!("fitplot/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, http })
    }

    fn send<T: DeserializeOwned>(&self, method: &str, url: &str, req: RequestBuilder) -> Result<T> {
        debug!("{method} {url}");
        let resp = req
            .send()
            .with_context(|| format!("{method} {url}: network error"))?;
        let status = resp.status();
        if !status.is_success() {
            warn!("{method} {url} returned HTTP {status}");
            bail!("{method} {url} failed with HTTP {status}");
        }
        resp.json()
            .with_context(|| format!("{method} {url}: decode json"))
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.send("GET", url, self.http.get(url))
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(&self, url: &str, body: &B) -> Result<T> {
        self.send("POST", url, self.http.post(url).json(body))
    }

    fn patch_json<B: Serialize, T: DeserializeOwned>(&self, url: &str, body: &B) -> Result<T> {
        self.send("PATCH", url, self.http.patch(url).json(body))
    }

    /// Activities of one user between two dates (inclusive), with the derived
    /// `pace_float_mps` / `speed_kmphr` fields filled in by the service.
    pub fn activities_to_plot(
        &self,
        user_id: &str,
        range: &DateRange,
    ) -> Result<Vec<ActivityRecord>> {
        if user_id.trim().is_empty() {
            bail!("user id required");
        }
        let url = format!(
            "{}/users/{}/activities-to-plot/?{}",
            self.base_url,
            enc_segment(user_id),
            range.to_query_param()
        );
        let rows: Vec<ActivityRecord> = self.get_json(&url)?;
        debug!("fetched {} activities to plot for user {}", rows.len(), user_id.trim());
        Ok(rows)
    }

    /// Paginated listing across all users.
    pub fn list_activities(&self, query: &ListQuery) -> Result<Vec<ActivityRecord>> {
        let url = format!("{}/activities/?{}", self.base_url, query.to_query_param());
        let rows: Vec<ActivityRecord> = self.get_json(&url)?;
        Ok(with_metrics(rows))
    }

    /// Paginated listing for one user. The service answers 404 when the user has
    /// no activities, which surfaces here as an error.
    pub fn list_user_activities(
        &self,
        user_id: &str,
        query: &ListQuery,
    ) -> Result<Vec<ActivityRecord>> {
        let url = format!(
            "{}/users/{}/activities/?{}",
            self.base_url,
            enc_segment(user_id),
            query.to_query_param()
        );
        let rows: Vec<ActivityRecord> = self.get_json(&url)?;
        Ok(with_metrics(rows))
    }

    pub fn get_activity(&self, id: i64) -> Result<ActivityRecord> {
        let url = format!("{}/activities/{}", self.base_url, id);
        let row: ActivityRecord = self.get_json(&url)?;
        Ok(row.with_derived_metrics())
    }

    pub fn create_activity(&self, activity: &NewActivity) -> Result<ActivityRecord> {
        let url = format!("{}/activities/", self.base_url);
        let row: ActivityRecord = self.post_json(&url, activity)?;
        Ok(row.with_derived_metrics())
    }

    /// Send a partial update; fields left `None` keep their stored values.
    pub fn update_activity(&self, id: i64, update: &ActivityUpdate) -> Result<ActivityRecord> {
        if update.is_empty() {
            bail!("nothing to update for activity {id}");
        }
        let url = format!("{}/activities/{}", self.base_url, id);
        let row: ActivityRecord = self.patch_json(&url, update)?;
        Ok(row.with_derived_metrics())
    }

    pub fn create_user(&self, user: &NewUser) -> Result<User> {
        let url = format!("{}/users/", self.base_url);
        self.post_json(&url, user)
    }
}

/// Plain activity rows carry no pace or speed; compute them locally.
fn with_metrics(rows: Vec<ActivityRecord>) -> Vec<ActivityRecord> {
    rows.into_iter()
        .map(ActivityRecord::with_derived_metrics)
        .collect()
}

impl ActivitySource for Client {
    fn activities_to_plot(
        &self,
        user_id: &str,
        range: &DateRange,
    ) -> Result<Vec<ActivityRecord>> {
        Client::activities_to_plot(self, user_id, range)
    }
}

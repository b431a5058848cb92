//! Branding resolver – turns an organization settings record into the
//! company name and contact details printed on the letterhead.
//!
//! Resolution never fails: a failed fetch yields [`BrandingResult::Defaulted`]
//! and any field missing from a fetched record is backfilled on its own.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SettingsError;

pub const DEFAULT_COMPANY_NAME: &str = "Your Company";
pub const DEFAULT_EMAIL: &str = "info@yourcompany.com";
pub const DEFAULT_PHONE: &str = "+1 (000) 000-0000";
pub const DEFAULT_ADDRESS: &str = "123 Business Street, City, Country";

/// Organization identity printed on the letterhead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandingInfo {
    pub company_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl Default for BrandingInfo {
    fn default() -> Self {
        Self {
            company_name: DEFAULT_COMPANY_NAME.to_string(),
            email: DEFAULT_EMAIL.to_string(),
            phone: DEFAULT_PHONE.to_string(),
            address: DEFAULT_ADDRESS.to_string(),
        }
    }
}

impl BrandingInfo {
    /// Extract branding from a settings record, field by field.
    ///
    /// Expects `{navbar: {companyName}, footer: {email1, phone1, address}}`,
    /// optionally wrapped in a `{"data": ...}` envelope. Missing, blank or
    /// non-string fields take their default.
    pub fn from_record(record: &Value) -> Self {
        let record = match record.get("data") {
            Some(inner) if inner.is_object() => inner,
            _ => record,
        };
        let field = |pointer: &str, default: &str| {
            record
                .pointer(pointer)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(default)
                .to_string()
        };

        Self {
            company_name: field("/navbar/companyName", DEFAULT_COMPANY_NAME),
            email: field("/footer/email1", DEFAULT_EMAIL),
            phone: field("/footer/phone1", DEFAULT_PHONE),
            address: field("/footer/address", DEFAULT_ADDRESS),
        }
    }
}

/// Outcome of branding resolution. Both arms carry a fully populated
/// [`BrandingInfo`].
#[derive(Debug)]
pub enum BrandingResult {
    /// The settings record was fetched; absent fields were backfilled.
    Resolved(BrandingInfo),
    /// The fetch failed; every field is a default.
    Defaulted(BrandingInfo, SettingsError),
}

impl BrandingResult {
    pub fn info(&self) -> &BrandingInfo {
        match self {
            BrandingResult::Resolved(info) | BrandingResult::Defaulted(info, _) => info,
        }
    }

    pub fn into_info(self) -> BrandingInfo {
        match self {
            BrandingResult::Resolved(info) | BrandingResult::Defaulted(info, _) => info,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, BrandingResult::Resolved(_))
    }
}

/// A read-only source of the organization settings record.
pub trait SettingsSource {
    /// Fetch the raw settings record. Called once per report.
    fn fetch(&self) -> impl Future<Output = Result<Value, SettingsError>> + Send;
}

/// Resolve branding with a single fetch against `source`.
pub async fn resolve<S: SettingsSource>(source: &S) -> BrandingResult {
    resolve_with_deadline(source, None).await
}

/// Like [`resolve`], but a fetch that outlives `deadline` counts as failed.
pub async fn resolve_with_deadline<S: SettingsSource>(
    source: &S,
    deadline: Option<Duration>,
) -> BrandingResult {
    let fetched = match deadline {
        Some(limit) => match tokio::time::timeout(limit, source.fetch()).await {
            Ok(result) => result,
            Err(_) => Err(SettingsError::Timeout(limit.as_millis() as u64)),
        },
        None => source.fetch().await,
    };

    match fetched {
        Ok(record) => {
            let info = BrandingInfo::from_record(&record);
            log::debug!("branding resolved for {:?}", info.company_name);
            BrandingResult::Resolved(info)
        }
        Err(e) => {
            log::warn!("branding fetch failed, using defaults: {e}");
            BrandingResult::Defaulted(BrandingInfo::default(), e)
        }
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Fetches the settings record with an HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpSettingsSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSettingsSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl SettingsSource for HttpSettingsSource {
    async fn fetch(&self) -> Result<Value, SettingsError> {
        let resp = self.client.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SettingsError::Status(status.as_u16()));
        }
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// An in-memory settings record.
#[derive(Debug, Clone, Default)]
pub struct StaticSettings(pub Value);

impl SettingsSource for StaticSettings {
    async fn fetch(&self) -> Result<Value, SettingsError> {
        Ok(self.0.clone())
    }
}

/// Reads the settings record from a JSON file.
#[derive(Debug, Clone)]
pub struct FileSettingsSource {
    path: PathBuf,
}

impl FileSettingsSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsSource for FileSettingsSource {
    async fn fetch(&self) -> Result<Value, SettingsError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

//! HTTP-backed ShiftAdmin schedule source (feature `remote-source`).
//!
//! Queries the ShiftAdmin scheduled-shifts endpoint once per configured
//! group id and concatenates the results. Entries from the secondary group
//! can be filtered by a shift-code substring, since that calendar also
//! carries shifts from outside the program.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::config::RemoteConfig;

use super::{RawShiftEntry, ScheduleSource, SourceError};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,
    #[serde(default)]
    data: ApiData,
}

#[derive(Debug, Default, Deserialize)]
struct ApiData {
    #[serde(default, rename = "scheduledShifts")]
    scheduled_shifts: Vec<RawShiftEntry>,
}

/// Schedule source backed by the ShiftAdmin JSON API.
pub struct ShiftAdminSource {
    client: reqwest::Client,
    config: RemoteConfig,
}

impl ShiftAdminSource {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn fetch_group(
        &self,
        group_id: u32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawShiftEntry>, SourceError> {
        log::info!("requesting scheduled shifts for group {group_id}, {start} to {end}");

        let response = self
            .client
            .get(&self.config.api_url)
            .query(&[
                ("validationKey", self.config.validation_key.as_str()),
                ("gid", &group_id.to_string()),
                ("sd", &start.format(DATE_FORMAT).to_string()),
                ("ed", &end.format(DATE_FORMAT).to_string()),
            ])
            .send()
            .await
            .map_err(|e| SourceError::Remote {
                message: e.to_string(),
            })?;

        let payload: ApiResponse =
            response.json().await.map_err(|e| SourceError::Decode {
                message: e.to_string(),
            })?;

        if payload.status != "success" {
            return Err(SourceError::Remote {
                message: format!("API status was {:?} for group {group_id}", payload.status),
            });
        }

        log::info!(
            "group {group_id} returned {} shifts",
            payload.data.scheduled_shifts.len()
        );
        Ok(payload.data.scheduled_shifts)
    }
}

#[async_trait]
impl ScheduleSource for ShiftAdminSource {
    async fn fetch(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawShiftEntry>, SourceError> {
        if end < start {
            return Err(SourceError::InvalidRange { start, end });
        }

        let mut entries = self
            .fetch_group(self.config.primary_group, start, end)
            .await?;

        if let Some(secondary) = self.config.secondary_group {
            let mut extra = self.fetch_group(secondary, start, end).await?;
            if let Some(filter) = &self.config.secondary_filter {
                extra.retain(|e| e.shift_short_name.contains(filter.as_str()));
            }
            entries.append(&mut extra);
        }

        if entries.is_empty() && start < end {
            return Err(SourceError::EmptyPayload { start, end });
        }

        Ok(entries)
    }
}

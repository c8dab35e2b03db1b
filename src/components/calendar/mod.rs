//! Calendar connection and event access for a user.

mod buckets;
mod envelope;
pub mod models;

pub use buckets::{bucket_events, CalendarEvent, EventBuckets, BUCKET_SIZE};
pub use envelope::extract_event_array;
pub use models::{ConnectOutcome, ConnectionStatus, FetchWindow, RawEvent};

use crate::components::connected_accounts::{ConnectedAccount, ConnectedAccounts, ToolExecution};
use crate::components::summary::{summarize_events, SummaryOptions, SummaryResponse};
use crate::config::SummarySettings;
use crate::error::{not_connected_error, AppResult};
use crate::utils::time::iso_timestamp;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// Tool that lists Google Calendar events
pub const EVENTS_LIST_TOOL: &str = "GOOGLECALENDAR_EVENTS_LIST";

/// Account status of a usable connection
pub const ACTIVE_STATUS: &str = "ACTIVE";

/// Half-width of the window behind the upcoming/past lists, in days
pub const BUCKET_WINDOW_DAYS: i64 = 30;

/// Calendar operations for one configured auth config
#[derive(Clone)]
pub struct CalendarService {
    accounts: Arc<dyn ConnectedAccounts>,
    auth_config_id: String,
    settings: SummarySettings,
}

impl CalendarService {
    pub fn new(
        accounts: Arc<dyn ConnectedAccounts>,
        auth_config_id: &str,
        settings: SummarySettings,
    ) -> Self {
        Self {
            accounts,
            auth_config_id: auth_config_id.to_string(),
            settings,
        }
    }

    pub fn settings(&self) -> &SummarySettings {
        &self.settings
    }

    /// Active calendar account of the user, if any
    pub async fn get_existing(&self, user_id: &str) -> AppResult<Option<ConnectedAccount>> {
        let accounts = self.accounts.list_accounts(user_id).await?;
        Ok(accounts.into_iter().find(|account| {
            account.auth_config.id == self.auth_config_id && account.status == ACTIVE_STATUS
        }))
    }

    pub async fn check_status(&self, user_id: &str) -> AppResult<ConnectionStatus> {
        let existing = self.get_existing(user_id).await?;
        Ok(ConnectionStatus {
            connected: existing.is_some(),
            connection_id: existing.map(|account| account.id),
        })
    }

    /// Link the user's calendar, or report the connection that already exists
    pub async fn connect(&self, user_id: &str) -> AppResult<ConnectOutcome> {
        if let Some(existing) = self.get_existing(user_id).await? {
            debug!("User {} already connected ({})", user_id, existing.id);
            return Ok(ConnectOutcome::already_connected(existing.id));
        }

        let request = self
            .accounts
            .initiate(user_id, &self.auth_config_id)
            .await?;
        info!(
            "Created connection request {} for user {}",
            request.id, user_id
        );
        Ok(ConnectOutcome::pending(request))
    }

    /// Events within `event_window_days` either side of now
    pub async fn get_events(&self, user_id: &str) -> AppResult<Value> {
        let window = FetchWindow::around(Utc::now(), self.settings.event_window_days);
        self.get_events_in_window(user_id, window).await
    }

    /// The user's next and most recent timed events, within
    /// `BUCKET_WINDOW_DAYS` either side of now
    pub async fn get_event_buckets(&self, user_id: &str) -> AppResult<EventBuckets> {
        let now = Utc::now();
        let window = FetchWindow::around(now, BUCKET_WINDOW_DAYS);
        let payload = self.get_events_in_window(user_id, window).await?;

        let buckets = bucket_events(&payload, now);
        debug!(
            "Bucketed events for {}: {} upcoming, {} past",
            user_id,
            buckets.upcoming.len(),
            buckets.past.len()
        );
        Ok(buckets)
    }

    /// Raw upstream event listing for an explicit time range
    pub async fn get_events_in_window(&self, user_id: &str, window: FetchWindow) -> AppResult<Value> {
        let existing = self
            .get_existing(user_id)
            .await?
            .ok_or_else(not_connected_error)?;

        let execution = ToolExecution {
            user_id: user_id.to_string(),
            connected_account_id: existing.id,
            arguments: json!({
                "calendarId": "primary",
                "timeMin": iso_timestamp(&window.time_min),
                "timeMax": iso_timestamp(&window.time_max),
                "singleEvents": true,
                "orderBy": "startTime",
            }),
        };

        self.accounts.execute_tool(EVENTS_LIST_TOOL, execution).await
    }

    /// Summary of the user's recent past meetings.
    ///
    /// The fetch reaches back the full lookback so long lookbacks can
    /// actually surface older meetings.
    pub async fn generate_meeting_summary(
        &self,
        user_id: &str,
        options: SummaryOptions,
    ) -> AppResult<SummaryResponse> {
        let now = Utc::now();
        let window = FetchWindow::lookback(
            now,
            options.lookback_days,
            self.settings.event_window_days,
        );

        let payload = self.get_events_in_window(user_id, window).await?;
        Ok(summarize_events(&payload, &options, now))
    }
}

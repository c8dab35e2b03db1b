//! Calendar domain: linked accounts, event access and meeting summaries.

pub mod ai_summary;
pub mod calendar;
pub mod connected_accounts;
pub mod summary;

pub use ai_summary::MeetingSummarizer;
pub use calendar::CalendarService;
pub use connected_accounts::{ComposioClient, ConnectedAccounts};

mod support;

use chrono::Utc;
use katalyst::components::calendar::CalendarService;
use katalyst::components::connected_accounts::{ComposioClient, ConnectedAccounts, ToolExecution};
use katalyst::components::summary::SummaryOptions;
use katalyst::config::SummarySettings;
use katalyst::error::Error;
use serde_json::json;
use std::sync::Arc;
use support::{event_at, AUTH_CONFIG_ID, USER_ID};
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

fn client(server: &MockServer) -> ComposioClient {
    ComposioClient::new(reqwest::Client::new(), &server.uri(), API_KEY)
}

async fn mount_accounts(server: &MockServer) {
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/api/v3/connected_accounts"))
        .and(matchers::query_param("user_ids", USER_ID))
        .and(matchers::header("x-api-key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "id": "ca_gmail", "status": "ACTIVE", "auth_config": { "id": "ac_gmail" } },
                { "id": "ca_1", "status": "ACTIVE", "auth_config": { "id": AUTH_CONFIG_ID } }
            ],
            "next_cursor": null,
            "total_pages": 1
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_list_accounts() {
    let server = MockServer::start().await;
    mount_accounts(&server).await;

    let accounts = client(&server).list_accounts(USER_ID).await.unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[1].id, "ca_1");
    assert_eq!(accounts[1].auth_config.id, AUTH_CONFIG_ID);
}

#[tokio::test]
async fn test_initiate_connection() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/api/v3/connected_accounts"))
        .and(matchers::body_partial_json(json!({
            "auth_config": { "id": AUTH_CONFIG_ID },
            "connection": { "user_id": USER_ID }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "req_9",
            "status": "INITIATED",
            "redirect_url": "https://connect.example.com/req_9"
        })))
        .mount(&server)
        .await;

    let request = client(&server).initiate(USER_ID, AUTH_CONFIG_ID).await.unwrap();
    assert_eq!(request.id, "req_9");
    assert_eq!(request.redirect_url.as_deref(), Some("https://connect.example.com/req_9"));
}

#[tokio::test]
async fn test_execute_tool_returns_data() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/api/v3/tools/execute/GOOGLECALENDAR_EVENTS_LIST"))
        .and(matchers::body_partial_json(json!({
            "user_id": USER_ID,
            "connected_account_id": "ca_1",
            "arguments": { "calendarId": "primary" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "items": [{ "summary": "Standup" }] },
            "error": null,
            "successful": true
        })))
        .mount(&server)
        .await;

    let execution = ToolExecution {
        user_id: USER_ID.to_string(),
        connected_account_id: "ca_1".to_string(),
        arguments: json!({ "calendarId": "primary" }),
    };
    let data = client(&server)
        .execute_tool("GOOGLECALENDAR_EVENTS_LIST", execution)
        .await
        .unwrap();
    assert_eq!(data, json!({ "items": [{ "summary": "Standup" }] }));
}

#[tokio::test]
async fn test_unsuccessful_execution_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/api/v3/tools/execute/GOOGLECALENDAR_EVENTS_LIST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {},
            "error": "Calendar API quota exceeded",
            "successful": false
        })))
        .mount(&server)
        .await;

    let execution = ToolExecution {
        user_id: USER_ID.to_string(),
        connected_account_id: "ca_1".to_string(),
        arguments: json!({}),
    };
    match client(&server).execute_tool("GOOGLECALENDAR_EVENTS_LIST", execution).await {
        Err(Error::Upstream(message)) => assert!(message.contains("Calendar API quota exceeded")),
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/api/v3/connected_accounts"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    match client(&server).list_accounts(USER_ID).await {
        Err(Error::Upstream(message)) => {
            assert!(message.contains("401"));
            assert!(message.contains("invalid api key"));
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_summary_over_http() {
    let server = MockServer::start().await;
    mount_accounts(&server).await;

    let now = Utc::now();
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/api/v3/tools/execute/GOOGLECALENDAR_EVENTS_LIST"))
        .and(matchers::body_partial_json(json!({ "connected_account_id": "ca_1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "items": [event_at(now, 26, "Retro"), event_at(now, 2, "Planning")] },
            "successful": true
        })))
        .mount(&server)
        .await;

    let accounts: Arc<dyn ConnectedAccounts> = Arc::new(client(&server));
    let calendar = CalendarService::new(accounts, AUTH_CONFIG_ID, SummarySettings::default());

    let response = calendar
        .generate_meeting_summary(USER_ID, SummaryOptions::default())
        .await
        .unwrap();

    let titles: Vec<&str> = response
        .summary
        .meetings
        .iter()
        .map(|m| m.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Planning", "Retro"]);
    assert!(response.summary.insights[0].starts_with("Captured 2 meetings from "));
}

//! Integration tests for the API client against a mock Fitbit server.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use fitbitcli::errors::FitbitError;
use fitbitcli::fitbit::{BrowserPresenter, FitbitApi, FragmentMatch};
use fitbitcli::management::{AuthEvent, CredentialStore, MemoryCredentialStore};
use fitbitcli::types::{ClientConfig, Credentials, Endpoints, FoodItem, MealType, Scope};
use fitbitcli::utils::{format_date, today};
use serde_json::json;
use url::Url;
use wiremock::matchers::{any, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REDIRECT: &str = "http://127.0.0.1:8080/callback#access_token=ABC123&user_id=42&token_type=Bearer";

fn create_test_config() -> ClientConfig {
    ClientConfig::new(
        "22ABCD",
        "http://127.0.0.1:8080/callback",
        [Scope::Nutrition, Scope::Activity],
    )
}

fn create_api(server: &MockServer, store: MemoryCredentialStore) -> FitbitApi<MemoryCredentialStore> {
    let base = Url::parse(&server.uri()).unwrap();
    FitbitApi::new(create_test_config(), store).with_endpoints(Endpoints::single(base))
}

fn record_events(api: &FitbitApi<MemoryCredentialStore>) -> Arc<Mutex<Vec<AuthEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    api.subscribe(move |event: AuthEvent| sink.lock().unwrap().push(event));
    events
}

fn fixed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 7, 29).unwrap()
}

#[derive(Default)]
struct RecordingBrowser {
    opened: Mutex<Vec<String>>,
}

impl BrowserPresenter for RecordingBrowser {
    fn present(&self, url: &Url) -> std::io::Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

struct BrokenBrowser;

impl BrowserPresenter for BrokenBrowser {
    fn present(&self, _url: &Url) -> std::io::Result<()> {
        Err(std::io::Error::other("no browser"))
    }
}

#[tokio::test]
async fn test_login_presents_authorize_url_without_logging_in() {
    let server = MockServer::start().await;
    let api = create_api(&server, MemoryCredentialStore::new());
    let events = record_events(&api);
    let browser = RecordingBrowser::default();

    let url = api.login(&browser).unwrap();

    assert_eq!(browser.opened.lock().unwrap().as_slice(), [url.to_string()]);
    assert!(url.path().ends_with("/oauth2/authorize"));
    assert!(!api.is_logged_in());
    assert!(events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_login_survives_missing_browser() {
    let server = MockServer::start().await;
    let api = create_api(&server, MemoryCredentialStore::new());

    assert!(api.login(&BrokenBrowser).is_ok());
}

#[tokio::test]
async fn test_handle_redirect_logs_in() {
    let server = MockServer::start().await;
    let api = create_api(&server, MemoryCredentialStore::new());
    let events = record_events(&api);

    assert!(!api.is_logged_in());

    let grant = api.handle_redirect(REDIRECT).await.unwrap();
    assert_eq!(grant.access_token, "ABC123");
    assert_eq!(grant.user_id, "42");

    assert!(api.is_logged_in());
    assert_eq!(api.store().credentials(), Credentials::new("ABC123", "42"));
    assert_eq!(events.lock().unwrap().as_slice(), [AuthEvent::LoggedIn]);
}

#[tokio::test]
async fn test_incomplete_redirect_changes_nothing() {
    let server = MockServer::start().await;
    let store = MemoryCredentialStore::with_credentials(Credentials::new("OLD", "7"));
    let api = create_api(&server, store);
    let events = record_events(&api);

    let result = api
        .handle_redirect("http://127.0.0.1:8080/callback#access_token=NEW")
        .await;

    assert!(matches!(result, Err(FitbitError::IncompleteRedirect)));
    assert_eq!(api.store().credentials(), Credentials::new("OLD", "7"));
    assert!(events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_redirect_to_other_url_is_rejected() {
    let server = MockServer::start().await;
    let store = MemoryCredentialStore::with_credentials(Credentials::new("OLD", "7"));
    let api = create_api(&server, store);
    let events = record_events(&api);

    for redirect in [
        "http://evil.example/callback#access_token=EVIL&user_id=666",
        "http://127.0.0.1:8080/callbackevil#access_token=EVIL&user_id=666",
        "http://127.0.0.1:8080/callback.evil.example#access_token=EVIL&user_id=666",
    ] {
        let result = api.handle_redirect(redirect).await;
        assert!(matches!(result, Err(FitbitError::UnexpectedRedirect)), "{redirect}");
    }

    assert_eq!(api.store().credentials(), Credentials::new("OLD", "7"));
    assert!(events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_state_parameter_shadows_user_id_by_default() {
    let server = MockServer::start().await;
    let redirect = "http://127.0.0.1:8080/callback#state=my_user_id&access_token=A&user_id=42";

    let api = create_api(&server, MemoryCredentialStore::new());
    api.handle_redirect(redirect).await.unwrap();
    assert_eq!(api.store().user_id().as_deref(), Some("my_user_id"));

    let exact = create_api(&server, MemoryCredentialStore::new())
        .with_fragment_match(FragmentMatch::Exact);
    let grant = exact.handle_redirect(redirect).await.unwrap();
    assert_eq!(grant.user_id, "42");
    assert_eq!(exact.store().credentials(), Credentials::new("A", "42"));
}

#[tokio::test]
async fn test_logout_clears_state_and_is_idempotent() {
    let server = MockServer::start().await;
    let api = create_api(&server, MemoryCredentialStore::new());
    let events = record_events(&api);

    api.handle_redirect(REDIRECT).await.unwrap();
    api.logout().await.unwrap();

    assert!(!api.is_logged_in());
    assert_eq!(api.store().credentials(), Credentials::default());

    // A second logout succeeds and still notifies
    api.logout().await.unwrap();
    assert!(!api.is_logged_in());
    assert_eq!(
        events.lock().unwrap().as_slice(),
        [AuthEvent::LoggedIn, AuthEvent::LoggedOut, AuthEvent::LoggedOut]
    );
}

#[tokio::test]
async fn test_calls_without_session_fail_without_requests() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let api = create_api(&server, MemoryCredentialStore::new());
    let food = FoodItem::custom("Apple", 95, MealType::Lunch, 304, 1.0, fixed_date());

    assert!(matches!(api.get_food_logs().await, Err(FitbitError::NotLoggedIn)));
    assert!(matches!(api.get_daily_activity().await, Err(FitbitError::NotLoggedIn)));
    assert!(matches!(api.post_food_log(&food).await, Err(FitbitError::NotLoggedIn)));
}

#[tokio::test]
async fn test_stored_token_needs_restore() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/1/user/42/activities/date/{}.json", format_date(today()))))
        .and(header("authorization", "Bearer STORED"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "summary": { "steps": 1 } })))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryCredentialStore::with_credentials(Credentials::new("STORED", "42"));
    let api = create_api(&server, store);

    // Stored credentials count as logged in, but no session exists yet
    assert!(api.is_logged_in());
    assert!(matches!(api.get_daily_activity().await, Err(FitbitError::NotLoggedIn)));

    assert!(api.restore_session().await.unwrap());
    let activity = api.get_daily_activity().await.unwrap();
    assert_eq!(activity["summary"]["steps"], 1);
}

#[tokio::test]
async fn test_restore_session_without_token() {
    let server = MockServer::start().await;
    let api = create_api(&server, MemoryCredentialStore::new());

    assert!(!api.restore_session().await.unwrap());
}

#[tokio::test]
async fn test_token_without_user_id_is_not_logged_in() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = MemoryCredentialStore::with_credentials(Credentials {
        access_token: Some("T".to_string()),
        user_id: None,
    });
    let api = create_api(&server, store);
    let food = FoodItem::custom("Apple", 95, MealType::Lunch, 304, 1.0, fixed_date());

    assert!(!api.restore_session().await.unwrap());
    assert!(!api.is_logged_in());
    assert!(matches!(api.get_food_logs().await, Err(FitbitError::NotLoggedIn)));
    assert!(matches!(api.get_daily_activity().await, Err(FitbitError::NotLoggedIn)));
    assert!(matches!(api.post_food_log(&food).await, Err(FitbitError::NotLoggedIn)));
}

#[tokio::test]
async fn test_get_food_logs_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/user/42/foods/log/date/2017-07-29.json"))
        .and(header("authorization", "Bearer ABC123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "foods": [],
            "summary": { "calories": 0 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = create_api(&server, MemoryCredentialStore::new());
    api.handle_redirect(REDIRECT).await.unwrap();

    let logs = api.get_food_logs_on(fixed_date()).await.unwrap();
    assert!(logs.contains_key("foods"));
    assert_eq!(logs["summary"]["calories"], 0);
}

#[tokio::test]
async fn test_get_daily_activity_for_date() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/user/42/activities/date/2017-07-29.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "goals": { "steps": 10000 } })))
        .expect(1)
        .mount(&server)
        .await;

    let api = create_api(&server, MemoryCredentialStore::new());
    api.handle_redirect(REDIRECT).await.unwrap();

    let activity = api.get_daily_activity_on(fixed_date()).await.unwrap();
    assert_eq!(activity["goals"]["steps"], 10000);
}

#[tokio::test]
async fn test_post_custom_food_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1/user/-/foods/log.json"))
        .and(header("authorization", "Bearer ABC123"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "foodLog": { "logId": 1 } })))
        .expect(1)
        .mount(&server)
        .await;

    let api = create_api(&server, MemoryCredentialStore::new());
    api.handle_redirect(REDIRECT).await.unwrap();

    let food = FoodItem::custom("Apple Pie", 300, MealType::Dinner, 147, 1.5, fixed_date());
    let response = api.post_food_log(&food).await.unwrap();
    assert_eq!(response["foodLog"]["logId"], 1);

    let requests = server.received_requests().await.unwrap();
    let fields: Vec<(String, String)> = url::form_urlencoded::parse(&requests[0].body)
        .into_owned()
        .collect();
    let names: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();

    assert!(!names.contains(&"foodId"));
    assert!(fields.contains(&("foodName".to_string(), "Apple Pie".to_string())));
    assert!(fields.contains(&("calories".to_string(), "300".to_string())));
    assert!(fields.contains(&("date".to_string(), "2017-07-29".to_string())));
}

#[tokio::test]
async fn test_empty_body_is_no_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let api = create_api(&server, MemoryCredentialStore::new());
    api.handle_redirect(REDIRECT).await.unwrap();

    assert!(matches!(
        api.get_food_logs_on(fixed_date()).await,
        Err(FitbitError::NoData)
    ));
}

#[tokio::test]
async fn test_whitespace_body_is_unable_to_parse() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("  "))
        .mount(&server)
        .await;

    let api = create_api(&server, MemoryCredentialStore::new());
    api.handle_redirect(REDIRECT).await.unwrap();

    assert!(matches!(
        api.get_food_logs_on(fixed_date()).await,
        Err(FitbitError::UnableToParse)
    ));
}

#[tokio::test]
async fn test_non_object_body_is_unable_to_parse() {
    let server = MockServer::start().await;
    Mock::given(path("/1/user/42/foods/log/date/2017-07-29.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    Mock::given(path("/1/user/42/activities/date/2017-07-29.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .mount(&server)
        .await;

    let api = create_api(&server, MemoryCredentialStore::new());
    api.handle_redirect(REDIRECT).await.unwrap();

    assert!(matches!(
        api.get_food_logs_on(fixed_date()).await,
        Err(FitbitError::UnableToParse)
    ));
    assert!(matches!(
        api.get_daily_activity_on(fixed_date()).await,
        Err(FitbitError::UnableToParse)
    ));
}

#[tokio::test]
async fn test_error_status_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{ "errorType": "expired_token" }]
        })))
        .mount(&server)
        .await;

    let api = create_api(&server, MemoryCredentialStore::new());
    api.handle_redirect(REDIRECT).await.unwrap();

    let err = api.get_food_logs_on(fixed_date()).await.unwrap_err();
    match &err {
        FitbitError::Transport(e) => assert_eq!(e.status().map(|s| s.as_u16()), Some(401)),
        other => panic!("expected transport error, got {other:?}"),
    }
    assert!(err.needs_login());
}

#[tokio::test]
async fn test_new_redirect_rebuilds_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer SECOND"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let api = create_api(&server, MemoryCredentialStore::new());
    api.handle_redirect(REDIRECT).await.unwrap();
    api.handle_redirect("http://127.0.0.1:8080/callback#access_token=SECOND&user_id=43")
        .await
        .unwrap();

    let logs = api.get_food_logs_on(fixed_date()).await.unwrap();
    assert_eq!(logs["ok"], true);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].url.path(),
        "/1/user/43/foods/log/date/2017-07-29.json"
    );
}

#[tokio::test]
async fn test_changed_stored_token_is_not_reused() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer ROTATED"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let api = create_api(&server, MemoryCredentialStore::new());
    api.handle_redirect(REDIRECT).await.unwrap();

    // Token replaced behind the client's back
    api.store().set("ROTATED", "42").unwrap();

    assert!(api.get_food_logs_on(fixed_date()).await.is_ok());
}

#[tokio::test]
async fn test_cleared_store_drops_session() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let api = create_api(&server, MemoryCredentialStore::new());
    api.handle_redirect(REDIRECT).await.unwrap();
    api.store().clear().unwrap();

    assert!(matches!(
        api.get_food_logs_on(fixed_date()).await,
        Err(FitbitError::NotLoggedIn)
    ));
}

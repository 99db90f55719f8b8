mod common;

use common::{Call, FakeBrowser, FakeElement, LOGIN_URL, connected, test_config};
use portico_engine::backend::Backend;
use portico_engine::workflow::{Verdict, Verifier};

async fn on_page(browser: FakeBrowser, url: &str) -> FakeBrowser {
    let mut browser = connected(browser).await;
    browser.navigate(url).await.unwrap();
    browser.calls.clear();
    browser
}

#[tokio::test]
async fn error_indicator_wins_over_success_indicator() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut browser = on_page(
        FakeBrowser::new()
            .with(".dashboard", FakeElement::visible())
            .with(".alert-danger", FakeElement::with_text("Invalid password")),
        "http://localhost:8193/x_mgr/start/index.html#/dashboard",
    )
    .await;

    let result = Verifier::new(&config).verify(&mut browser).await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Invalid password"));
    assert_eq!(
        result.verdict,
        Verdict::ErrorIndicator {
            selector: ".alert-danger".into()
        }
    );
    // Success tier is never consulted once an error is seen.
    assert_eq!(browser.count(|c| matches!(c, Call::WaitForSelector(_))), 0);
}

#[tokio::test]
async fn blank_error_text_still_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut browser = on_page(
        FakeBrowser::new().with(".login-error", FakeElement::with_text("   ")),
        LOGIN_URL,
    )
    .await;

    let result = Verifier::new(&config).verify(&mut browser).await;

    assert!(!result.success);
    assert_eq!(
        result.error.as_deref(),
        Some("Login error indicator present: .login-error")
    );
}

#[tokio::test]
async fn first_confirmed_success_indicator_wins() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut browser = on_page(
        FakeBrowser::new()
            .with(".user-info", FakeElement::visible())
            .with("[data-role=\"main\"]", FakeElement::visible()),
        LOGIN_URL,
    )
    .await;

    let result = Verifier::new(&config).verify(&mut browser).await;

    assert!(result.success);
    assert_eq!(result.error, None);
    assert_eq!(
        result.verdict,
        Verdict::SuccessIndicator {
            selector: ".user-info".into()
        }
    );
    assert_eq!(browser.count(|c| *c == Call::CurrentUrl), 0);
}

#[tokio::test]
async fn changed_location_counts_as_success() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut browser = on_page(FakeBrowser::new(), "http://localhost:8193/x_mgr/start/index.html#/home").await;

    let result = Verifier::new(&config).verify(&mut browser).await;

    assert!(result.success);
    assert_eq!(
        result.verdict,
        Verdict::LocationChanged {
            from: LOGIN_URL.into(),
            to: "http://localhost:8193/x_mgr/start/index.html#/home".into(),
        }
    );
}

#[tokio::test]
async fn unchanged_location_is_ambiguous() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut browser = on_page(FakeBrowser::new(), LOGIN_URL).await;

    let result = Verifier::new(&config).verify(&mut browser).await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Unable to verify login success"));
    assert_eq!(result.verdict, Verdict::Ambiguous);
}

#[tokio::test]
async fn backend_failure_while_scanning_errors_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut browser = on_page(FakeBrowser::new(), LOGIN_URL).await;
    browser.erroring.insert(".error-message".to_string());

    let result = Verifier::new(&config).verify(&mut browser).await;

    assert!(!result.success);
    assert_eq!(result.verdict, Verdict::VerificationError);
    assert!(
        result
            .error
            .as_deref()
            .unwrap_or_default()
            .contains("bad selector .error-message")
    );
}

#[tokio::test]
async fn normalized_form_of_target_is_not_a_location_change() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.target_url = "http://localhost:8193".to_string();
    let mut browser = on_page(FakeBrowser::new(), "http://localhost:8193/").await;

    let result = Verifier::new(&config).verify(&mut browser).await;

    assert!(!result.success);
    assert_eq!(result.verdict, Verdict::Ambiguous);
    assert_eq!(result.error.as_deref(), Some("Unable to verify login success"));
}

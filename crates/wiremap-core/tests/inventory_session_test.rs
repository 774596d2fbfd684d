#![allow(clippy::unwrap_used)]
// Integration tests for the `Inventory` facade using wiremock: session
// flag transitions and form submission through the mutation seams.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wiremap_api::{InventoryClient, TransportConfig};
use wiremap_core::{
    CoreError, FloorForm, FloorSubmission, Inventory, SessionQuery, SwitchForm, SwitchSubmission,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Inventory) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = InventoryClient::new(base_url, &TransportConfig::default()).unwrap();
    (server, Inventory::new(client))
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

async fn login(server: &MockServer, inventory: &Inventory) {
    mount_login(server).await;
    let secret: secrecy::SecretString = "test-password".to_string().into();
    inventory.login("admin", &secret).await.unwrap();
}

fn switch_submission() -> SwitchSubmission {
    SwitchSubmission {
        name: "sw-b1-3-01".into(),
        ip_resolve_method: wiremap_core::IpResolveMethod::Dns,
        ip: "10.20.3.1".into(),
        mac: "aa:bb:cc:dd:ee:ff".into(),
        up_switch_name: "sw-core".into(),
        up_link: "Gi0/24".into(),
        snmp_community: "public".into(),
        revision: "12.2(55)SE".into(),
        serial: "FOC1234X0YZ".into(),
        build_short_name: Some("B1".into()),
        floor_number: Some(3),
        retrieve_from_net_data: true,
        retrieve_up_link_from_seens: true,
        retrieve_tech_data_from_snmp: true,
    }
}

// ── Session flag transitions ────────────────────────────────────────

#[tokio::test]
async fn test_login_establishes_the_session() {
    let (server, inventory) = setup().await;
    assert!(!inventory.session().is_authenticated());

    login(&server, &inventory).await;
    assert!(inventory.session().is_authenticated());
}

#[tokio::test]
async fn test_failed_login_leaves_the_session_unauthenticated() {
    let (server, inventory) = setup().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(403).set_body_string("denied"))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = inventory.login("admin", &secret).await;

    assert!(matches!(
        result,
        Err(CoreError::AuthenticationFailed { .. })
    ));
    assert!(!inventory.session().is_authenticated());
}

#[tokio::test]
async fn test_expired_session_is_observed_on_data_calls() {
    let (server, inventory) = setup().await;
    login(&server, &inventory).await;

    Mock::given(method("GET"))
        .and(path("/build"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = inventory.builds().await;
    assert!(matches!(result, Err(CoreError::SessionExpired)));
    assert!(!inventory.session().is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_the_session_even_when_the_call_fails() {
    let (server, inventory) = setup().await;
    login(&server, &inventory).await;

    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = inventory.logout().await;
    assert!(result.is_err());
    assert!(!inventory.session().is_authenticated());
}

// ── Submission through the mutation seams ───────────────────────────

#[tokio::test]
async fn test_switch_form_submits_through_the_facade() {
    let (server, inventory) = setup().await;
    login(&server, &inventory).await;

    Mock::given(method("POST"))
        .and(path("/switch"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut form = SwitchForm::new();
    form.open_add(Some("B1"), Some(3));
    form.submit(&inventory, switch_submission()).await.unwrap();

    assert!(!form.is_open());
}

#[tokio::test]
async fn test_floor_form_failure_surfaces_the_service_message() {
    let (server, inventory) = setup().await;
    login(&server, &inventory).await;

    Mock::given(method("POST"))
        .and(path("/floor"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "duplicate"})))
        .mount(&server)
        .await;

    let mut form = FloorForm::new();
    form.open();

    let result = form
        .submit(
            &inventory,
            FloorSubmission {
                number: 3,
                build_name: "Building One".into(),
                build_addr: "1 Example Way".into(),
            },
        )
        .await;

    assert!(matches!(
        result,
        Err(CoreError::Api {
            status: Some(500),
            ..
        })
    ));
    assert!(form.is_open());
}

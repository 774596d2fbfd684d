#![allow(clippy::unwrap_used)]
// Integration tests for `InventoryClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wiremap_api::types::{FloorPayload, IpResolveMethod, SwitchPayload, SwitchScope};
use wiremap_api::{Error, InventoryClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, InventoryClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = InventoryClient::new(base_url, &TransportConfig::default()).unwrap();
    (server, client)
}

fn sample_payload() -> SwitchPayload {
    SwitchPayload {
        name: "sw-b1-3-01".into(),
        ip_resolve_method: IpResolveMethod::Dns,
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
        position_top: None,
        position_left: None,
    }
}

// ── Session tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({
            "username": "admin",
            "password": "test-password",
        })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "test-password".to_string().into();
    client.login("admin", &secret).await.unwrap();
}

#[tokio::test]
async fn test_login_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong-password".to_string().into();
    let result = client.login("admin", &secret).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_logout() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client.logout().await.unwrap();
}

// ── Building & floor tests ──────────────────────────────────────────

#[tokio::test]
async fn test_list_builds() {
    let (server, client) = setup().await;

    let body = json!([
        { "shortName": "B1", "name": "Building One", "addr": "Main st 1" },
        { "shortName": "B2", "name": "Building Two", "addr": "Main st 2" },
    ]);

    Mock::given(method("GET"))
        .and(path("/build"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let builds = client.builds().await.unwrap();

    assert_eq!(builds.len(), 2);
    assert_eq!(builds[0].short_name, "B1");
    assert_eq!(builds[0].name, "Building One");
    assert_eq!(builds[1].addr, "Main st 2");
}

#[tokio::test]
async fn test_list_floors_of_build() {
    let (server, client) = setup().await;

    let body = json!([
        { "number": 1, "buildName": "B1", "buildAddr": "Main st 1" },
        { "number": 3, "buildName": "B1", "buildAddr": "Main st 1" },
    ]);

    Mock::given(method("GET"))
        .and(path("/build/B1/floors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let floors = client.floors_of("B1").await.unwrap();

    assert_eq!(floors.len(), 2);
    assert_eq!(floors[0].number, 1);
    assert_eq!(floors[1].number, 3);
    assert_eq!(floors[1].build_name, "B1");
}

#[tokio::test]
async fn test_create_floor_posts_wire_shape() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/floor"))
        .and(body_json(json!({
            "number": 3,
            "buildName": "B1",
            "buildAddr": "Main st 1",
        })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let payload = FloorPayload {
        number: 3,
        build_name: "B1".into(),
        build_addr: "Main st 1".into(),
    };
    client.create_floor(&payload).await.unwrap();
}

#[tokio::test]
async fn test_delete_floor_path() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/build/B1/3"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client.delete_floor("B1", 3).await.unwrap();
}

// ── Switch tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_switch_omits_absent_position() {
    let (server, client) = setup().await;

    // Exact body match: no positionTop/positionLeft keys on create.
    Mock::given(method("POST"))
        .and(path("/switch"))
        .and(body_json(json!({
            "name": "sw-b1-3-01",
            "ipResolveMethod": "DNS",
            "ip": "10.20.3.1",
            "mac": "aa:bb:cc:dd:ee:ff",
            "upSwitchName": "sw-core",
            "upLink": "Gi0/24",
            "snmpCommunity": "public",
            "revision": "12.2(55)SE",
            "serial": "FOC1234X0YZ",
            "buildShortName": "B1",
            "floorNumber": 3,
            "retrieveFromNetData": true,
            "retrieveUpLinkFromSeens": true,
            "retrieveTechDataFromSNMP": true,
        })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client.create_switch(&sample_payload()).await.unwrap();
}

#[tokio::test]
async fn test_update_switch_carries_position() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/switch/sw-b1-3-01"))
        .and(body_json(json!({
            "name": "sw-b1-3-01",
            "ipResolveMethod": "Direct",
            "ip": "10.20.3.1",
            "mac": "aa:bb:cc:dd:ee:ff",
            "upSwitchName": "sw-core",
            "upLink": "Gi0/24",
            "snmpCommunity": "public",
            "revision": "12.2(55)SE",
            "serial": "FOC1234X0YZ",
            "buildShortName": "B1",
            "floorNumber": 3,
            "retrieveFromNetData": false,
            "retrieveUpLinkFromSeens": false,
            "retrieveTechDataFromSNMP": false,
            "positionTop": 120.5,
            "positionLeft": 340.25,
        })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let payload = SwitchPayload {
        ip_resolve_method: IpResolveMethod::Direct,
        retrieve_from_net_data: false,
        retrieve_up_link_from_seens: false,
        retrieve_tech_data_from_snmp: false,
        position_top: Some(120.5),
        position_left: Some(340.25),
        ..sample_payload()
    };
    client.update_switch(&payload).await.unwrap();
}

#[tokio::test]
async fn test_scoped_switch_listing() {
    let (server, client) = setup().await;

    let body = json!([{
        "name": "sw-b1-3-01",
        "ipResolveMethod": "Direct",
        "ip": "10.20.3.1",
        "mac": "aa:bb:cc:dd:ee:ff",
        "upSwitchName": "sw-core",
        "upLink": "Gi0/24",
        "snmpCommunity": "public",
        "revision": "12.2(55)SE",
        "serial": "FOC1234X0YZ",
        "buildShortName": "B1",
        "floorNumber": 3,
        "retrieveFromNetData": false,
        "retrieveUpLinkFromSeens": false,
        "retrieveTechDataFromSNMP": false,
        "positionTop": 120.5,
        "positionLeft": 340.25,
    }]);

    Mock::given(method("GET"))
        .and(path("/switch"))
        .and(query_param("build", "B1"))
        .and(query_param("floor", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let scope = SwitchScope::Floor {
        build: "B1".into(),
        floor: 3,
    };
    let switches = client.switches(&scope).await.unwrap();

    assert_eq!(switches.len(), 1);
    assert_eq!(switches[0].name, "sw-b1-3-01");
    assert_eq!(switches[0].ip_resolve_method, IpResolveMethod::Direct);
    assert_eq!(switches[0].position_top, Some(120.5));
    assert_eq!(switches[0].floor_number, Some(3));
}

#[tokio::test]
async fn test_delete_switch_path() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/switch/sw-b1-3-01"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client.delete_switch("sw-b1-3-01").await.unwrap();
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_expired_session_on_data_call() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.builds().await;

    match result {
        Err(ref e @ Error::SessionExpired) => assert!(e.is_auth_expired()),
        other => panic!("expected SessionExpired, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_api_error_carries_status_and_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/build"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client.builds().await;

    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("boom"), "unexpected message: {message}");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_not_found_is_recognized() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/switch/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = client.delete_switch("missing").await;

    match result {
        Err(ref e @ Error::Api { status: 404, .. }) => assert!(e.is_not_found()),
        other => panic!("expected 404 Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_decode_error_keeps_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/build"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.builds().await;

    match result {
        Err(Error::Deserialization { ref message, ref body }) => {
            assert!(message.contains("not json"), "unexpected message: {message}");
            assert_eq!(body, "not json");
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

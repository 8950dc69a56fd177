mod common;

use std::time::Duration;

use serde_json::json;
use vayu_tui::{
    data::geocode::GeocodeClient,
    data::locate::{CliFix, DeviceStrategy, IpStrategy, LocateStrategy, LocationResolver},
    domain::aqi::LocationTier,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn unreachable_geocoder() -> GeocodeClient {
    GeocodeClient::new("http://127.0.0.1:9", "test-key")
}

#[tokio::test]
async fn exhausted_chain_falls_back_to_the_default_location() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let resolver = LocationResolver::new(vec![
        Box::new(
            DeviceStrategy::new(Box::new(CliFix(None)), unreachable_geocoder())
                .with_wait(Duration::from_millis(100)),
        ),
        Box::new(IpStrategy::with_endpoints(vec![
            format!("{}/a", server.uri()),
            format!("{}/b", server.uri()),
        ])),
    ]);
    let resolved = resolver.resolve().await;

    assert_eq!(resolved.tier, LocationTier::Default);
    assert_eq!(resolved.location.city.as_deref(), Some("Jabalpur"));
    assert!((resolved.location.latitude - 23.1815).abs() < 1e-9);
    assert!((resolved.location.longitude - 79.9864).abs() < 1e-9);
}

#[tokio::test]
async fn second_ip_endpoint_answers_after_first_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let body = json!({
        "latitude": 19.076,
        "longitude": 72.8777,
        "city": "Mumbai",
        "region": "Maharashtra",
        "country_name": "India"
    });
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let strategy = IpStrategy::with_endpoints(vec![
        format!("{}/a", server.uri()),
        format!("{}/b", server.uri()),
    ]);
    let resolved = strategy.attempt().await.expect("network fix");

    assert_eq!(resolved.tier, LocationTier::Network);
    assert_eq!(resolved.location.city.as_deref(), Some("Mumbai"));
    assert_eq!(resolved.location.state.as_deref(), Some("Maharashtra"));
}

#[tokio::test]
async fn device_fix_outranks_working_ip_lookup() {
    let server = MockServer::start().await;
    let reverse_body = json!([
        { "name": "Bhopal", "lat": 23.2599, "lon": 77.4126,
          "state": "Madhya Pradesh", "country": "India" }
    ]);
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reverse_body))
        .mount(&server)
        .await;
    let ip_body = json!({ "latitude": 19.076, "longitude": 72.8777, "city": "Mumbai" });
    Mock::given(method("GET"))
        .and(path("/ip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ip_body))
        .mount(&server)
        .await;

    let resolver = LocationResolver::new(vec![
        Box::new(DeviceStrategy::new(
            Box::new(CliFix(Some((23.2599, 77.4126)))),
            GeocodeClient::new(server.uri(), "test-key"),
        )),
        Box::new(IpStrategy::with_endpoints(vec![format!(
            "{}/ip",
            server.uri()
        )])),
    ]);
    let resolved = resolver.resolve().await;

    assert_eq!(resolved.tier, LocationTier::Precise);
    assert_eq!(resolved.location.city.as_deref(), Some("Bhopal"));
    assert_eq!(resolved.location.state.as_deref(), Some("Madhya Pradesh"));
}

#[tokio::test]
async fn device_fix_without_reverse_geocode_still_counts_as_precise() {
    let strategy = DeviceStrategy::new(
        Box::new(CliFix(Some((23.1815, 79.9864)))),
        unreachable_geocoder(),
    );
    let resolved = strategy.attempt().await.expect("device fix");

    assert_eq!(resolved.tier, LocationTier::Precise);
    assert!(resolved.location.city.is_none());
    assert_eq!(resolved.location.display_name(), "23.1815, 79.9864");
}

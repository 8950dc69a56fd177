mod common;

use chrono::{Duration, Local};
use common::jabalpur;
use serde_json::json;
use vayu_tui::{
    data::air_quality::{AirQualityFetcher, OpenWeatherAirProvider, WaqiProvider},
    data::forecast::ForecastFetcher,
    domain::aqi::ReadingSource,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, path_regex, query_param},
};

#[tokio::test]
async fn primary_provider_reading_is_used_when_available() {
    let server = MockServer::start().await;

    let body = json!({
        "status": "ok",
        "data": {
            "aqi": 92,
            "city": { "name": "Jabalpur, Madhya Pradesh" },
            "iaqi": {
                "pm25": { "v": 31.0 },
                "pm10": { "v": 48.0 },
                "o3": { "v": 22.3 }
            }
        }
    });
    Mock::given(method("GET"))
        .and(path_regex("^/feed/geo:"))
        .and(query_param("token", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let fetcher =
        AirQualityFetcher::new(vec![Box::new(WaqiProvider::new(server.uri(), "test-token"))]);
    let reading = fetcher.fetch_current(&jabalpur()).await;

    assert_eq!(reading.source, ReadingSource::Waqi);
    assert_eq!(reading.aqi, 92);
    assert_eq!(reading.city, "Jabalpur");
    assert_eq!(reading.pollutants.pm2_5, 31.0);
}

#[tokio::test]
async fn secondary_provider_derives_aqi_from_pm25_when_primary_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex("^/feed/geo:"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let body = json!({
        "list": [{ "components": { "pm2_5": 40.0, "pm10": 58.0, "no2": 9.4 } }]
    });
    Mock::given(method("GET"))
        .and(path("/ow/air_pollution"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let fetcher = AirQualityFetcher::new(vec![
        Box::new(WaqiProvider::new(server.uri(), "test-token")),
        Box::new(OpenWeatherAirProvider::new(
            format!("{}/ow", server.uri()),
            "test-key",
        )),
    ]);
    let reading = fetcher.fetch_current(&jabalpur()).await;

    assert_eq!(reading.source, ReadingSource::OpenWeather);
    // floor(100 + (40 - 35.4) * (100 / 20))
    assert_eq!(reading.aqi, 123);
    assert_eq!(reading.city, "Jabalpur");
}

#[tokio::test]
async fn total_provider_miss_yields_the_sample_reading() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let fetcher = AirQualityFetcher::new(vec![
        Box::new(WaqiProvider::new(server.uri(), "test-token")),
        Box::new(OpenWeatherAirProvider::new(server.uri(), "test-key")),
    ]);
    let reading = fetcher.fetch_current(&jabalpur()).await;

    assert_eq!(reading.source, ReadingSource::Sample);
    assert_eq!(reading.aqi, 67);
    assert_eq!(reading.pollutants.pm2_5, 18.4);
    assert_eq!(reading.location_label, "Jabalpur, Madhya Pradesh");
}

#[tokio::test]
async fn provider_error_envelope_falls_through_to_sample() {
    let server = MockServer::start().await;
    let body = json!({ "status": "error", "data": "Invalid key" });
    Mock::given(method("GET"))
        .and(path_regex("^/feed/geo:"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let fetcher =
        AirQualityFetcher::new(vec![Box::new(WaqiProvider::new(server.uri(), "test-token"))]);
    let reading = fetcher.fetch_current(&jabalpur()).await;
    assert_eq!(reading.source, ReadingSource::Sample);
}

fn forecast_body(start_offset: i64, count: i64) -> serde_json::Value {
    let today = Local::now().date_naive();
    let days: Vec<_> = (start_offset..start_offset + count)
        .map(|offset| {
            json!({
                "avg": 60 + offset,
                "day": (today + Duration::days(offset)).format("%Y-%m-%d").to_string()
            })
        })
        .collect();
    json!({
        "status": "ok",
        "data": { "forecast": { "daily": { "pm25": days } } }
    })
}

#[tokio::test]
async fn full_provider_series_becomes_seven_points_starting_today() {
    let server = MockServer::start().await;
    // Series starts yesterday and runs nine days forward.
    Mock::given(method("GET"))
        .and(path_regex("^/feed/geo:"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(-1, 9)))
        .mount(&server)
        .await;

    let fetcher = ForecastFetcher::new(server.uri(), "test-token");
    let points = fetcher.fetch_forecast(&jabalpur(), Some(80)).await;

    let today = Local::now().date_naive();
    assert_eq!(points.len(), 7);
    assert_eq!(points[0].date, today);
    assert_eq!(points[0].aqi, 60);
    assert!(points.windows(2).all(|p| p[1].date > p[0].date));
}

#[tokio::test]
async fn short_provider_series_degrades_to_synthetic() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex("^/feed/geo:"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(0, 3)))
        .mount(&server)
        .await;

    let fetcher = ForecastFetcher::new(server.uri(), "test-token");
    let points = fetcher.fetch_forecast(&jabalpur(), Some(120)).await;

    let today = Local::now().date_naive();
    assert_eq!(points.len(), 7);
    for (offset, point) in points.iter().enumerate() {
        assert_eq!(point.date, today + Duration::days(offset as i64));
        assert!(point.aqi >= 105 && point.aqi <= 135, "aqi={}", point.aqi);
    }
}

#[tokio::test]
async fn unreachable_forecast_endpoint_degrades_to_synthetic() {
    let fetcher = ForecastFetcher::new("http://127.0.0.1:9", "test-token");
    let points = fetcher.fetch_forecast(&jabalpur(), None).await;
    assert_eq!(points.len(), 7);
    for point in &points {
        assert!(point.aqi <= 80, "aqi={}", point.aqi);
    }
}

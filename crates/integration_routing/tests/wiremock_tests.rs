//! Integration tests for the routing and geocoding clients (wiremock-based)

use domain::GeoLocation;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_routing::{
    GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient, OsrmConfig,
    OsrmRoutingClient, RoutingClient, RoutingError,
};

fn osrm_config(base_url: &str) -> OsrmConfig {
    OsrmConfig {
        base_url: base_url.to_string(),
        ..OsrmConfig::for_testing()
    }
}

fn nominatim_config(base_url: &str) -> NominatimConfig {
    NominatimConfig {
        base_url: base_url.to_string(),
        ..NominatimConfig::for_testing()
    }
}

fn points() -> Vec<GeoLocation> {
    vec![
        GeoLocation::new(35.3733, -119.0187).unwrap(),
        GeoLocation::new(36.0083, -119.9618).unwrap(),
        GeoLocation::new(37.0583, -120.8499).unwrap(),
    ]
}

const fn sample_route_json() -> &'static str {
    r#"{
        "code": "Ok",
        "routes": [{
            "distance": 225000.0,
            "duration": 8100.0,
            "legs": [
                {
                    "distance": 110000.0,
                    "duration": 3960.0,
                    "summary": "I 5",
                    "steps": [{
                        "distance": 110000.0,
                        "duration": 3960.0,
                        "name": "I 5",
                        "geometry": { "type": "LineString", "coordinates": [[-119.0187, 35.3733], [-119.9618, 36.0083]] },
                        "maneuver": { "location": [-119.0187, 35.3733], "type": "depart" }
                    }]
                },
                {
                    "distance": 115000.0,
                    "duration": 4140.0,
                    "summary": "I 5",
                    "steps": []
                }
            ]
        }],
        "waypoints": [
            { "name": "", "location": [-119.0187, 35.3733] },
            { "name": "", "location": [-119.9618, 36.0083] },
            { "name": "", "location": [-120.8499, 37.0583] }
        ]
    }"#
}

#[tokio::test]
async fn test_route_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/.+;.+;.+$"))
        .and(query_param("steps", "true"))
        .and(query_param("geometries", "geojson"))
        .and(query_param("overview", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_route_json()))
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&osrm_config(&server.uri())).unwrap();
    let response = client.route(&points()).await.unwrap();

    let route = response.best().unwrap();
    assert_eq!(route.legs.len(), 2);
    assert_eq!(route.legs[0].steps.len(), 1);
    assert_eq!(response.waypoints.len(), 3);
}

#[tokio::test]
async fn test_route_no_route() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{ "code": "NoRoute", "message": "Impossible route between points" }"#,
        ))
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&osrm_config(&server.uri())).unwrap();
    let err = client.route(&points()).await.unwrap_err();

    assert!(matches!(err, RoutingError::NoRoute(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_route_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&osrm_config(&server.uri())).unwrap();
    let err = client.route(&points()).await.unwrap_err();

    assert!(matches!(
        err,
        RoutingError::RateLimitExceeded {
            retry_after_secs: Some(30)
        }
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_route_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&osrm_config(&server.uri())).unwrap();
    let err = client.route(&points()).await.unwrap_err();
    assert!(matches!(err, RoutingError::RequestFailed(_)));
}

#[tokio::test]
async fn test_route_needs_two_points() {
    let client = OsrmRoutingClient::new(&OsrmConfig::for_testing()).unwrap();
    let err = client.route(&points()[..1]).await.unwrap_err();
    assert!(matches!(err, RoutingError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_geocode_success_and_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Kettleman City, CA"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"[{"lat": "36.0083", "lon": "-119.9618"}]"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = NominatimConfig {
        cache_ttl_hours: 1,
        ..nominatim_config(&server.uri())
    };
    let client = NominatimGeocodingClient::new(&config).unwrap();

    let first = client.geocode("Kettleman City, CA").await.unwrap();
    let second = client.geocode("  kettleman city, ca ").await.unwrap();

    assert!((first.latitude() - 36.0083).abs() < 1e-9);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_geocode_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&nominatim_config(&server.uri())).unwrap();
    let err = client.geocode("Atlantis").await.unwrap_err();
    assert!(matches!(err, GeocodingError::AddressNotFound(_)));
}

#[tokio::test]
async fn test_geocode_empty_address() {
    let client = NominatimGeocodingClient::new(&NominatimConfig::for_testing()).unwrap();
    assert!(client.geocode("   ").await.is_err());
}

//! Integration tests for `KakaoClient` using wiremock HTTP mocks.

use mukka_core::Coordinate;
use mukka_kakao::{KakaoClient, KakaoError, RoutePriority};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> KakaoClient {
    KakaoClient::with_base_urls("test-key", 30, base_url, base_url)
        .expect("client construction should not fail")
        .with_retry(0, 0)
}

const SEOUL: Coordinate = Coordinate {
    lat: 37.5665,
    lng: 126.978,
};
const BUSAN: Coordinate = Coordinate {
    lat: 35.1796,
    lng: 129.0756,
};

#[tokio::test]
async fn directions_returns_parsed_routes() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "routes": [
            {
                "summary": {
                    "distance": 390_000,
                    "duration": 16_200,
                    "fare": { "toll": 18_000 }
                },
                "sections": [
                    {
                        "roads": [
                            {
                                "name": "경부고속도로",
                                "vertexes": [126.978, 37.5665, 127.1, 37.4]
                            }
                        ]
                    }
                ]
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/v1/directions"))
        .and(query_param("priority", "RECOMMEND"))
        .and(query_param("alternatives", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let routes = client
        .directions(SEOUL, BUSAN, RoutePriority::Recommend)
        .await
        .expect("should parse directions");

    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].signature(), (390_000, 16_200, 18_000));
    assert_eq!(routes[0].sections[0].roads[0].name, "경부고속도로");
}

#[tokio::test]
async fn directions_with_zero_routes_is_empty_not_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/directions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "routes": [] })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let routes = client
        .directions(SEOUL, BUSAN, RoutePriority::Time)
        .await
        .expect("zero routes is a valid outcome");
    assert!(routes.is_empty());
}

#[tokio::test]
async fn non_success_status_surfaces_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/directions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid app key"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .directions(SEOUL, BUSAN, RoutePriority::Recommend)
        .await
        .expect_err("401 must be an error");

    match err {
        KakaoError::Api { status, detail } => {
            assert_eq!(status, 401);
            assert!(detail.contains("invalid app key"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn keyword_search_near_sends_center_and_distance_sort() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "documents": [
            {
                "id": "101",
                "place_name": "안성휴게소 서울방향",
                "category_name": "여행 > 휴게소",
                "x": "127.243",
                "y": "37.067",
                "address_name": "경기 안성시",
                "road_address_name": "경기 안성시 경부고속도로"
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/v2/local/search/keyword.json"))
        .and(query_param("query", "휴게소"))
        .and(query_param("radius", "12000"))
        .and(query_param("size", "15"))
        .and(query_param("sort", "distance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let docs = client
        .keyword_search_near("휴게소", SEOUL, 12_000, 15)
        .await
        .expect("should parse keyword search");

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].place_name, "안성휴게소 서울방향");
    let coord = docs[0].coordinate().expect("valid coordinates");
    assert!((coord.lat - 37.067).abs() < 1e-9);
}

#[tokio::test]
async fn resolve_coordinates_uses_keyword_hit_first() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "documents": [ { "place_name": "서울역", "x": "126.9707", "y": "37.5547" } ]
    });

    Mock::given(method("GET"))
        .and(path("/v2/local/search/keyword.json"))
        .and(query_param("query", "서울역"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let coord = client
        .resolve_coordinates("서울역")
        .await
        .expect("keyword hit should resolve");
    assert!((coord.lng - 126.9707).abs() < 1e-9);
}

#[tokio::test]
async fn resolve_coordinates_falls_back_to_address_search() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/local/search/keyword.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "documents": [] })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/local/search/address.json"))
        .and(query_param("query", "부산 중앙대로 1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documents": [ { "address_name": "부산 중앙대로 1", "x": "129.04", "y": "35.11" } ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let coord = client
        .resolve_coordinates("부산 중앙대로 1")
        .await
        .expect("address fallback should resolve");
    assert!((coord.lat - 35.11).abs() < 1e-9);
}

#[tokio::test]
async fn resolve_coordinates_fails_when_both_searches_miss() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/local/search/keyword.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "documents": [] })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/local/search/address.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "documents": [] })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .resolve_coordinates("존재하지않는곳")
        .await
        .expect_err("must not resolve");
    assert!(matches!(err, KakaoError::UnresolvableLocation(ref q) if q == "존재하지않는곳"));
}

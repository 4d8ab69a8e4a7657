// HTTP adapter tests against mocked provider endpoints

use forkcast::models::{Candidate, Location, SortHint};
use forkcast::services::{
    LocalSearchClient, PlaceDetailClient, PlaceDetailProvider, PlaceSearchProvider, ProviderError,
    SearchQuery,
};
use mockito::Matcher;
use std::time::{Duration, Instant};

fn search_client(base_url: String) -> LocalSearchClient {
    LocalSearchClient::new(base_url, "search-key".to_string(), Duration::from_secs(5), 0).unwrap()
}

fn detail_client(base_url: String) -> PlaceDetailClient {
    PlaceDetailClient::new(base_url, "detail-key".to_string(), Duration::from_secs(5), 0).unwrap()
}

fn query(keyword: &str, page: u32) -> SearchQuery<'_> {
    SearchQuery {
        keyword,
        location: Location::new(37.5665, 126.978),
        radius_meters: 800,
        sort_hint: SortHint::Distance,
        page,
        page_size: 15,
    }
}

fn candidate() -> Candidate {
    Candidate {
        external_id: "26338954".to_string(),
        name: "Myeongdong Kyoja".to_string(),
        category_path: vec!["Food".to_string(), "Korean".to_string(), "Noodles".to_string()],
        address: "29 Myeongdong 10-gil".to_string(),
        latitude: 37.5625,
        longitude: 126.9856,
        distance_meters: 420.0,
        detail_url: "http://place.map.kakao.com/26338954".to_string(),
    }
}

#[tokio::test]
async fn test_search_sends_query_and_parses_documents() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v2/local/search/keyword.json")
        .match_header("authorization", "KakaoAK search-key")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "korean bbq".into()),
            Matcher::UrlEncoded("radius".into(), "800".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("size".into(), "15".into()),
            Matcher::UrlEncoded("sort".into(), "distance".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "meta": { "is_end": false, "pageable_count": 45, "total_count": 120 },
                "documents": [
                    {
                        "id": "1001",
                        "place_name": "Charcoal House",
                        "category_name": "Food > Korean > BBQ",
                        "address_name": "12 Jongno",
                        "road_address_name": "12 Jongno-ro",
                        "x": "126.9790",
                        "y": "37.5670",
                        "distance": "135",
                        "place_url": "http://place.map.kakao.com/1001"
                    },
                    {
                        "id": "1002",
                        "place_name": "",
                        "x": "126.9791",
                        "y": "37.5671"
                    },
                    {
                        "id": "1003",
                        "place_name": "Galbi Alley",
                        "category_name": "Food > Korean",
                        "address_name": "40 Eulji-ro",
                        "road_address_name": "",
                        "x": "126.9800",
                        "y": "37.5660",
                        "distance": "",
                        "place_url": "http://place.map.kakao.com/1003"
                    }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let page = search_client(server.url()).search(&query("korean bbq", 2)).await.unwrap();

    mock.assert_async().await;
    assert!(!page.is_end);
    assert_eq!(page.candidates.len(), 2);

    let first = &page.candidates[0];
    assert_eq!(first.external_id, "1001");
    assert_eq!(first.category_path, vec!["Food", "Korean", "BBQ"]);
    assert_eq!(first.address, "12 Jongno-ro");
    assert_eq!(first.distance_meters, 135.0);

    // Missing distance falls back to the computed great-circle distance
    let second = &page.candidates[1];
    assert_eq!(second.address, "40 Eulji-ro");
    assert!(second.distance_meters > 0.0 && second.distance_meters < 500.0);
}

#[tokio::test]
async fn test_search_error_status_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v2/local/search/keyword.json")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body("quota exceeded")
        .create_async()
        .await;

    let err = search_client(server.url()).search(&query("ramen", 1)).await.unwrap_err();

    mock.assert_async().await;
    match err {
        ProviderError::ApiError { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "quota exceeded");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_search_without_meta_is_last_page() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v2/local/search/keyword.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"documents": []}"#)
        .create_async()
        .await;

    let page = search_client(server.url()).search(&query("tapas", 1)).await.unwrap();

    assert!(page.is_end);
    assert!(page.candidates.is_empty());
}

#[tokio::test]
async fn test_detail_posts_text_query_and_maps_fields() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/places:searchText")
        .match_header("x-goog-api-key", "detail-key")
        .match_header("x-goog-fieldmask", Matcher::Regex("places.rating".to_string()))
        .match_body(Matcher::PartialJson(serde_json::json!({
            "textQuery": "Myeongdong Kyoja 29 Myeongdong 10-gil",
            "maxResultCount": 1
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "places": [{
                    "id": "ChIJ123",
                    "rating": 4.3,
                    "userRatingCount": 2210,
                    "currentOpeningHours": { "openNow": false },
                    "websiteUri": "https://kyoja.example",
                    "photos": [{ "name": "places/ChIJ123/photos/p1" }]
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let detail = detail_client(server.url()).detail(&candidate()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(detail.rating, Some(4.3));
    assert_eq!(detail.review_count, Some(2210));
    assert_eq!(detail.open_now, Some(false));
    assert!(detail.hours_known);
    assert_eq!(detail.website.as_deref(), Some("https://kyoja.example"));
    assert!(detail.phone.is_none());
    assert_eq!(detail.photos, vec!["places/ChIJ123/photos/p1"]);
}

#[tokio::test]
async fn test_detail_without_match_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/places:searchText")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    let err = detail_client(server.url()).detail(&candidate()).await.unwrap_err();

    assert!(matches!(err, ProviderError::NotFound(_)));
}

#[tokio::test]
async fn test_detail_server_error_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/places:searchText")
        .with_status(500)
        .create_async()
        .await;

    let err = detail_client(server.url()).detail(&candidate()).await.unwrap_err();

    assert!(matches!(err, ProviderError::ApiError { status: 500, .. }));
}

#[tokio::test]
async fn test_search_client_throttles_to_configured_rate() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v2/local/search/keyword.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"meta": {"is_end": true}, "documents": []}"#)
        .expect(3)
        .create_async()
        .await;
    let client =
        LocalSearchClient::new(server.url(), "search-key".to_string(), Duration::from_secs(5), 2).unwrap();

    let start = Instant::now();
    for page in 1..=3 {
        client.search(&query("ramen", page)).await.unwrap();
    }

    // Quota of 2/s: the third call waits for a fresh cell
    assert!(start.elapsed() >= Duration::from_millis(400));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_detail_body_carries_location_bias() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/places:searchText")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "locationBias": {
                "circle": {
                    "center": { "latitude": 37.5625, "longitude": 126.9856 },
                    "radius": 100.0
                }
            }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"places": [{"rating": 4.0}]}"#)
        .create_async()
        .await;

    let detail = detail_client(server.url()).detail(&candidate()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(detail.rating, Some(4.0));
    assert!(!detail.hours_known);
}

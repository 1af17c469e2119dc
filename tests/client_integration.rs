use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use riot_stats_client::client::RiotClient;
use riot_stats_client::error::RiotError;
use riot_stats_client::routing::{Platform, Routing};

async fn build_client(server: &MockServer, cache: &tempfile::TempDir) -> RiotClient {
    RiotClient::builder()
        .api_token("test-token")
        .requests_per_second(1000)
        .cache_dir(cache.path())
        .platform_base_url(server.uri())
        .regional_base_url(server.uri())
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_account_lookup_sends_token_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/riot/account/v1/accounts/by-riot-id/Faker/KR1"))
        .and(header("X-Riot-Token", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "puuid": "puuid-1", "gameName": "Faker", "tagLine": "KR1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cache = tempfile::tempdir().unwrap();
    let client = build_client(&server, &cache).await;
    let account = client
        .get_account_by_riot_id(Routing::Asia, "Faker", "KR1")
        .await
        .unwrap();
    assert_eq!(account.puuid, "puuid-1");
}

#[tokio::test]
async fn test_game_names_with_spaces_are_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/riot/account/v1/accounts/by-riot-id/Hide%20on%20bush/KR1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "puuid": "puuid-1", "gameName": "Hide on bush", "tagLine": "KR1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cache = tempfile::tempdir().unwrap();
    let client = build_client(&server, &cache).await;
    let account = client
        .get_account_by_riot_id(Routing::Asia, "Hide on bush", "KR1")
        .await
        .unwrap();
    assert_eq!(account.game_name, "Hide on bush");
}

#[tokio::test]
async fn test_repeat_request_is_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lol/summoner/v4/summoners/by-puuid/puuid-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "summoner-1", "puuid": "puuid-1", "summonerLevel": 30, "profileIconId": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cache = tempfile::tempdir().unwrap();
    let client = build_client(&server, &cache).await;

    let first = client
        .get_summoner_by_puuid(Platform::Na1, "puuid-1")
        .await
        .unwrap();
    let second = client
        .get_summoner_by_puuid(Platform::Na1, "puuid-1")
        .await
        .unwrap();

    // The mock's expect(1) verifies only one call went over the wire.
    assert_eq!(first.id, second.id);
}

#[tokio::test]
async fn test_not_found_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lol/summoner/v4/summoners/by-puuid/unknown"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let cache = tempfile::tempdir().unwrap();
    let client = build_client(&server, &cache).await;
    let err = client
        .get_summoner_by_puuid(Platform::Na1, "unknown")
        .await
        .unwrap_err();
    assert!(matches!(err, RiotError::NotFound(_)));
}

#[tokio::test]
async fn test_bad_key_maps_to_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lol/league/v4/entries/by-summoner/summoner-1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&server)
        .await;

    let cache = tempfile::tempdir().unwrap();
    let client = build_client(&server, &cache).await;
    let err = client
        .get_ranked_entries(Platform::Na1, "summoner-1")
        .await
        .unwrap_err();
    assert!(err.is_auth_failure());
}

#[tokio::test]
async fn test_server_error_maps_to_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lol/league/v4/entries/by-summoner/summoner-1"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let cache = tempfile::tempdir().unwrap();
    let client = build_client(&server, &cache).await;
    let err = client
        .get_ranked_entries(Platform::Na1, "summoner-1")
        .await
        .unwrap_err();
    assert!(matches!(err, RiotError::Network(_)));
}

#[tokio::test]
async fn test_undecodable_body_maps_to_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lol/summoner/v4/summoners/by-puuid/puuid-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"unexpected": true}"#))
        .mount(&server)
        .await;

    let cache = tempfile::tempdir().unwrap();
    let client = build_client(&server, &cache).await;
    let err = client
        .get_summoner_by_puuid(Platform::Na1, "puuid-1")
        .await
        .unwrap_err();
    assert!(matches!(err, RiotError::Malformed(_)));
}

#[tokio::test]
async fn test_match_ids_query_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lol/match/v5/matches/by-puuid/puuid-1/ids"))
        .and(query_param("queue", "420"))
        .and(query_param("count", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["NA1_1", "NA1_2"])))
        .mount(&server)
        .await;

    let cache = tempfile::tempdir().unwrap();
    let client = build_client(&server, &cache).await;
    let ids = client
        .get_match_ids(Routing::Americas, "puuid-1", Some(420), 20)
        .await
        .unwrap();
    assert_eq!(ids, vec!["NA1_1", "NA1_2"]);
}

#[tokio::test]
async fn test_mastery_score_is_a_bare_number() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lol/champion-mastery/v4/scores/by-puuid/puuid-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("347"))
        .mount(&server)
        .await;

    let cache = tempfile::tempdir().unwrap();
    let client = build_client(&server, &cache).await;
    let score = client
        .get_mastery_score(Platform::Na1, "puuid-1")
        .await
        .unwrap();
    assert_eq!(score, 347);
}

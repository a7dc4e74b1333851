//! Tests for the resources module

use super::catalog::{self, RESOURCES};
use super::*;
use crate::error::Error;
use crate::http::{ApiRequest, BlockingHttpClient, HttpClient, HttpClientConfig};
use crate::types::{Method, TrendingPeriod};
use futures::{StreamExt, TryStreamExt};
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn request_for(
    resource: &str,
    operation: &str,
    id: Option<&str>,
    args: &Invocation,
) -> crate::error::Result<ApiRequest> {
    let def = catalog::require(resource)?;
    let op = def
        .operation(operation)
        .ok_or_else(|| Error::unknown_operation(def.name, operation))?;
    build_request(def, op, id, args)
}

fn query_of(request: &ApiRequest) -> Vec<(&str, &str)> {
    request
        .query
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect()
}

async fn client_for(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .api_key("test-key")
        .build();
    HttpClient::with_config(config).unwrap()
}

/// Serves `total` records at `route`, honouring `offset` and `limit`.
async fn mount_paged(server: &MockServer, route: &str, total: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(move |req: &Request| {
            let param = |name: &str| {
                req.url
                    .query_pairs()
                    .find(|(k, _)| k == name)
                    .and_then(|(_, v)| v.parse::<u64>().ok())
            };
            let offset = param("offset").unwrap_or(0);
            let limit = param("limit").unwrap_or(100);
            let items: Vec<_> = (offset..total.min(offset + limit))
                .map(|i| json!({"id": i}))
                .collect();
            ResponseTemplate::new(200).set_body_json(json!({
                "items": items,
                "total": total,
                "offset": offset,
                "limit": limit
            }))
        })
        .mount(server)
        .await;
}

// ============================================================================
// Catalog Tests
// ============================================================================

#[test_case("vulns", "vulnerabilities")]
#[test_case("actors", "threat_actors")]
#[test_case("orgs", "organizations")]
#[test_case("chunks", "content_chunks")]
#[test_case("sigs", "detection_signatures")]
#[test_case("aps", "attack_patterns")]
#[test_case("  Vulnerabilities ", "vulnerabilities" ; "trimmed and case folded")]
#[test_case("ADVISORIES", "advisories" ; "upper case")]
fn test_lookup_resolves_names_and_aliases(name: &str, expected: &str) {
    assert_eq!(catalog::lookup(name).map(|d| d.name), Some(expected));
}

#[test]
fn test_lookup_unknown_resource() {
    assert!(catalog::lookup("widgets").is_none());
    let err = catalog::require("widgets").unwrap_err();
    assert!(matches!(err, Error::UnknownResource { .. }));
    assert_eq!(err.to_string(), "Unknown resource: widgets");
}

#[test]
fn test_catalog_names_are_unique() {
    let mut names = catalog::resource_names();
    let count = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), count);

    for def in RESOURCES {
        let mut ops = def.operation_names();
        let count = ops.len();
        ops.dedup();
        assert_eq!(ops.len(), count, "duplicate operation on {}", def.name);
    }
}

#[test]
fn test_aliases_point_at_real_resources() {
    for (alias, full) in catalog::ALIASES {
        assert!(catalog::lookup(full).is_some(), "{alias} -> {full}");
    }
}

#[test]
fn test_advisories_use_long_path() {
    assert_eq!(catalog::ADVISORIES.path, "/technology_product_advisories");
}

#[test]
fn test_operation_names_sorted() {
    let names = catalog::BREACHES.operation_names();
    assert_eq!(names, vec!["get", "list", "organizations"]);
}

// ============================================================================
// Request Building Tests
// ============================================================================

#[test]
fn test_list_applies_paging_defaults() {
    let request = request_for("vulnerabilities", "list", None, &Invocation::new()).unwrap();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path(), "/vulnerabilities");
    assert_eq!(query_of(&request), vec![("limit", "100"), ("offset", "0")]);
    assert!(request.body.is_none());
}

#[test]
fn test_list_caller_params_override_defaults() {
    let params = ListParams::new().limit(10).sort("cvss_base_score").filter("");
    let request = request_for("vulns", "list", None, &params.into()).unwrap();
    assert_eq!(
        query_of(&request),
        vec![("limit", "10"), ("offset", "0"), ("sort", "cvss_base_score")]
    );
}

#[test_case(None, "trending_7d" ; "default period")]
#[test_case(Some(TrendingPeriod::Day), "trending_1d" ; "one day")]
#[test_case(Some(TrendingPeriod::Month), "trending_30d" ; "thirty days")]
fn test_trending_rewrites_period_into_sort(period: Option<TrendingPeriod>, sort: &str) {
    let mut params = ListParams::new().limit(5);
    if let Some(period) = period {
        params = params.period(period);
    }
    let request = request_for("threat_actors", "trending", None, &params.into()).unwrap();
    assert_eq!(
        query_of(&request),
        vec![("limit", "5"), ("offset", "0"), ("sort", sort)]
    );
}

#[test]
fn test_trending_invalid_period() {
    let params = ListParams::new().param("period", "2w");
    let err = request_for("malware", "trending", None, &params.into()).unwrap_err();
    assert!(matches!(err, Error::MissingArgument { .. }));
}

#[test]
fn test_get_requires_identifier() {
    let err = request_for("vulnerabilities", "get", None, &Invocation::new()).unwrap_err();
    assert_eq!(err.to_string(), "Method 'get' requires an identifier");

    let err = request_for("vulnerabilities", "get", Some("  "), &Invocation::new()).unwrap_err();
    assert!(matches!(err, Error::MissingArgument { .. }));
}

#[test_case("vulnerabilities", "get", "/vulnerabilities/CVE-2024-3094")]
#[test_case("vulnerabilities", "export", "/vulnerabilities/CVE-2024-3094/export")]
#[test_case("vulnerabilities", "advisories", "/vulnerabilities/CVE-2024-3094/technology_product_advisories")]
#[test_case("references", "threat_actors", "/references/CVE-2024-3094/threat-actors")]
#[test_case("references", "vulnerability_mentions", "/references/CVE-2024-3094/vulnerability-mentions")]
#[test_case("sources", "statistics", "/sources/CVE-2024-3094/statistics")]
#[test_case("advisories", "products", "/technology_product_advisories/CVE-2024-3094/products")]
fn test_item_routes(resource: &str, operation: &str, expected: &str) {
    let request =
        request_for(resource, operation, Some("CVE-2024-3094"), &Invocation::new()).unwrap();
    assert_eq!(request.path(), expected);
}

#[test]
fn test_identifier_is_one_segment() {
    let request =
        request_for("products", "advisories", Some("acme/widget?v=2#x"), &Invocation::new())
            .unwrap();
    assert_eq!(
        request.segments,
        vec!["products", "acme/widget?v=2#x", "technology_product_advisories"]
    );
}

#[test]
fn test_child_routes_ignore_identifier() {
    let request = request_for("stories", "topics", None, &Invocation::new()).unwrap();
    assert_eq!(request.path(), "/stories/topics");
    assert!(request.query.is_empty());

    let request = request_for("mentions", "actors", None, &Invocation::new()).unwrap();
    assert_eq!(request.path(), "/mentions/actors");
    assert_eq!(query_of(&request), vec![("limit", "100"), ("offset", "0")]);
}

#[test]
fn test_related_passes_params_through() {
    let params = ListParams::new().limit(3);
    let request = request_for("vulns", "mentions", Some("CVE-1"), &params.into()).unwrap();
    assert_eq!(query_of(&request), vec![("limit", "3")]);

    let request = request_for("vulns", "mentions", Some("CVE-1"), &Invocation::new()).unwrap();
    assert!(request.query.is_empty());
}

#[test]
fn test_enrich_is_post_without_body() {
    let request = request_for("orgs", "enrich", Some("acme"), &Invocation::new()).unwrap();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path(), "/organizations/acme/enrich");
    assert!(request.body.is_none());
}

#[test]
fn test_create_builds_urls_body() {
    let args = Invocation::new().urls(["https://a.example", "https://b.example"]);
    let request = request_for("references", "create", None, &args).unwrap();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path(), "/references");
    assert_eq!(
        request.body,
        Some(json!({"urls": ["https://a.example", "https://b.example"]}))
    );
}

#[test]
fn test_create_accepts_explicit_body() {
    let args = Invocation::new().body(json!({"urls": ["https://c.example"]}));
    let request = request_for("references", "create", None, &args).unwrap();
    assert_eq!(request.body, Some(json!({"urls": ["https://c.example"]})));
}

#[test]
fn test_create_without_urls_fails() {
    let err = request_for("references", "create", None, &Invocation::new()).unwrap_err();
    assert!(matches!(err, Error::MissingArgument { .. }));
}

#[test]
fn test_update_requires_body() {
    let err = request_for("products", "update", Some("p1"), &Invocation::new()).unwrap_err();
    assert_eq!(err.to_string(), "Method 'update' requires a JSON body");

    let args = Invocation::new().body(json!({"name": "OpenSSL"}));
    let request = request_for("products", "update", Some("p1"), &args).unwrap();
    assert_eq!(request.method, Method::PATCH);
    assert_eq!(request.path(), "/products/p1");
}

#[test]
fn test_search_requires_q() {
    let err = request_for("search", "query", None, &Invocation::new()).unwrap_err();
    assert!(matches!(err, Error::MissingArgument { .. }));

    let params = ListParams::new().param("q", "APT28").param("types", "threat_actor");
    let request = request_for("search", "query", None, &params.into()).unwrap();
    assert_eq!(request.path(), "/search");
    assert_eq!(
        query_of(&request),
        vec![("q", "APT28"), ("types", "threat_actor")]
    );
}

#[test]
fn test_into_walk_splits_limit_and_drops_offset() {
    let (limit, filters) = ListParams::new()
        .offset(40)
        .limit(25)
        .sort("name")
        .into_walk();
    assert_eq!(limit, 25);
    assert_eq!(filters.len(), 1);
    assert_eq!(filters.get("sort").map(String::as_str), Some("name"));

    let (limit, _) = ListParams::new().into_walk();
    assert_eq!(limit, 100);
}

#[test]
fn test_output_follows_operation_shape() {
    let list = catalog::VULNERABILITIES.operation("list").unwrap();
    let get = catalog::VULNERABILITIES.operation("get").unwrap();

    let body = json!({"items": [1], "total": 1});
    assert!(matches!(Output::from_body(list, body.clone()), Output::Page(_)));
    assert_eq!(Output::from_body(get, body.clone()), Output::Value(body));
}

// ============================================================================
// Resource Handle Tests
// ============================================================================

#[tokio::test]
async fn test_resource_list() {
    let server = MockServer::start().await;
    mount_paged(&server, "/vulnerabilities", 7).await;
    let client = client_for(&server).await;

    let resource = Resource::new(&client, &catalog::VULNERABILITIES);
    let page = resource.list(&ListParams::new().limit(3)).await.unwrap();

    assert_eq!(page.len(), 3);
    assert_eq!(page.total(), 7);
    assert!(page.has_more());
}

#[tokio::test]
async fn test_resource_trending_sends_sort() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/threat_actors"))
        .and(query_param("sort", "trending_30d"))
        .and(query_param_is_missing("period"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [], "total": 0})))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let resource = Resource::new(&client, &catalog::THREAT_ACTORS);
    let page = resource
        .trending(TrendingPeriod::Month, &ListParams::new())
        .await
        .unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_resource_get_and_related() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vulnerabilities/CVE-2021-44228"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cve_id": "CVE-2021-44228"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/vulnerabilities/CVE-2021-44228/exploits"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "e1"}])))
        .mount(&server)
        .await;
    let client = client_for(&server).await;
    let vulns = Resource::new(&client, &catalog::VULNERABILITIES);

    let record = vulns.get("CVE-2021-44228").await.unwrap();
    assert_eq!(record["cve_id"], "CVE-2021-44228");

    let exploits = vulns
        .related("CVE-2021-44228", "exploits", &ListParams::new().limit(5))
        .await
        .unwrap();
    assert_eq!(exploits, json!([{"id": "e1"}]));
}

#[tokio::test]
async fn test_resource_get_encodes_identifier() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/acme%2Fwidget%3Fv=2"))
        .and(query_param_is_missing("v"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "acme/widget?v=2"})))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server).await;
    let products = Resource::new(&client, &catalog::PRODUCTS);

    let record = products.get("acme/widget?v=2").await.unwrap();
    assert_eq!(record["id"], "acme/widget?v=2");
}

#[tokio::test]
async fn test_resource_unknown_operation_skips_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let exploits = Resource::new(&client, &catalog::EXPLOITS);
    let err = exploits.enrich("x").await.unwrap_err();
    assert_eq!(err.to_string(), "Unknown method 'enrich' on resource 'exploits'");
}

#[tokio::test]
async fn test_resource_create_posts_urls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/references"))
        .and(body_json(json!({"urls": ["https://blog.example/post"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"queued": 1})))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let references = Resource::new(&client, &catalog::REFERENCES);
    let body = references.create(&["https://blog.example/post"]).await.unwrap();
    assert_eq!(body, json!({"queued": 1}));
}

#[tokio::test]
async fn test_resource_api_error_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weaknesses/CWE-0"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found"})))
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let err = Resource::new(&client, &catalog::WEAKNESSES)
        .get("CWE-0")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { status: 404, .. }));
}

#[tokio::test]
async fn test_list_all_stream_walks_every_page() {
    let server = MockServer::start().await;
    mount_paged(&server, "/malware", 5).await;
    let client = client_for(&server).await;

    let malware = Resource::new(&client, &catalog::MALWARE);
    let items: Vec<_> = malware
        .list_all(ListParams::new().limit(2))
        .try_collect()
        .await
        .unwrap();

    let ids: Vec<_> = items.iter().map(|i| i["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_paginate_stream_on_child_operation() {
    let server = MockServer::start().await;
    mount_paged(&server, "/vulnerabilities/exploited", 3).await;
    let client = client_for(&server).await;

    let vulns = Resource::new(&client, &catalog::VULNERABILITIES);
    let items: Vec<_> = vulns
        .paginate("exploited", None, ListParams::new().limit(2))
        .try_collect()
        .await
        .unwrap();
    assert_eq!(items.len(), 3);
}

#[tokio::test]
async fn test_paginate_unknown_operation_yields_error_once() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;

    let breaches = Resource::new(&client, &catalog::BREACHES);
    let results: Vec<_> = breaches
        .paginate("trending", None, ListParams::new())
        .collect()
        .await;

    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(Error::UnknownOperation { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_list_all_iterates_every_page() {
    let server = MockServer::start().await;
    mount_paged(&server, "/weaknesses", 4).await;

    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .api_key("test-key")
        .build();
    let items = tokio::task::spawn_blocking(move || {
        let client = BlockingHttpClient::with_config(config).unwrap();
        let weaknesses = Resource::new(&client, &catalog::WEAKNESSES);
        weaknesses
            .list_all(ListParams::new().limit(3))
            .collect::<crate::error::Result<Vec<_>>>()
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(items.len(), 4);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_resource_get() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stories/s1/similar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "s2"}])))
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .api_key("test-key")
        .build();
    let body = tokio::task::spawn_blocking(move || {
        let client = BlockingHttpClient::with_config(config).unwrap();
        let stories = Resource::new(&client, &catalog::STORIES);
        stories.related("s1", "similar", &ListParams::new())
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(body, json!([{"id": "s2"}]));
}

//! Index-and-Search Example
//!
//! A minimal walkthrough against a live cluster: create an index, store a
//! document, run a URI search and a structured term query, then clean up.
//!
//! Run with: cargo run --example index_and_search
//! Point ES_URL at your cluster (default: http://127.0.0.1:9200).

use elasticlite_rs::Client;
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("elasticlite_rs=debug")),
        )
        .init();

    let es_url = std::env::var("ES_URL").unwrap_or_else(|_| "http://127.0.0.1:9200".to_string());
    let client = Client::new(es_url);

    let response = client.create_index("articles").await?.unwrap_or_default();
    println!("✅ Index created: acknowledged={}", response["acknowledged"]);

    client
        .index_document(
            "articles",
            "1",
            &json!({"title": "Tides and currents", "uuid": "this-is-a-uuid"}),
            &[("refresh", "true")],
        )
        .await?;
    println!("📝 Document indexed");

    let response = client
        .uri_search_one_index("articles", "title:tides", &[])
        .await?
        .unwrap_or_default();
    let hits = response["hits"]["hits"].as_array().map_or(0, Vec::len);
    println!("🔍 URI search hits: {hits}");

    let query = json!({
        "query": {"term": {"uuid.keyword": {"value": "this-is-a-uuid"}}}
    });
    let response = client
        .search(&query, Some("articles"), &[])
        .await?
        .unwrap_or_default();
    for hit in response["hits"]["hits"].as_array().unwrap_or(&Vec::new()) {
        println!("   {} -> {}", hit["_id"], hit["_source"]["title"]);
    }

    client.delete_index("articles").await?;
    println!("🧹 Index deleted");

    Ok(())
}

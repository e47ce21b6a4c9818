//! Bulk Indexing Example
//!
//! Indexes a batch of documents through the newline-delimited bulk API,
//! flushing every 100 documents, then counts what landed.
//!
//! Run with: cargo run --example bulk_indexing
//! Point ES_URL at your cluster (default: http://127.0.0.1:9200).

use elasticlite_rs::Client;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("elasticlite_rs=info")),
        )
        .init();

    let es_url = std::env::var("ES_URL").unwrap_or_else(|_| "http://127.0.0.1:9200".to_string());
    let client = Client::new(es_url);

    client.create_index("bulk_demo").await?;

    let mut items: Vec<Value> = Vec::new();
    for i in 1..=250u32 {
        items.push(json!({"index": {"_id": i.to_string()}}));
        items.push(json!({"test": "bulk", "my_field": format!("my_value_{i}")}));

        // Flush every 100 documents.
        if i % 100 == 0 {
            let response = client
                .bulk(items.clone(), Some("bulk_demo"), &[])
                .await?
                .unwrap_or_default();
            println!(
                "📦 Sent chunk: {} items, errors={}",
                response["items"].as_array().map_or(0, Vec::len),
                response["errors"]
            );
            items.clear();
        }
    }
    if !items.is_empty() {
        let response = client
            .bulk(items, Some("bulk_demo"), &[])
            .await?
            .unwrap_or_default();
        println!(
            "📦 Sent final chunk: {} items",
            response["items"].as_array().map_or(0, Vec::len)
        );
    }

    client.refresh(Some("bulk_demo"), &[]).await?;
    let response = client.count("bulk_demo", &[], None).await?.unwrap_or_default();
    println!("🔢 Documents in index: {}", response["count"]);

    client.delete_index("bulk_demo").await?;

    Ok(())
}

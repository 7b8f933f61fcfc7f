//! Posts a PDF to a running `api` server.
//!
//!   cargo run -p pdf_search --example client -- path/to/file.pdf treaty signed

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let pdf_path = args.next().ok_or("usage: client <file.pdf> <keyword>...")?;
    let keywords: Vec<String> = args.collect();

    let base_url = std::env::var("API_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());
    let client = Client::new();

    println!("Health Check:");
    let health_response = client.get(format!("{}/health", base_url)).send().await?;
    println!("Status: {}", health_response.status());
    let health_json: serde_json::Value = health_response.json().await?;
    println!("Response: {}", serde_json::to_string_pretty(&health_json)?);

    println!("\nSearch:");
    let pdf_data = STANDARD.encode(std::fs::read(&pdf_path)?);
    let payload = json!({
        "pdfData": pdf_data,
        "keywords": keywords,
    });

    let response = client
        .post(format!("{}/api/process", base_url))
        .json(&payload)
        .send()
        .await?;

    println!("Status: {}", response.status());
    let body: serde_json::Value = response.json().await?;
    println!("Response: {}", serde_json::to_string_pretty(&body)?);

    Ok(())
}

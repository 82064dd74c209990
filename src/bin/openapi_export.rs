use std::{fs, path::PathBuf};

use products_api::openapi::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("openapi").join("products-api.json"));

    let json = serde_json::to_string_pretty(&ApiDoc::openapi())?;

    if let Some(dir) = output_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(&output_path, json)?;

    println!("OpenAPI document written to {}", output_path.display());
    Ok(())
}

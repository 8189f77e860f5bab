// Prints the OpenAPI document to stdout.
// Usage: cargo run --bin openapi_export > openapi.json

use audiobook_api::api::openapi::ApiDoc;
use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
    let json = ApiDoc::openapi().to_pretty_json()?;
    println!("{}", json);
    Ok(())
}

//! Print the OpenAPI document as JSON.

use backend::ApiDoc;
use utoipa::OpenApi;

#[expect(clippy::print_stdout, reason = "the document is this tool's output")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let json = ApiDoc::openapi().to_json()?;
    println!("{json}");
    Ok(())
}

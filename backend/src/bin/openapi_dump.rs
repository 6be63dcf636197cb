//! Print the OpenAPI document as JSON.

use color_eyre::eyre::{Context, Result};
use message_board::doc::ApiDoc;
use utoipa::OpenApi;

#[expect(clippy::print_stdout, reason = "the document is the command output")]
fn main() -> Result<()> {
    color_eyre::install()?;
    let document = ApiDoc::openapi()
        .to_pretty_json()
        .wrap_err("serialise OpenAPI document")?;
    println!("{document}");
    Ok(())
}

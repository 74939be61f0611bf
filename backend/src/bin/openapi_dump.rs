//! Print the OpenAPI document as JSON.

use std::process::ExitCode;

use quizboard::doc::ApiDoc;
use utoipa::OpenApi;

#[expect(
    clippy::print_stderr,
    reason = "command-line tool reports serialisation failures on stderr"
)]
fn main() -> ExitCode {
    match ApiDoc::openapi().to_pretty_json() {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("failed to serialise OpenAPI document: {error}");
            ExitCode::FAILURE
        }
    }
}

//! update-homebrew - refresh the Homebrew tap after a release

use anyhow::Result;

use relkit_cli::HomebrewArgs;
use relkit_cli::cmd;

#[tokio::main]
async fn main() -> Result<()> {
    relkit_cli::init_tracing();

    let args: HomebrewArgs = relkit_cli::parse_args();
    cmd::homebrew::update_homebrew(args).await
}

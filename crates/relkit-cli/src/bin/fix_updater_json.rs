//! fix-updater-json - repair the auto-update manifest of a release

use anyhow::Result;

use relkit_cli::ManifestArgs;
use relkit_cli::cmd;

fn main() -> Result<()> {
    relkit_cli::init_tracing();

    let args: ManifestArgs = relkit_cli::parse_args();
    cmd::manifest::fix_updater_json(args)
}

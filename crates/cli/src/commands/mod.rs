pub mod deploy;
pub mod discover;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use crate::output::OutputFormat;

pub async fn dispatch(cli: Cli, format: OutputFormat) -> Result<()> {
    match cli.command {
        Commands::Deploy {
            source,
            editor_url,
            auto,
            kind,
            hub_ip,
            headless,
            post_hook,
        } => {
            let request = deploy::DeployRequest {
                source_path: source,
                editor_url,
                auto,
                kind,
                hub_ip,
                headless,
                post_hook,
                artifacts_dir: cli.artifacts_dir,
            };
            deploy::execute(request, format).await
        }
        Commands::Discover { name, kind, hub_ip } => {
            discover::execute(&name, kind, hub_ip.as_deref(), format).await
        }
    }
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;
use crate::styles::cli_styles;
use crate::target::ComponentKind;

#[derive(Parser, Debug)]
#[command(name = "hubpush")]
#[command(about = "Push app and driver source into a hub's web code editor")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format: text (default) or json
    #[arg(short = 'f', long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Directory to save a page screenshot when a deploy fails
    #[arg(long, global = true, value_name = "DIR")]
    pub artifacts_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Push a source file into an editor page and save it
    Deploy {
        /// Path to the source file to push
        source: PathBuf,

        /// Editor page URL; omit it and pass --auto to discover one
        editor_url: Option<String>,

        /// Discover the editor from the source's declared name
        #[arg(long)]
        auto: bool,

        /// Component kind; sniffed from the source when omitted
        #[arg(long, value_enum)]
        kind: Option<ComponentKind>,

        /// Hub address, host or host:port (falls back to HUBPUSH_HUB_IP)
        #[arg(long, value_name = "ADDR")]
        hub_ip: Option<String>,

        /// Run the deploy browser without a visible window
        #[arg(long)]
        headless: bool,

        /// Shell command to run after the deploy finishes, success or not
        #[arg(long, value_name = "COMMAND")]
        post_hook: Option<String>,
    },

    /// Find the numeric editor id for a named app or driver
    Discover {
        /// Component name as shown on the hub's listing page
        name: String,

        /// Which listing to scan
        #[arg(long, value_enum, default_value = "app")]
        kind: ComponentKind,

        /// Hub address, host or host:port (falls back to HUBPUSH_HUB_IP)
        #[arg(long, value_name = "ADDR")]
        hub_ip: Option<String>,
    },
}

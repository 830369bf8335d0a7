use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "readiness-engine", version, about = "Upgrade readiness analyzer for CMS extensions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze an installation's extensions for upgrade readiness
    Analyze {
        /// Path to the installation root (defaults to current directory)
        #[arg(long, default_value = ".")]
        path: String,

        /// Target platform version to evaluate readiness against (defaults to the config file)
        #[arg(long)]
        target: Option<String>,

        /// Current platform version (defaults to the value in the config file)
        #[arg(long)]
        current: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

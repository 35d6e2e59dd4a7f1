use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about = "mobipress e-book producer")]
pub struct Args {
    /// Sub-commands (produce, check)
    #[command(subcommand)]
    pub sub: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Produce the .mobi artifacts (default if no sub-command)
    Produce {
        /// Path to configuration file
        #[arg(long, short = 'c')]
        config: Option<String>,
    },
    /// Report whether kindlegen and the output artifacts are present
    /// (Exit 0 = all present, 1 = something missing)
    Check {
        /// Path to configuration file
        #[arg(long, short = 'c')]
        config: Option<String>,
    },
}

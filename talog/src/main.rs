// talog/src/main.rs

mod cli;
mod commands;
mod logging;

use clap::Parser;
use miette::Result;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level);

    let project_dir = cli.project_dir;
    match cli.command {
        Commands::List => commands::list::execute(&project_dir),
        Commands::Inspect => commands::inspect::execute(&project_dir),
        Commands::Read {
            name,
            skip_validation,
            format,
        } => commands::read::execute(&project_dir, &name, skip_validation, format),
        Commands::Validate { name } => {
            if !commands::validate::execute(&project_dir, &name)? {
                // Exit with error code for CI/CD
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Params { output } => commands::params::execute(&project_dir, output.as_deref()),
    }
}

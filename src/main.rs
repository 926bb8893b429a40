use anyhow::Result;
use clap::Parser;
use std::env;
use webpurge::cli::Cli;

fn init_logging(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env).is_test(false).try_init();
}

fn main() -> Result<()> {
    // Only the program name: show the command overview
    if env::args().len() == 1 {
        Cli::show_interactive_menu();
        return Ok(());
    }

    let cli = Cli::parse();
    init_logging(cli.log_filter());
    cli.run()
}

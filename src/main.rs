use bracketeer::adapter::inbound::cli::command::{Cli, ColorChoice, Commands};
use bracketeer::adapter::inbound::cli::output::{self, OutputConfig};
use bracketeer::adapter::inbound::cli::{balance, execute, pending, preview, redeem, run};
use bracketeer::error::Result;
use bracketeer::infrastructure::bootstrap::AppContext;
use bracketeer::infrastructure::config::settings::Config;
use clap::Parser;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    if let Err(e) = start(&cli.command).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn start(command: &Commands) -> Result<()> {
    let config = Config::load(command.config_path())?;
    config.init_logging();
    let ctx = AppContext::new(config);

    match command {
        Commands::Preview(args) => preview::execute(args, &ctx).await,
        Commands::Execute(args) => execute::execute(args, &ctx).await,
        Commands::Balance(_) => balance::execute(&ctx).await,
        Commands::Redeem(_) => redeem::execute(&ctx).await,
        Commands::Run(_) => run::execute(&ctx).await,
        Commands::Pending(_) => pending::execute(&ctx),
    }
}

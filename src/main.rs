use anyhow::Result;

use usagemon::ui::App;
use usagemon::{commands, logging};
use usagemon_core::config::{Config, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Config::parse_args();

    // Setup logging
    let _log_guard = logging::init(cli.debug, cli.is_interactive());

    // Load settings
    let mut settings = Settings::load(cli.config.as_ref())?;
    settings.merge_env();
    settings.merge_cli(&cli);
    settings.validate();

    match &cli.command {
        Some(command) => commands::run(&settings, command).await,
        None => {
            // Run the dashboard
            let mut app = App::new(&settings)?;
            app.run().await
        }
    }
}

use clap::Parser;
use widget_engine::cli::commands::{cmd_check, cmd_place, cmd_simulate, cmd_style};
use widget_engine::cli::config::{Cli, Commands, load_config};
use widget_engine::display::display_model::ScrollMetrics;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Check {
            path,
            scroll_y,
            document_height,
            viewport_height,
            user_agent,
        } => {
            let scroll = ScrollMetrics {
                scroll_y,
                document_height,
                viewport_height,
            };
            if !cmd_check(&config, &path, scroll, &user_agent, cli.verbose) {
                std::process::exit(1);
            }
        }
        Commands::Style { prefers_dark } => cmd_style(&config, prefers_dark)?,
        Commands::Place {
            anchor,
            viewport,
            device,
        } => cmd_place(&anchor, &viewport, &device)?,
        Commands::Simulate {
            scenario,
            format,
            webhook,
        } => {
            let all_passed =
                cmd_simulate(&config, &scenario, &format, webhook.as_deref(), cli.verbose)?;
            if !all_passed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

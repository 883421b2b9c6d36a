use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::io::stdout;

use termfolio::core::config::{self, CliOverrides};
use termfolio::source::GitHubSource;
use termfolio::term::{self, CursorGuard, Outcome};

#[derive(Parser)]
#[command(name = "termfolio", about = "Plays a GitHub profile as a scripted terminal session")]
struct Args {
    /// GitHub account to show
    #[arg(short, long)]
    account: Option<String>,

    /// User name shown in the prompt
    #[arg(long)]
    user: Option<String>,

    /// Host name shown in the prompt
    #[arg(long)]
    host: Option<String>,

    /// Delay between typed characters, in milliseconds
    #[arg(long)]
    char_delay_ms: Option<u64>,

    /// Pause after each typed command, in milliseconds
    #[arg(long)]
    pause_ms: Option<u64>,

    /// Skip the animation and print the finished session as plain text
    #[arg(long)]
    plain: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to termfolio.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("termfolio.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config()?;
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            account: args.account,
            user: args.user,
            host: args.host,
            char_delay_ms: args.char_delay_ms,
            pause_ms: args.pause_ms,
            plain: args.plain,
        },
    );

    log::info!(
        "termfolio starting up for account {} (plain: {})",
        resolved.account,
        resolved.plain
    );

    let source = GitHubSource::new(Some(resolved.github_base_url.clone()));
    let cursor_guard = if resolved.plain {
        None
    } else {
        Some(CursorGuard::new(stdout())?)
    };

    // Without raw mode Ctrl-C is a signal; catch it so the guard still runs
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let outcome = term::run_until(&resolved, &source, stdout(), interrupt).await;
    drop(cursor_guard);

    if outcome? == Outcome::Interrupted {
        log::info!("Stopped by Ctrl-C");
    }
    Ok(())
}

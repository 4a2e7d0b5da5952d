mod bot;
mod dashboard;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use clob_engine::{FileLogger, MatchingEngine};
use tracing::info;

/// How often the bot-driven event log gets flushed to disk.
const LOG_FLUSH_INTERVAL: Duration = Duration::from_secs(5);

/// Runs a population of random trader bots against an in-process
/// matching engine and renders a terminal order book dashboard.
#[derive(Parser, Debug)]
#[command(name = "clob-sim")]
struct Args {
    /// Number of concurrent trader bots.
    #[arg(long, env = "SIM_BOT_COUNT", default_value_t = 8)]
    bots: u64,

    /// File the event log is periodically dumped to.
    #[arg(long, env = "SIM_LOG_FILE", default_value = "clob_sim.log")]
    log_file: String,

    /// Run headless (bots only, no dashboard) — useful under CI or when
    /// piping output elsewhere.
    #[arg(long, env = "SIM_HEADLESS", default_value_t = false)]
    headless: bool,
}

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let logger = Arc::new(FileLogger::new(&args.log_file));
    let engine = Arc::new(MatchingEngine::new(Box::new(Arc::clone(&logger))));

    let running = Arc::new(AtomicBool::new(true));
    let mut bot_handles = Vec::new();
    for id in 1..=args.bots {
        let bot = bot::TraderBot::new(id, Arc::clone(&engine));
        let running = Arc::clone(&running);
        bot_handles.push(std::thread::spawn(move || bot.run(running)));
    }
    info!(bots = args.bots, "trader bots started");

    let flush_handle = {
        let running = Arc::clone(&running);
        let logger = Arc::clone(&logger);
        std::thread::spawn(move || {
            while running.load(Ordering::Relaxed) {
                std::thread::sleep(LOG_FLUSH_INTERVAL);
                if let Err(err) = logger.dump() {
                    tracing::warn!(%err, "failed to flush event log");
                }
            }
        })
    };

    let result = if args.headless {
        std::thread::sleep(std::time::Duration::from_secs(3600));
        Ok(())
    } else {
        dashboard::run(Arc::clone(&engine))
    };

    running.store(false, Ordering::Relaxed);
    for handle in bot_handles {
        let _ = handle.join();
    }
    let _ = flush_handle.join();
    if let Err(err) = logger.dump() {
        tracing::warn!(%err, "failed to flush event log on shutdown");
    }

    result
}

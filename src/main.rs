use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use kelly_backtest::{
    backtest,
    kelly::{kelly_fraction, KellyEstimate},
    stats::TradeStats,
};

#[derive(Parser, Debug)]
#[command(name = "kelly-backtest")]
#[command(about = "Kelly criterion position sizing from aggregate win/loss trade statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the Kelly fraction from pre-aggregated trade statistics
    Kelly {
        /// Number of winning trades
        #[arg(long)]
        wins: usize,

        /// Total number of trades
        #[arg(long)]
        trades: usize,

        /// Sum of profit across winning trades
        #[arg(long)]
        gain: f64,

        /// Sum of absolute loss across losing trades
        #[arg(long)]
        loss: f64,
    },
    /// Replay a close-price CSV through the SMA crossover strategy and size it
    Backtest {
        /// Path to backtest configuration
        #[arg(short, long, default_value = "config/backtest.toml")]
        config: String,
    },
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "kelly_backtest=debug,info");
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(target: "cli", "kelly-backtest starting");

    let cli = Cli::parse();

    match cli.command {
        Commands::Kelly {
            wins,
            trades,
            gain,
            loss,
        } => {
            let stats = TradeStats::new(wins, trades, gain, loss);
            tracing::debug!(
                target: "cli",
                num_wins = stats.num_wins,
                total_trades = stats.total_trades,
                total_gain_from_wins = stats.total_gain_from_wins,
                total_loss_from_losses = stats.total_loss_from_losses,
                "computing kelly fraction"
            );
            let estimate = kelly_fraction(stats)?;
            print_estimate(&estimate);
        }
        Commands::Backtest { config } => {
            tracing::debug!(target: "cli", config = %config, "loading backtest config");
            let cfg = backtest::config::BacktestConfig::from_file(&config)?;
            tracing::info!(
                target: "cli",
                config = %config,
                symbol = %cfg.symbol,
                csv_path = %cfg.csv_path,
                "config loaded"
            );
            match backtest::runner::run_backtest(&cfg)? {
                Some(estimate) => print_estimate(&estimate),
                None => println!("No trades were executed for this strategy and period."),
            }
        }
    }

    Ok(())
}

fn print_estimate(estimate: &KellyEstimate) {
    for warning in &estimate.warnings {
        println!("Warning: {warning}");
    }
    println!(
        "Kelly fraction: {:.4} ({:.2}% of capital)",
        estimate.fraction,
        estimate.fraction * 100.0
    );
    if estimate.fraction > 0.0 {
        println!(
            "Positive edge: risk up to {:.2}% of capital per trade based on this history.",
            estimate.fraction * 100.0
        );
    } else {
        println!("No positive edge in this history; do not allocate capital to this strategy.");
    }
}

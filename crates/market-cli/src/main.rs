//! Command-line interface for market-rs
//!
//! # Usage
//!
//! ```bash
//! # Current oracle prices
//! market-cli prices
//!
//! # Analysis of a market question at live prices
//! market-cli analyze "Will BTC hit 100k?"
//!
//! # Analysis at fixed prices, no network
//! market-cli analyze "Will ETH hit 10k?" --eth-price 2500 --btc-price 60000
//!
//! # Interactive mode
//! market-cli repl
//!
//! # Markets on the contract at MARKET_CONTRACT (or --contract)
//! market-cli markets
//! MARKET_PRIVATE_KEY=... market-cli create "Will ETH hit 10k?"
//! MARKET_PRIVATE_KEY=... market-cli bet 0 yes 0.25
//! ```

mod markets;
mod repl;
mod session;

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use market_analysis::AnalysisGenerator;
use market_contract::{MarketBoard, MarketContext, Outcome};
use market_core::{Asset, PriceQuote, PriceSnapshot};
use market_feed::{FeedConfig, PriceFeedAdapter};
use markets::ContractSettings;
use repl::{HELP, ReplCommand};
use session::PredictionSession;
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "market-cli")]
#[command(about = "Oracle prices, market question analysis, and market contract actions", long_about = None)]
struct Args {
    /// Ethereum JSON-RPC endpoint (overrides MARKET_RPC_URL)
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Per-request oracle timeout in seconds (overrides MARKET_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Prediction market contract address (overrides MARKET_CONTRACT)
    #[arg(long, global = true)]
    contract: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch current ETH and BTC prices
    Prices,

    /// Generate an analysis for a market question
    Analyze {
        /// Market question text
        question: String,

        /// Use this ETH price instead of the oracle
        #[arg(long, requires = "btc_price")]
        eth_price: Option<String>,

        /// Use this BTC price instead of the oracle
        #[arg(long, requires = "eth_price")]
        btc_price: Option<String>,
    },

    /// Interactive session
    Repl,

    /// List the markets on the contract
    Markets,

    /// Create a market (needs MARKET_PRIVATE_KEY)
    Create {
        /// Market question text
        question: String,
    },

    /// Bet on a market (needs MARKET_PRIVATE_KEY)
    Bet {
        /// Market id as listed by `markets`
        market_id: u64,

        /// yes or no
        outcome: Outcome,

        /// Amount in ETH, e.g. 0.25
        amount: String,
    },
}

fn feed_config(args: &Args) -> anyhow::Result<FeedConfig> {
    let mut builder = FeedConfig::builder().with_env();
    if let Some(url) = &args.rpc_url {
        builder = builder.rpc_url(url.clone());
    }
    if let Some(secs) = args.timeout_secs {
        builder = builder.request_timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

/// Reject unparsable or non-positive prices before they reach the generator
fn manual_prices(eth: &str, btc: &str) -> anyhow::Result<PriceSnapshot> {
    let eth = PriceQuote::parse(Asset::Eth, eth).context("invalid --eth-price")?;
    let btc = PriceQuote::parse(Asset::Btc, btc).context("invalid --btc-price")?;
    for quote in [&eth, &btc] {
        if !quote.is_positive() {
            bail!("{} price must be greater than zero", quote.asset());
        }
    }
    Ok(PriceSnapshot::new(eth, btc))
}

fn print_prices(prices: &PriceSnapshot, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::json!({ "ethPrice": prices.eth_price(), "btcPrice": prices.btc_price() })
        );
    } else {
        println!("ETH: ${}", prices.eth_price());
        println!("BTC: ${}", prices.btc_price());
    }
}

async fn run_repl(session: &PredictionSession) -> anyhow::Result<()> {
    println!("market-cli interactive mode. Type /help for commands.\n");

    match session.refresh_prices().await {
        Ok(prices) => print_prices(&prices, false),
        Err(e) => eprintln!("{} ({e})", e.user_message()),
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("\n> ");
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            // EOF
            println!("\nGoodbye!");
            break;
        }

        match ReplCommand::parse(&input) {
            ReplCommand::Empty => {}
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Exit => {
                println!("Goodbye!");
                break;
            }
            ReplCommand::Unknown(msg) => eprintln!("{msg}"),
            ReplCommand::Prices => match session.refresh_prices().await {
                Ok(prices) => print_prices(&prices, false),
                Err(e) => eprintln!("{} ({e})", e.user_message()),
            },
            ReplCommand::Analyze(question) => match session.analyze(&question).await {
                Ok(report) => println!("{report}"),
                Err(e) => eprintln!("{}", e.user_message()),
            },
        }
    }

    Ok(())
}

fn prediction_session(feed: FeedConfig) -> anyhow::Result<PredictionSession> {
    let adapter = PriceFeedAdapter::from_config(feed)?;
    Ok(PredictionSession::new(adapter, AnalysisGenerator::new()?))
}

fn print_markets(board: &MarketBoard, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&markets::markets_json(board.markets()))?);
    } else {
        println!("{}", markets::render_markets(board.markets()));
    }
    Ok(())
}

/// Run one contract command; `true` when the refreshed listing should be printed
async fn market_action(command: &Command, ctx: &MarketContext, board: &mut MarketBoard) -> anyhow::Result<bool> {
    match command {
        Command::Create { question } => {
            board.create_market(ctx, question).await?;
            Ok(true)
        }
        Command::Bet {
            market_id,
            outcome,
            amount,
        } => {
            board.refresh(ctx).await?;
            board.place_bet(ctx, *market_id, *outcome, amount).await?;
            println!("Placed {} ETH on {} for market #{}", amount.trim(), outcome, market_id);
            Ok(false)
        }
        _ => {
            board.refresh(ctx).await?;
            Ok(true)
        }
    }
}

/// `markets`, `create` and `bet` against the configured contract
async fn run_market_command(args: &Args, feed: &FeedConfig) -> anyhow::Result<()> {
    let settings = ContractSettings::from_env(args.contract.as_deref())?;
    let mut ctx = markets::connect(&feed.rpc_url, &settings)?;
    let mut board = MarketBoard::new();

    let result = market_action(&args.command, &ctx, &mut board).await;
    ctx.teardown();

    if result? {
        print_markets(&board, args.json)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = market_utils::Config::from_env()?;
    market_utils::init_tracing_with(&config);

    let args = Args::parse();
    info!("Starting market-cli ({})", config.environment);

    let feed = feed_config(&args)?;
    if matches!(
        args.command,
        Command::Markets | Command::Create { .. } | Command::Bet { .. }
    ) {
        return run_market_command(&args, &feed).await;
    }

    let session = prediction_session(feed)?;

    match &args.command {
        Command::Prices => {
            let prices = session.refresh_prices().await?;
            print_prices(&prices, args.json);
        }
        Command::Analyze {
            question,
            eth_price,
            btc_price,
        } => {
            match (eth_price, btc_price) {
                (Some(eth), Some(btc)) => session.set_prices(manual_prices(eth, btc)?).await,
                _ => {
                    session.refresh_prices().await?;
                }
            }

            let report = session.analyze(question).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{report}");
            }
        }
        Command::Repl => run_repl(&session).await?,
        Command::Markets | Command::Create { .. } | Command::Bet { .. } => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "market-cli",
            "analyze",
            "Will BTC hit 100k?",
            "--eth-price",
            "2500",
            "--btc-price",
            "60000",
        ])
        .unwrap();

        match args.command {
            Command::Analyze {
                question,
                eth_price,
                btc_price,
            } => {
                assert_eq!(question, "Will BTC hit 100k?");
                assert_eq!(eth_price.as_deref(), Some("2500"));
                assert_eq!(btc_price.as_deref(), Some("60000"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_manual_prices_require_both() {
        let result = Args::try_parse_from(["market-cli", "analyze", "q", "--eth-price", "2500"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_manual_prices_validation() {
        let prices = manual_prices("2500", "60000.5").unwrap();
        assert_eq!(prices.btc_price(), "60000.50");

        assert!(manual_prices("abc", "60000").is_err());
        assert!(manual_prices("2500", "0").is_err());
        assert!(manual_prices("-1", "60000").is_err());
    }

    #[test]
    fn test_bet_args_parse() {
        let args = Args::try_parse_from([
            "market-cli",
            "--contract",
            "0x5FbDB2315678afecb367f032d93F642f64180aa3",
            "bet",
            "2",
            "yes",
            "0.25",
        ])
        .unwrap();

        assert_eq!(
            args.contract.as_deref(),
            Some("0x5FbDB2315678afecb367f032d93F642f64180aa3")
        );
        match args.command {
            Command::Bet {
                market_id,
                outcome,
                amount,
            } => {
                assert_eq!(market_id, 2);
                assert_eq!(outcome, Outcome::Yes);
                assert_eq!(amount, "0.25");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_bet_rejects_bad_outcome() {
        assert!(Args::try_parse_from(["market-cli", "bet", "0", "maybe", "1"]).is_err());
        assert!(Args::try_parse_from(["market-cli", "bet", "first", "yes", "1"]).is_err());
    }

    #[test]
    fn test_create_and_markets_parse() {
        let args = Args::try_parse_from(["market-cli", "create", "Will ETH hit 10k?"]).unwrap();
        assert!(matches!(args.command, Command::Create { question } if question == "Will ETH hit 10k?"));

        let args = Args::try_parse_from(["market-cli", "markets", "--json"]).unwrap();
        assert!(matches!(args.command, Command::Markets));
        assert!(args.json);
    }

    #[test]
    fn test_feed_config_overrides() {
        let args = Args::try_parse_from([
            "market-cli",
            "--rpc-url",
            "http://localhost:8545",
            "--timeout-secs",
            "3",
            "prices",
        ])
        .unwrap();

        let config = feed_config(&args).unwrap();
        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }
}

use clap::{Parser, Subcommand};
use clob_engine::Side;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "clob-cli")]
#[command(about = "Command line client for the exchange service")]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    server: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Submit {
        #[arg(short = 's', long)]
        symbol: String,
        #[arg(long, value_parser = parse_side)]
        side: Side,
        #[arg(short = 'p', long)]
        price: f64,
        #[arg(short = 'q', long)]
        quantity: u64,
    },
    Status {
        #[arg(short, long)]
        symbol: Option<String>,
    },
    Health,
    Symbols,
    Depth {
        #[arg(short, long)]
        symbol: String,
        #[arg(short, long, default_value = "10")]
        levels: usize,
    },
    Cancel {
        #[arg(short, long)]
        symbol: String,
        #[arg(short, long)]
        order_id: String,
    },
}

#[derive(Serialize)]
struct SubmitOrderRequest {
    side: Side,
    price: f64,
    quantity: u64,
}

#[derive(Deserialize)]
struct SubmitOrderResponse {
    order_id: u64,
    status: String,
    trades: Vec<Trade>,
}

#[derive(Deserialize)]
struct Trade {
    quantity: u64,
    price: f64,
}

#[derive(Deserialize)]
struct SymbolsResponse {
    symbols: Vec<String>,
}

#[derive(Deserialize)]
struct MarketDepth {
    symbol: String,
    bids: Vec<PriceLevel>,
    asks: Vec<PriceLevel>,
}

#[derive(Deserialize)]
struct PriceLevel {
    price: f64,
    quantity: u64,
}

fn parse_side(s: &str) -> Result<Side, String> {
    match s.to_lowercase().as_str() {
        "bid" | "buy" => Ok(Side::Buy),
        "ask" | "sell" => Ok(Side::Sell),
        _ => Err(format!("Invalid side: {s}. Use 'bid' or 'ask'")),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Submit { symbol, side, price, quantity } => {
            let request = SubmitOrderRequest { side, price, quantity };

            let response = client
                .post(format!("{}/symbols/{}/orders", cli.server, symbol))
                .json(&request)
                .send()
                .await?;

            if response.status().is_success() {
                let result: SubmitOrderResponse = response.json().await?;

                println!("Order ID: {}", result.order_id);
                println!("Status: {}", result.status);

                if !result.trades.is_empty() {
                    println!("Trades executed: {}", result.trades.len());
                    for trade in result.trades {
                        println!("  {} shares @ {}", trade.quantity, trade.price);
                    }
                }
            } else {
                println!("Error: {}", response.status());
                println!("{}", response.text().await?);
            }
        }

        Commands::Status { symbol } => match symbol {
            Some(sym) => {
                let response = client
                    .get(format!("{}/symbols/{}/orderbook", cli.server, sym))
                    .send()
                    .await?;

                if response.status().is_success() {
                    let depth: MarketDepth = response.json().await?;
                    println!("Symbol: {}", depth.symbol);
                    println!("Best Bid: {:?}", depth.bids.first().map(|l| l.price));
                    println!("Best Ask: {:?}", depth.asks.first().map(|l| l.price));
                    println!("Bid Levels: {}", depth.bids.len());
                    println!("Ask Levels: {}", depth.asks.len());
                } else {
                    println!("Error: {}", response.status());
                }
            }
            None => {
                let response = client.get(format!("{}/symbols", cli.server)).send().await?;

                if response.status().is_success() {
                    let symbols: SymbolsResponse = response.json().await?;
                    println!("Active symbols:");
                    for symbol in symbols.symbols {
                        let state_response = client
                            .get(format!("{}/symbols/{}/orderbook", cli.server, symbol))
                            .send()
                            .await?;

                        if state_response.status().is_success() {
                            let depth: MarketDepth = state_response.json().await?;
                            println!(
                                "  {}: bid={:?}, ask={:?}",
                                symbol,
                                depth.bids.first().map(|l| l.price),
                                depth.asks.first().map(|l| l.price)
                            );
                        }
                    }
                } else {
                    println!("Error: {}", response.status());
                }
            }
        },

        Commands::Health => {
            let response = client.get(format!("{}/health", cli.server)).send().await?;

            if response.status().is_success() {
                let health: serde_json::Value = response.json().await?;
                println!("{}", serde_json::to_string_pretty(&health)?);
            } else {
                println!("Error: {}", response.status());
            }
        }

        Commands::Symbols => {
            let response = client.get(format!("{}/symbols", cli.server)).send().await?;

            if response.status().is_success() {
                let symbols: SymbolsResponse = response.json().await?;
                for symbol in symbols.symbols {
                    println!("{symbol}");
                }
            } else {
                println!("Error: {}", response.status());
            }
        }

        Commands::Depth { symbol, levels } => {
            let response = client
                .get(format!("{}/symbols/{}/depth?levels={}", cli.server, symbol, levels))
                .send()
                .await?;

            if response.status().is_success() {
                let depth: MarketDepth = response.json().await?;

                println!("Market Depth for {}", depth.symbol);
                println!("\nAsks:");
                for (i, level) in depth.asks.iter().enumerate() {
                    println!("  {}: {} @ {}", i + 1, level.quantity, level.price);
                }

                println!("\nBids:");
                for (i, level) in depth.bids.iter().enumerate() {
                    println!("  {}: {} @ {}", i + 1, level.quantity, level.price);
                }
            } else {
                println!("Error: {}", response.status());
            }
        }

        Commands::Cancel { symbol, order_id } => {
            let response = client
                .delete(format!("{}/symbols/{}/orders/{}", cli.server, symbol, order_id))
                .send()
                .await?;

            if response.status().is_success() {
                let result: serde_json::Value = response.json().await?;
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("Error: {}", response.status());
                println!("{}", response.text().await?);
            }
        }
    }

    Ok(())
}

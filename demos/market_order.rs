use binance_rest::{BinanceClient, BinanceError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // Reads BINANCE_API_KEY / BINANCE_API_SECRET from the environment
    let client = BinanceClient::from_env()?;

    println!("=== Balances ===");
    match client.balance().await {
        Ok(balances) => {
            for (asset, balance) in balances.iter().take(10) {
                println!("  {}: free {} locked {}", asset, balance.free, balance.locked);
            }
        }
        Err(e) => eprintln!("Failed to fetch balances: {}", e),
    }

    // Test-mode order: validated by the exchange but never executed.
    // A successful validation returns an empty object.
    println!("\n=== Test market buy ===");
    match client.buy_market("ZECBTC", "10", true).await {
        Ok(response) => println!("Order accepted for validation: {}", response),
        Err(BinanceError::Exchange { code, message }) => {
            eprintln!("Exchange rejected the order ({}): {}", code, message);
        }
        Err(e) => eprintln!("Order failed: {}", e),
    }

    Ok(())
}

use binance_rest::{BinanceClient, BinanceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // Public market data needs no credentials
    let client = BinanceClient::new(BinanceConfig::read_only())?;

    println!("=== Single price ===");
    match client.price("BTCUSDT").await {
        Ok(price) => println!("BTCUSDT last price: {}", price),
        Err(e) => eprintln!("Failed to fetch BTCUSDT price: {}", e),
    }

    println!("\n=== All prices ===");
    match client.prices().await {
        Ok(prices) => {
            println!("Fetched {} prices", prices.len());
            for (symbol, price) in prices.iter().take(10) {
                println!("  {} = {}", symbol, price);
            }
        }
        Err(e) => eprintln!("Failed to fetch prices: {}", e),
    }

    println!("\n=== Order book tickers ===");
    match client.markets().await {
        Ok(markets) => {
            println!("Fetched {} book tickers", markets.len());
            if let Some(btc) = markets.get("BTCUSDT") {
                println!(
                    "  BTCUSDT bid {} x {} / ask {} x {}",
                    btc.bid_price, btc.bid_qty, btc.ask_price, btc.ask_qty
                );
            }
        }
        Err(e) => eprintln!("Failed to fetch book tickers: {}", e),
    }

    Ok(())
}

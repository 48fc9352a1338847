//! Simulation driver: staffs a shop, sends a stream of customers through it
//! and reports how many were served and how many were turned away.

use std::time::Duration;

use clap::Parser;
use rand::Rng;
use shop_actors::Barbershop;
use shop_core::{CustomerId, ShopConfig};

#[derive(Debug, Parser)]
#[command(name = "barbershop-sim", about = "Run a sleeping-barbers simulation")]
struct Args {
    /// Number of barbers on staff.
    #[arg(long, default_value_t = 1)]
    barbers: usize,

    /// Number of waiting chairs.
    #[arg(long, default_value_t = 3)]
    chairs: usize,

    /// Number of customers to send through the shop.
    #[arg(long, default_value_t = 10)]
    customers: u32,

    /// How long one cut takes, in milliseconds.
    #[arg(long, default_value_t = 100)]
    cut_millis: u64,

    /// Upper bound on the random delay between arrivals, in milliseconds.
    #[arg(long, default_value_t = 10)]
    arrival_jitter_millis: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = ShopConfig::new(args.barbers, args.chairs);
    let shop = Barbershop::open(config, Duration::from_millis(args.cut_millis)).await?;

    // Narrate the shop's event stream.
    let mut events = shop.subscribe();
    let narrator = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            tracing::info!("{}", event);
        }
    });

    let mut visits = Vec::with_capacity(args.customers as usize);
    for id in 0..args.customers {
        if args.arrival_jitter_millis > 0 {
            let delay = rand::thread_rng().gen_range(0..args.arrival_jitter_millis);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        let shop_ref = shop.shop().clone();
        visits.push(tokio::spawn(async move {
            shop_actors::visit(&shop_ref, CustomerId(id)).await
        }));
    }

    let mut served = 0u64;
    for visit in visits {
        if visit.await??.is_served() {
            served += 1;
        }
    }

    let dropped = shop.dropped_count().await?;
    shop.close().await?;
    narrator.abort();

    println!("# customers served = {}", served);
    println!("# customers who didn't receive a service = {}", dropped);
    Ok(())
}

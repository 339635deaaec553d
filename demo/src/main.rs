use futures_util::StreamExt;
use ordersys_application::dto::OrderInput;
use ordersys_application::{
    CreateOrderUseCase, InMemoryOrderRepository, InMemoryPublisher, ORDER_CREATED,
    OrderCreatedHandler,
};
use ordersys_events::{DispatcherConfig, EventDispatcher, InMemoryEventDispatcher};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use ulid::Ulid;

mod config;

use config::DemoConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default filter, e.g. RUST_LOG=debug cargo run -p demo
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,ordersys_events=debug")),
        )
        .init();

    let config = DemoConfig::from_env()?;

    let dispatcher = Arc::new(
        InMemoryEventDispatcher::builder()
            .config(DispatcherConfig {
                dispatch_timeout: config.dispatch_timeout,
            })
            .build(),
    );
    let publisher = Arc::new(InMemoryPublisher::new(64));
    let repository = Arc::new(InMemoryOrderRepository::new());

    dispatcher.register_handler(
        ORDER_CREATED,
        Arc::new(OrderCreatedHandler::with_exchange(
            publisher.clone(),
            config.exchange.clone(),
        )),
    )?;

    // Stand-in for a broker consumer.
    let mut inbox = publisher.subscribe();
    let consumer = tokio::spawn(async move {
        let mut received = 0usize;
        while let Some(msg) = inbox.next().await {
            match msg {
                Ok(msg) => {
                    received += 1;
                    tracing::info!(
                        exchange = %msg.exchange,
                        body = %String::from_utf8_lossy(&msg.body),
                        "message received"
                    );
                }
                Err(e) => tracing::warn!(error = %e, "consumer lagged"),
            }
        }
        received
    });

    let create_order = CreateOrderUseCase::new(repository.clone(), dispatcher.clone());

    for (price, tax) in [(100.0, 10.0), (42.5, 2.5), (9.99, 0.01)] {
        let out = create_order
            .execute(OrderInput {
                id: Ulid::new().to_string(),
                price,
                tax,
            })
            .await?;
        println!("created {} final_price={:.2}", out.id, out.final_price);
    }

    if let Err(e) = create_order
        .execute(OrderInput {
            id: Ulid::new().to_string(),
            price: -1.0,
            tax: 1.0,
        })
        .await
    {
        eprintln!("rejected as expected: {e}");
    }

    let published = publisher.published().len();
    drop(create_order);
    drop(dispatcher);
    drop(publisher);

    let received = consumer.await?;
    println!("published={published} received={received}");

    Ok(())
}

/// 内存分发器示例
/// 展示注册 → 扇出分发 → 汇合，以及默认吞掉错误与聚合错误两种模式
use anyhow::Result as AnyResult;
use ordersys_events::{
    DispatchError, DispatcherConfig, Event, EventDispatcher, EventHandler, GenericEvent,
    InMemoryEventDispatcher, JoinToken,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ============================================================================
// 处理器
// ============================================================================

struct PrintHandler {
    label: &'static str,
    delay: Duration,
}

#[async_trait::async_trait]
impl EventHandler for PrintHandler {
    fn handler_name(&self) -> &str {
        self.label
    }

    async fn handle(&self, event: Arc<dyn Event>, done: JoinToken) -> AnyResult<()> {
        tokio::time::sleep(self.delay).await;
        println!("[{}] {} -> {}", self.label, event.name(), event.payload());
        done.done();
        Ok(())
    }
}

struct RejectingHandler;

#[async_trait::async_trait]
impl EventHandler for RejectingHandler {
    fn handler_name(&self) -> &str {
        "rejecting"
    }

    async fn handle(&self, _event: Arc<dyn Event>, _done: JoinToken) -> AnyResult<()> {
        anyhow::bail!("broker unavailable")
    }
}

#[tokio::main]
async fn main() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let dispatcher = InMemoryEventDispatcher::builder()
        .config(DispatcherConfig {
            dispatch_timeout: Some(Duration::from_secs(5)),
        })
        .build();

    dispatcher.register_handler(
        "order.created",
        Arc::new(PrintHandler {
            label: "audit",
            delay: Duration::from_millis(30),
        }),
    )?;
    dispatcher.register_handler(
        "order.created",
        Arc::new(PrintHandler {
            label: "mailer",
            delay: Duration::from_millis(10),
        }),
    )?;
    dispatcher.register_handler("order.created", Arc::new(RejectingHandler))?;

    let event: Arc<dyn Event> = Arc::new(GenericEvent::new(
        "order.created",
        json!({"id": "1", "price": 100.0}),
    ));

    // 默认模式：处理器错误只记录日志
    dispatcher.dispatch_event(event.clone()).await?;
    println!("dispatch_event returned Ok");

    // 聚合模式：返回所有失败的处理器
    match dispatcher.dispatch_collect(event).await {
        Err(DispatchError::HandlerFailures { failures, .. }) => {
            for f in failures {
                eprintln!("handler failed: {f}");
            }
        }
        other => println!("dispatch_collect: {other:?}"),
    }

    Ok(())
}

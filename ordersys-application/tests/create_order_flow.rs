use futures_util::StreamExt;
use ordersys_application::dto::OrderInput;
use ordersys_application::error::AppError;
use ordersys_application::order_repository::OrderRepository;
use ordersys_application::publisher::{MessagePublisher, OutboundMessage};
use ordersys_application::{
    CreateOrderUseCase, InMemoryOrderRepository, InMemoryPublisher, ORDER_CREATED,
    OrderCreatedHandler,
};
use ordersys_events::{EventDispatcher, EventHandler, InMemoryEventDispatcher};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

struct FlakyPublisher {
    attempts: AtomicUsize,
}

#[async_trait::async_trait]
impl MessagePublisher for FlakyPublisher {
    async fn publish(&self, _message: OutboundMessage) -> anyhow::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        anyhow::bail!("connection reset by broker")
    }
}

fn input(id: &str) -> OrderInput {
    OrderInput {
        id: id.into(),
        price: 100.0,
        tax: 0.5,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn created_order_is_published_before_execute_returns() {
    let repo = Arc::new(InMemoryOrderRepository::new());
    let publisher = Arc::new(InMemoryPublisher::new(16));
    let dispatcher = Arc::new(InMemoryEventDispatcher::new());
    let mut stream = publisher.subscribe();

    dispatcher
        .register_handler(
            ORDER_CREATED,
            Arc::new(OrderCreatedHandler::new(publisher.clone())),
        )
        .unwrap();

    let uc = CreateOrderUseCase::new(repo.clone(), dispatcher.clone());
    let out = uc.execute(input("order-1")).await.unwrap();
    assert_eq!(out.final_price, 100.5);

    // 分发已汇合：消息此刻必然已发布
    let published = publisher.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].exchange, "amqp.direct");

    let msg = tokio::time::timeout(Duration::from_secs(1), stream.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let body: Value = serde_json::from_slice(&msg.body).unwrap();
    assert_eq!(
        body,
        json!({"id": "order-1", "price": 100.0, "tax": 0.5, "final_price": 100.5})
    );
    assert!(repo.find("order-1").await.unwrap().is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn publish_failure_does_not_fail_the_use_case() {
    let repo = Arc::new(InMemoryOrderRepository::new());
    let dispatcher = Arc::new(InMemoryEventDispatcher::new());
    let flaky = Arc::new(FlakyPublisher {
        attempts: AtomicUsize::new(0),
    });
    dispatcher
        .register_handler(ORDER_CREATED, Arc::new(OrderCreatedHandler::new(flaky.clone())))
        .unwrap();

    let uc = CreateOrderUseCase::new(repo.clone(), dispatcher);
    uc.execute(input("order-2")).await.unwrap();

    assert_eq!(flaky.attempts.load(Ordering::SeqCst), 1);
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn duplicate_order_is_rejected_without_publishing_twice() {
    let repo = Arc::new(InMemoryOrderRepository::new());
    let publisher = Arc::new(InMemoryPublisher::new(16));
    let dispatcher = Arc::new(InMemoryEventDispatcher::new());
    let handler: Arc<dyn EventHandler> = Arc::new(OrderCreatedHandler::new(publisher.clone()));
    dispatcher
        .register_handler(ORDER_CREATED, handler.clone())
        .unwrap();
    // 同一处理器实例重复注册被拒绝
    assert!(dispatcher.register_handler(ORDER_CREATED, handler).is_err());

    let uc = CreateOrderUseCase::new(repo, dispatcher);
    uc.execute(input("order-3")).await.unwrap();
    let err = uc.execute(input("order-3")).await.unwrap_err();

    assert!(matches!(err, AppError::Repository(_)));
    assert_eq!(publisher.published().len(), 1);
}

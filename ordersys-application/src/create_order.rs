//! 创建订单用例
//!
//! 校验 → 计算最终价格 → 持久化 → 分发 `order.created` → 返回输出 DTO。
//! 分发阶段的错误只记录日志，订单一旦保存即视为创建成功。
//!
use crate::dto::{OrderInput, OrderOutput, to_payload};
use crate::error::AppResult;
use crate::order::Order;
use crate::order_created::OrderCreated;
use crate::order_repository::OrderRepository;
use ordersys_events::{Event, EventDispatcher};
use std::sync::Arc;

pub struct CreateOrderUseCase {
    repository: Arc<dyn OrderRepository>,
    dispatcher: Arc<dyn EventDispatcher>,
}

impl CreateOrderUseCase {
    pub fn new(repository: Arc<dyn OrderRepository>, dispatcher: Arc<dyn EventDispatcher>) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }

    pub async fn execute(&self, input: OrderInput) -> AppResult<OrderOutput> {
        let mut order = Order::new(input.id, input.price, input.tax)?;
        order.calculate_final_price()?;
        self.repository.save(&order).await?;

        let output = OrderOutput::from(&order);

        let mut event = OrderCreated::new();
        event.set_payload(to_payload(&output)?);
        // 订单已落库：分发失败（如超时）只记录，不改变用例结果
        if let Err(err) = self.dispatcher.dispatch_event(Arc::new(event)).await {
            tracing::warn!(order_id = %output.id, error = %err, "order.created dispatch failed");
        }

        tracing::info!(
            order_id = %output.id,
            final_price = output.final_price,
            "order created"
        );

        Ok(output)
    }
}

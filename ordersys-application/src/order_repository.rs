//! 订单仓储（OrderRepository）
//!
//! 应用层只依赖该协议；`InMemoryOrderRepository` 用于测试与本地演示。
//!
use crate::error::{AppError, AppResult};
use crate::order::Order;
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 保存新订单；相同 id 已存在时返回 `AppError::Repository`
    async fn save(&self, order: &Order) -> AppResult<()>;

    async fn find(&self, id: &str) -> AppResult<Option<Order>>;

    async fn count(&self) -> AppResult<usize>;
}

/// 基于内存的订单仓储
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: DashMap<String, Order>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: &Order) -> AppResult<()> {
        match self.orders.entry(order.id().to_string()) {
            Entry::Occupied(_) => Err(AppError::Repository(format!(
                "order already exists: {}",
                order.id()
            ))),
            Entry::Vacant(slot) => {
                slot.insert(order.clone());
                Ok(())
            }
        }
    }

    async fn find(&self, id: &str) -> AppResult<Option<Order>> {
        Ok(self.orders.get(id).map(|o| o.value().clone()))
    }

    async fn count(&self) -> AppResult<usize> {
        Ok(self.orders.len())
    }
}

use crate::error::AppResult;
use crate::order::Order;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 数据传输对象（DTO）
///
/// - 作为应用层的输出载体，面向接口/外部系统序列化友好；
/// - 与领域模型解耦，避免将领域对象直接暴露到接口层。
pub trait Dto: Serialize + Send + Sync + 'static {}

/// 将 DTO 编码为事件载荷
pub fn to_payload<T: Dto>(dto: &T) -> AppResult<Value> {
    Ok(serde_json::to_value(dto)?)
}

/// 创建订单的输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderInput {
    pub id: String,
    pub price: f64,
    pub tax: f64,
}

/// 创建订单的输出，同时作为 `order.created` 事件载荷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderOutput {
    pub id: String,
    pub price: f64,
    pub tax: f64,
    pub final_price: f64,
}

impl Dto for OrderOutput {}

impl From<&Order> for OrderOutput {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id().to_string(),
            price: order.price(),
            tax: order.tax(),
            final_price: order.final_price(),
        }
    }
}

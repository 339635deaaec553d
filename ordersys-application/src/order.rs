//! 订单实体
//!
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: String,
    price: f64,
    tax: f64,
    final_price: f64,
}

impl Order {
    /// 创建并校验订单；`final_price` 需调用 `calculate_final_price` 计算
    pub fn new(id: impl Into<String>, price: f64, tax: f64) -> AppResult<Self> {
        let order = Self {
            id: id.into(),
            price,
            tax,
            final_price: 0.0,
        };
        order.validate()?;
        Ok(order)
    }

    /// `id` 非空，`price`、`tax` 为有限正数（NaN、无穷均视为非法）
    pub fn validate(&self) -> AppResult<()> {
        if self.id.trim().is_empty() {
            return Err(AppError::Validation("invalid id".into()));
        }
        if !(self.price.is_finite() && self.price > 0.0) {
            return Err(AppError::Validation("invalid price".into()));
        }
        if !(self.tax.is_finite() && self.tax > 0.0) {
            return Err(AppError::Validation("invalid tax".into()));
        }
        Ok(())
    }

    pub fn calculate_final_price(&mut self) -> AppResult<()> {
        self.validate()?;
        let final_price = self.price + self.tax;
        if !final_price.is_finite() {
            return Err(AppError::Validation("invalid final price".into()));
        }
        self.final_price = final_price;
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn tax(&self) -> f64 {
        self.tax
    }

    pub fn final_price(&self) -> f64 {
        self.final_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_id() {
        let err = Order::new("", 10.0, 2.0).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "invalid id"));
    }

    #[test]
    fn rejects_non_positive_price_and_tax() {
        assert!(matches!(
            Order::new("1", 0.0, 2.0),
            Err(AppError::Validation(ref m)) if m == "invalid price"
        ));
        assert!(matches!(
            Order::new("1", f64::NAN, 2.0),
            Err(AppError::Validation(ref m)) if m == "invalid price"
        ));
        assert!(matches!(
            Order::new("1", 10.0, -1.0),
            Err(AppError::Validation(ref m)) if m == "invalid tax"
        ));
    }

    #[test]
    fn rejects_infinite_price_and_tax() {
        assert!(matches!(
            Order::new("1", f64::INFINITY, 2.0),
            Err(AppError::Validation(ref m)) if m == "invalid price"
        ));
        assert!(matches!(
            Order::new("1", 10.0, f64::INFINITY),
            Err(AppError::Validation(ref m)) if m == "invalid tax"
        ));
    }

    #[test]
    fn overflowing_final_price_is_rejected() {
        let mut order = Order::new("1", f64::MAX, f64::MAX).unwrap();
        let err = order.calculate_final_price().unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "invalid final price"));
        assert_eq!(order.final_price(), 0.0);
    }

    #[test]
    fn final_price_is_price_plus_tax() {
        let mut order = Order::new("1", 10.0, 2.0).unwrap();
        assert_eq!(order.final_price(), 0.0);
        order.calculate_final_price().unwrap();
        assert_eq!(order.final_price(), 12.0);
    }
}

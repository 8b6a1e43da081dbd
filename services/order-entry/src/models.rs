use serde::{Deserialize, Serialize};
use types::errors::DomainError;
use types::ids::{CompanyCode, UserId};
use types::numeric::{Price, Quantity};
use types::order::{PriceType, Side};

use crate::error::OrderError;

/// What the user filled in on the order panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderForm {
    pub side: Side,
    pub price_type: PriceType,
    /// Ignored for market orders.
    pub price: i64,
    pub quantity: i64,
}

impl OrderForm {
    pub fn limit(side: Side, price: i64, quantity: i64) -> Self {
        Self {
            side,
            price_type: PriceType::Limit,
            price,
            quantity,
        }
    }

    pub fn market(side: Side, quantity: i64) -> Self {
        Self {
            side,
            price_type: PriceType::Market,
            price: 0,
            quantity,
        }
    }
}

/// Body of `POST /api/v1/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub company_code: CompanyCode,
    #[serde(rename = "type")]
    pub side: Side,
    pub quantity: Quantity,
    /// 0 for market orders.
    pub price: Price,
    pub user_id: UserId,
}

impl OrderRequest {
    /// Validate the form and build the wire request.
    pub fn from_form(
        company_code: CompanyCode,
        user_id: UserId,
        form: &OrderForm,
    ) -> Result<Self, OrderError> {
        if company_code.is_unknown() {
            return Err(DomainError::InvalidCompanyCode(company_code.to_string()).into());
        }
        if form.quantity <= 0 {
            return Err(DomainError::InvalidQuantity(form.quantity).into());
        }
        let price = match form.price_type {
            PriceType::Limit => Price::try_positive(form.price)?,
            PriceType::Market => Price::ZERO,
        };

        Ok(Self {
            company_code,
            side: form.side,
            quantity: Quantity::try_new(form.quantity)?,
            price,
            user_id,
        })
    }

    pub fn is_market(&self) -> bool {
        self.price.is_zero()
    }
}

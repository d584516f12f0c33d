//! Cart domain types and the cart total computation.

use serde::Serialize;

use bazaar_core::{CartId, CartItemId, CartStatus, Price, ProductId, UserId};

/// A customer's cart. At most one `active` cart exists per customer,
/// enforced by a partial unique index.
#[derive(Debug, Clone)]
pub struct Cart {
    pub id: CartId,
    pub customer_id: UserId,
    pub status: CartStatus,
}

/// The product fields embedded in cart responses.
#[derive(Debug, Clone, Serialize)]
pub struct CartProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub url: String,
    pub sold: bool,
}

/// A cart line item joined with its product's current state.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemDetail {
    pub id: CartItemId,
    pub quantity: i32,
    /// Price captured when the item was added.
    pub price: Price,
    pub product: CartProduct,
}

/// Sum of current product price times quantity over all line items,
/// rounded to two decimal places.
#[must_use]
pub fn cart_total(items: &[CartItemDetail]) -> Price {
    items
        .iter()
        .map(|item| item.product.price.times(item.quantity))
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn price(s: &str) -> Price {
        Price::new(s.parse::<Decimal>().unwrap())
    }

    fn item(id: i32, current_price: &str, quantity: i32) -> CartItemDetail {
        CartItemDetail {
            id: CartItemId::new(id),
            quantity,
            price: price(current_price),
            product: CartProduct {
                id: ProductId::new(id),
                name: format!("item {id}"),
                price: price(current_price),
                url: String::new(),
                sold: false,
            },
        }
    }

    #[test]
    fn test_total_of_empty_cart_is_zero() {
        assert_eq!(cart_total(&[]), Price::ZERO);
    }

    #[test]
    fn test_total_sums_current_product_prices() {
        let items = vec![item(1, "19.90", 1), item(2, "5.05", 1)];
        assert_eq!(cart_total(&items), price("24.95"));
    }

    #[test]
    fn test_total_multiplies_by_quantity() {
        let items = vec![item(1, "2.50", 3)];
        assert_eq!(cart_total(&items), price("7.50"));
    }

    #[test]
    fn test_total_uses_current_price_not_captured_price() {
        // The captured line-item price is stale; the total follows the
        // product's current price.
        let mut stale = item(1, "10.00", 1);
        stale.price = price("8.00");
        assert_eq!(cart_total(&[stale]), price("10.00"));
    }
}

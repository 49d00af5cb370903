use async_trait::async_trait;
use rust_decimal::Decimal;
use sensora_catalog::ProductRef;

use crate::cart::{Cart, CartLine};
use crate::customer::{Customer, NewCustomer};
use crate::CartResult;

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn create_customer(&self, input: NewCustomer) -> CartResult<Customer>;
    async fn get_customer(&self, id: i64) -> CartResult<Option<Customer>>;
    async fn list_customers(&self) -> CartResult<Vec<Customer>>;
}

/// Cart persistence. Writes are deliberately narrow: quantity updates touch
/// the quantity column only, and totals are written only when the caller
/// asks, so no hidden recomputation can creep in at this layer.
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn create_cart(&self, owner_id: i64) -> CartResult<Cart>;
    async fn get_cart(&self, id: i64) -> CartResult<Option<Cart>>;
    async fn list_carts(&self) -> CartResult<Vec<Cart>>;

    async fn add_line(
        &self,
        cart_id: i64,
        customer_id: i64,
        product: ProductRef,
        qty: i32,
        total_price: Decimal,
    ) -> CartResult<CartLine>;
    async fn list_lines(&self) -> CartResult<Vec<CartLine>>;
    async fn get_line(&self, line_id: i64) -> CartResult<Option<CartLine>>;
    async fn set_line_qty(&self, line_id: i64, qty: i32) -> CartResult<()>;
    async fn set_line_total(&self, line_id: i64, total_price: Decimal) -> CartResult<()>;
    async fn remove_line(&self, line_id: i64) -> CartResult<()>;

    async fn save_totals(
        &self,
        cart_id: i64,
        total_products: i32,
        total_price: Decimal,
    ) -> CartResult<()>;
}

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use sensora_cart::cart::{Cart, CartLine};
use sensora_cart::customer::{Customer, NewCustomer};
use sensora_cart::repository::{CartRepository, CustomerRepository};
use sensora_cart::{CartError, CartResult};
use sensora_catalog::product::{ProductKind, ProductRef};

pub struct PgCartStore {
    pool: PgPool,
}

impl PgCartStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage(err: sqlx::Error) -> CartError {
    CartError::Storage(Box::new(err))
}

// Internal structs for type-safe querying

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    user_id: Uuid,
    phone: String,
    company: String,
    legal_address: String,
    actual_address: String,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            user_id: row.user_id,
            phone: row.phone,
            company: row.company,
            legal_address: row.legal_address,
            actual_address: row.actual_address,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CartRow {
    id: i64,
    owner_id: i64,
    total_products: i32,
    total_price: Decimal,
}

#[derive(sqlx::FromRow)]
struct CartLineRow {
    id: i64,
    customer_id: i64,
    cart_id: i64,
    product_kind: String,
    product_id: i64,
    qty: i32,
    total_price: Decimal,
}

impl TryFrom<CartLineRow> for CartLine {
    type Error = CartError;

    fn try_from(row: CartLineRow) -> Result<Self, Self::Error> {
        let kind = ProductKind::from_name(&row.product_kind).ok_or_else(|| {
            CartError::Storage(
                format!("cart line {} has unknown product kind {:?}", row.id, row.product_kind)
                    .into(),
            )
        })?;
        Ok(CartLine {
            id: row.id,
            customer_id: row.customer_id,
            cart_id: row.cart_id,
            product: ProductRef {
                kind,
                id: row.product_id,
            },
            qty: row.qty,
            total_price: row.total_price,
        })
    }
}

const CUSTOMER_COLS: &str = "id, user_id, phone, company, legal_address, actual_address";
const LINE_COLS: &str = "id, customer_id, cart_id, product_kind, product_id, qty, total_price";

impl PgCartStore {
    async fn lines_for_cart(&self, cart_id: i64) -> CartResult<Vec<CartLine>> {
        let sql = format!("SELECT {LINE_COLS} FROM cart_products WHERE cart_id = $1 ORDER BY id");
        let rows: Vec<CartLineRow> = sqlx::query_as(&sql)
            .bind(cart_id)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    fn assemble(&self, row: CartRow, lines: Vec<CartLine>) -> Cart {
        Cart {
            id: row.id,
            owner_id: row.owner_id,
            lines,
            total_products: row.total_products,
            total_price: row.total_price,
        }
    }
}

#[async_trait]
impl CustomerRepository for PgCartStore {
    async fn create_customer(&self, input: NewCustomer) -> CartResult<Customer> {
        let sql = format!(
            "INSERT INTO customers (user_id, phone, company, legal_address, actual_address) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {CUSTOMER_COLS}"
        );
        let row: CustomerRow = sqlx::query_as(&sql)
            .bind(input.user_id)
            .bind(&input.phone)
            .bind(&input.company)
            .bind(&input.legal_address)
            .bind(&input.actual_address)
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;
        Ok(row.into())
    }

    async fn get_customer(&self, id: i64) -> CartResult<Option<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLS} FROM customers WHERE id = $1");
        let row: Option<CustomerRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;
        Ok(row.map(Into::into))
    }

    async fn list_customers(&self) -> CartResult<Vec<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLS} FROM customers ORDER BY id");
        let rows: Vec<CustomerRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CartRepository for PgCartStore {
    async fn create_cart(&self, owner_id: i64) -> CartResult<Cart> {
        let row: CartRow = sqlx::query_as(
            "INSERT INTO carts (owner_id) VALUES ($1) \
             RETURNING id, owner_id, total_products, total_price",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(storage)?;
        Ok(self.assemble(row, Vec::new()))
    }

    async fn get_cart(&self, id: i64) -> CartResult<Option<Cart>> {
        let row: Option<CartRow> = sqlx::query_as(
            "SELECT id, owner_id, total_products, total_price FROM carts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;
        match row {
            Some(row) => {
                let lines = self.lines_for_cart(row.id).await?;
                Ok(Some(self.assemble(row, lines)))
            }
            None => Ok(None),
        }
    }

    async fn list_carts(&self) -> CartResult<Vec<Cart>> {
        let rows: Vec<CartRow> =
            sqlx::query_as("SELECT id, owner_id, total_products, total_price FROM carts ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(storage)?;
        let mut carts = Vec::with_capacity(rows.len());
        for row in rows {
            let lines = self.lines_for_cart(row.id).await?;
            carts.push(self.assemble(row, lines));
        }
        Ok(carts)
    }

    async fn add_line(
        &self,
        cart_id: i64,
        customer_id: i64,
        product: ProductRef,
        qty: i32,
        total_price: Decimal,
    ) -> CartResult<CartLine> {
        let sql = format!(
            "INSERT INTO cart_products (customer_id, cart_id, product_kind, product_id, qty, total_price) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {LINE_COLS}"
        );
        let row: CartLineRow = sqlx::query_as(&sql)
            .bind(customer_id)
            .bind(cart_id)
            .bind(product.kind.name())
            .bind(product.id)
            .bind(qty)
            .bind(total_price)
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;
        row.try_into()
    }

    async fn list_lines(&self) -> CartResult<Vec<CartLine>> {
        let sql = format!("SELECT {LINE_COLS} FROM cart_products ORDER BY id");
        let rows: Vec<CartLineRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get_line(&self, line_id: i64) -> CartResult<Option<CartLine>> {
        let sql = format!("SELECT {LINE_COLS} FROM cart_products WHERE id = $1");
        let row: Option<CartLineRow> = sqlx::query_as(&sql)
            .bind(line_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;
        row.map(TryInto::try_into).transpose()
    }

    async fn set_line_qty(&self, line_id: i64, qty: i32) -> CartResult<()> {
        let result = sqlx::query("UPDATE cart_products SET qty = $1 WHERE id = $2")
            .bind(qty)
            .bind(line_id)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        if result.rows_affected() == 0 {
            return Err(CartError::LineNotFound(line_id));
        }
        Ok(())
    }

    async fn set_line_total(&self, line_id: i64, total_price: Decimal) -> CartResult<()> {
        let result = sqlx::query("UPDATE cart_products SET total_price = $1 WHERE id = $2")
            .bind(total_price)
            .bind(line_id)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        if result.rows_affected() == 0 {
            return Err(CartError::LineNotFound(line_id));
        }
        Ok(())
    }

    async fn remove_line(&self, line_id: i64) -> CartResult<()> {
        sqlx::query("DELETE FROM cart_products WHERE id = $1")
            .bind(line_id)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(())
    }

    async fn save_totals(
        &self,
        cart_id: i64,
        total_products: i32,
        total_price: Decimal,
    ) -> CartResult<()> {
        let result =
            sqlx::query("UPDATE carts SET total_products = $1, total_price = $2 WHERE id = $3")
                .bind(total_products)
                .bind(total_price)
                .bind(cart_id)
                .execute(&self.pool)
                .await
                .map_err(storage)?;
        if result.rows_affected() == 0 {
            return Err(CartError::CartNotFound(cart_id));
        }
        Ok(())
    }
}

//! Orders service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use storefront::orders::OrderStatus;
use tracing::info;

use crate::{
    auth::AuthUser,
    documents::{
        Direction, Document, DocumentSnapshot, DocumentStore, DocumentStoreError, ORDERS, Query,
        WriteBatch, decode,
    },
    domain::{
        orders::{
            data::NewOrder,
            errors::OrdersServiceError,
            records::{Order, OrderId, OrderRecord},
        },
        products::{ProductsService, records::ProductId},
    },
};

fn order(snapshot: &DocumentSnapshot) -> Result<Order, OrdersServiceError> {
    let id = snapshot
        .id
        .parse::<OrderId>()
        .map_err(|error| DocumentStoreError::Malformed {
            collection: snapshot.collection.clone(),
            id: snapshot.id.clone(),
            source: serde::de::Error::custom(format!("order id is not a uuid: {error}")),
        })?;

    Ok(Order::from_record(id, decode::<OrderRecord>(snapshot)?))
}

pub struct DocumentOrdersService {
    documents: Arc<dyn DocumentStore>,
    products: Arc<dyn ProductsService>,
}

impl DocumentOrdersService {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>, products: Arc<dyn ProductsService>) -> Self {
        Self {
            documents,
            products,
        }
    }

    async fn list(&self, query: Query) -> Result<Vec<Order>, OrdersServiceError> {
        self.documents
            .query(query.order_by("placedAt", Direction::Descending))
            .await?
            .iter()
            .map(order)
            .collect()
    }
}

#[async_trait]
impl OrdersService for DocumentOrdersService {
    async fn list_all(&self) -> Result<Vec<Order>, OrdersServiceError> {
        self.list(Query::collection(ORDERS)).await
    }

    async fn list_for_buyer(&self, user: &AuthUser) -> Result<Vec<Order>, OrdersServiceError> {
        self.list(Query::collection(ORDERS).where_eq("userId", user.id.to_string()))
            .await
    }

    async fn get(&self, id: OrderId) -> Result<Order, OrdersServiceError> {
        let snapshot = self
            .documents
            .get(ORDERS, &id.to_string())
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        order(&snapshot)
    }

    async fn place_order(
        &self,
        user: &AuthUser,
        product: ProductId,
        quantity: u32,
    ) -> Result<Order, OrdersServiceError> {
        if quantity == 0 {
            return Err(OrdersServiceError::InvalidQuantity);
        }

        let product = self.products.get(product).await?;

        let new_order = NewOrder {
            product_id: Some(product.id),
            quantity,
            ..NewOrder::placed(user, &product.name, product.price.times(quantity))
        };

        let mut batch = WriteBatch::new();

        let id = new_order.stage(&mut batch)?;

        self.documents.commit(batch).await?;

        info!(order = %id, buyer = %user.id, quantity, "placed order");

        self.get(id).await
    }

    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), OrdersServiceError> {
        let mut fields = Document::new();

        fields.insert("status".to_string(), status.as_str().into());

        self.documents
            .update(ORDERS, &id.to_string(), fields)
            .await?;

        info!(order = %id, %status, "updated order status");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Retrieve every order, newest first.
    async fn list_all(&self) -> Result<Vec<Order>, OrdersServiceError>;

    /// Retrieve the orders `user` placed, newest first.
    async fn list_for_buyer(&self, user: &AuthUser) -> Result<Vec<Order>, OrdersServiceError>;

    /// Retrieve a single order.
    async fn get(&self, id: OrderId) -> Result<Order, OrdersServiceError>;

    /// Place a single order for `quantity` units of a catalog product.
    async fn place_order(
        &self,
        user: &AuthUser,
        product: ProductId,
        quantity: u32,
    ) -> Result<Order, OrdersServiceError>;

    /// Change an order's status.
    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use storefront::prices::Price;
    use testresult::TestResult;

    use crate::{
        auth::UserId,
        documents::MemoryDocumentStore,
        domain::products::{DocumentProductsService, data::NewProduct},
    };

    use super::*;

    struct Fixture {
        documents: Arc<MemoryDocumentStore>,
        products: Arc<DocumentProductsService>,
        orders: DocumentOrdersService,
    }

    fn fixture() -> Fixture {
        let documents = Arc::new(MemoryDocumentStore::new());
        let products = Arc::new(DocumentProductsService::new(documents.clone()));

        Fixture {
            orders: DocumentOrdersService::new(documents.clone(), products.clone()),
            documents,
            products,
        }
    }

    fn user(email: &str) -> AuthUser {
        AuthUser {
            id: UserId::new(),
            email: email.to_string(),
        }
    }

    async fn thali(fixture: &Fixture) -> Result<ProductId, OrdersServiceError> {
        let product = fixture
            .products
            .upload(
                &user("cook@example.com"),
                NewProduct {
                    name: "Thali".to_string(),
                    description: String::new(),
                    price: 25_000,
                },
            )
            .await?;

        Ok(product.id)
    }

    #[tokio::test]
    async fn place_order_prices_by_quantity() -> TestResult {
        let fixture = fixture();
        let buyer = user("asha@example.com");
        let product = thali(&fixture).await?;

        let order = fixture.orders.place_order(&buyer, product, 3).await?;

        assert_eq!(order.total_price, Price::new(75_000));
        assert_eq!(order.quantity, 3);
        assert_eq!(order.status, OrderStatus::Placed);
        assert_eq!(order.product_id, Some(product));
        assert_eq!(order.buyer_id, buyer.id);

        Ok(())
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected_without_writing() -> TestResult {
        let fixture = fixture();
        let product = thali(&fixture).await?;

        let result = fixture
            .orders
            .place_order(&user("asha@example.com"), product, 0)
            .await;

        assert!(matches!(result, Err(OrdersServiceError::InvalidQuantity)));
        assert_eq!(fixture.documents.count(ORDERS), 0);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_product_cannot_be_ordered() {
        let fixture = fixture();

        let result = fixture
            .orders
            .place_order(&user("asha@example.com"), ProductId::new(), 1)
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::Product(_))),
            "expected Product error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn buyers_see_only_their_orders_newest_first() -> TestResult {
        let fixture = fixture();
        let asha = user("asha@example.com");
        let ravi = user("ravi@example.com");
        let product = thali(&fixture).await?;

        let first = fixture.orders.place_order(&asha, product, 1).await?;
        fixture.orders.place_order(&ravi, product, 1).await?;
        let second = fixture.orders.place_order(&asha, product, 2).await?;

        let ids: Vec<OrderId> = fixture
            .orders
            .list_for_buyer(&asha)
            .await?
            .iter()
            .map(|order| order.id)
            .collect();

        assert_eq!(ids, vec![second.id, first.id]);
        assert_eq!(fixture.orders.list_all().await?.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn update_status_changes_only_the_status() -> TestResult {
        let fixture = fixture();
        let product = thali(&fixture).await?;

        let order = fixture
            .orders
            .place_order(&user("asha@example.com"), product, 1)
            .await?;

        fixture
            .orders
            .update_status(order.id, OrderStatus::Processing)
            .await?;

        let updated = fixture.orders.get(order.id).await?;

        assert_eq!(
            updated,
            Order {
                status: OrderStatus::Processing,
                ..order
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_status_of_unknown_order_is_not_found() {
        let fixture = fixture();

        let result = fixture
            .orders
            .update_status(OrderId::new(), OrderStatus::Completed)
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn orders_without_quantity_default_to_one() -> TestResult {
        let fixture = fixture();
        let buyer = user("asha@example.com");
        let id = OrderId::new();

        let data = serde_json::json!({
            "userId": buyer.id,
            "userEmail": buyer.email,
            "productName": "Chai",
            "totalPrice": 2_000,
            "status": "placed",
            "placedAt": 1_700_000_000_000_i64,
        });

        fixture
            .documents
            .set(ORDERS, &id.to_string(), data.as_object().cloned().unwrap_or_default())
            .await?;

        let order = fixture.orders.get(id).await?;

        assert_eq!(order.quantity, 1);
        assert_eq!(order.product_id, None);

        Ok(())
    }

    #[tokio::test]
    async fn non_uuid_order_ids_are_reported_as_malformed() -> TestResult {
        let fixture = fixture();
        let buyer = user("asha@example.com");

        let data = serde_json::json!({
            "userId": buyer.id,
            "userEmail": buyer.email,
            "productName": "Chai",
            "totalPrice": 2_000,
            "status": "placed",
            "placedAt": 1_700_000_000_000_i64,
        });

        fixture
            .documents
            .set(ORDERS, "legacy-1", data.as_object().cloned().unwrap_or_default())
            .await?;

        let result = fixture.orders.list_all().await;

        assert!(
            matches!(
                &result,
                Err(OrdersServiceError::Store(DocumentStoreError::Malformed { id, .. }))
                    if id == "legacy-1"
            ),
            "expected Malformed, got {result:?}"
        );

        Ok(())
    }
}

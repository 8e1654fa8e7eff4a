//! Products service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use storefront::prices::Price;
use tracing::info;

use crate::{
    auth::AuthUser,
    documents::{
        Direction, DocumentSnapshot, DocumentStore, PRODUCTS, Query, WriteBatch, decode, encode,
    },
    domain::products::{
        data::{NewProduct, NewProductRecord},
        errors::ProductsServiceError,
        records::{Product, ProductId, ProductRecord},
    },
};

fn product(snapshot: &DocumentSnapshot) -> Result<Product, ProductsServiceError> {
    let id = snapshot
        .id
        .parse::<ProductId>()
        .map_err(|_| ProductsServiceError::NotFound)?;

    Ok(Product::from_record(id, decode::<ProductRecord>(snapshot)?))
}

pub struct DocumentProductsService {
    documents: Arc<dyn DocumentStore>,
}

impl DocumentProductsService {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    async fn list(&self, query: Query) -> Result<Vec<Product>, ProductsServiceError> {
        self.documents
            .query(query.order_by("createdAt", Direction::Descending))
            .await?
            .iter()
            .map(product)
            .collect()
    }
}

#[async_trait]
impl ProductsService for DocumentProductsService {
    async fn upload(
        &self,
        user: &AuthUser,
        product: NewProduct,
    ) -> Result<Product, ProductsServiceError> {
        let name = product.name.trim();

        if name.is_empty() {
            return Err(ProductsServiceError::MissingRequiredData("product name"));
        }

        let id = ProductId::new();

        let record = NewProductRecord {
            user_id: user.id,
            user_email: &user.email,
            name,
            description: product.description.trim(),
            price: Price::new(product.price),
        };

        let mut batch = WriteBatch::new();

        batch.set_stamped(PRODUCTS, &id.to_string(), encode(&record)?, "createdAt");

        self.documents.commit(batch).await?;

        info!(product = %id, owner = %user.id, "uploaded product");

        self.get(id).await
    }

    async fn get(&self, id: ProductId) -> Result<Product, ProductsServiceError> {
        let snapshot = self
            .documents
            .get(PRODUCTS, &id.to_string())
            .await?
            .ok_or(ProductsServiceError::NotFound)?;

        product(&snapshot)
    }

    async fn list_all(&self) -> Result<Vec<Product>, ProductsServiceError> {
        self.list(Query::collection(PRODUCTS)).await
    }

    async fn list_for_owner(&self, user: &AuthUser) -> Result<Vec<Product>, ProductsServiceError> {
        self.list(Query::collection(PRODUCTS).where_eq("userId", user.id.to_string()))
            .await
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Add a product to the catalog on behalf of `user`.
    async fn upload(
        &self,
        user: &AuthUser,
        product: NewProduct,
    ) -> Result<Product, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get(&self, id: ProductId) -> Result<Product, ProductsServiceError>;

    /// Retrieve every product, newest first.
    async fn list_all(&self) -> Result<Vec<Product>, ProductsServiceError>;

    /// Retrieve the products `user` uploaded, newest first.
    async fn list_for_owner(&self, user: &AuthUser) -> Result<Vec<Product>, ProductsServiceError>;
}

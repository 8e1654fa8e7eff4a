//! Profiles service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use storefront::profiles::Role;
use tracing::info;

use crate::{
    auth::{AuthProvider, UserId},
    documents::{Document, DocumentStore, Query, USERS, WriteBatch, decode, encode},
    domain::profiles::{
        data::{NewProfile, ProfileUpdate},
        errors::ProfilesServiceError,
        records::{ProfileRecord, UserProfile},
    },
};

pub struct DocumentProfilesService {
    documents: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthProvider>,
}

impl DocumentProfilesService {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { documents, auth }
    }
}

#[async_trait]
impl ProfilesService for DocumentProfilesService {
    async fn register(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, ProfilesServiceError> {
        let user = self.auth.sign_up(email, password).await?;

        let mut batch = WriteBatch::new();

        batch.set_stamped(
            USERS,
            &user.id.to_string(),
            encode(&NewProfile::for_email(&user.email))?,
            "createdAt",
        );

        self.documents.commit(batch).await?;

        info!(user = %user.id, "created profile");

        self.get_profile(user.id).await
    }

    async fn get_profile(&self, user: UserId) -> Result<UserProfile, ProfilesServiceError> {
        let snapshot = self
            .documents
            .get(USERS, &user.to_string())
            .await?
            .ok_or(ProfilesServiceError::NotFound)?;

        Ok(UserProfile::from_record(
            user,
            decode::<ProfileRecord>(&snapshot)?,
        ))
    }

    async fn find_by_email(&self, email: &str) -> Result<UserProfile, ProfilesServiceError> {
        let snapshots = self
            .documents
            .query(Query::collection(USERS).where_eq("email", email.trim()))
            .await?;

        let snapshot = snapshots
            .into_iter()
            .next()
            .ok_or(ProfilesServiceError::NotFound)?;

        let id = snapshot
            .id
            .parse::<UserId>()
            .map_err(|_| ProfilesServiceError::InvalidData("profile id is not a uuid"))?;

        Ok(UserProfile::from_record(
            id,
            decode::<ProfileRecord>(&snapshot)?,
        ))
    }

    async fn update_profile(
        &self,
        user: UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, ProfilesServiceError> {
        if update
            .name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(ProfilesServiceError::InvalidData("name cannot be empty"));
        }

        if !update.is_empty() {
            self.documents
                .update(USERS, &user.to_string(), encode(&update)?)
                .await?;
        }

        self.get_profile(user).await
    }

    async fn set_role(&self, user: UserId, role: Role) -> Result<UserProfile, ProfilesServiceError> {
        let mut fields = Document::new();

        fields.insert("role".to_string(), role.as_str().into());

        self.documents
            .update(USERS, &user.to_string(), fields)
            .await?;

        info!(%user, %role, "changed role");

        self.get_profile(user).await
    }
}

#[automock]
#[async_trait]
pub trait ProfilesService: Send + Sync {
    /// Create an account, sign it in and give it a default `user` profile.
    async fn register(&self, email: &str, password: &str)
    -> Result<UserProfile, ProfilesServiceError>;

    /// Retrieve a user's profile.
    async fn get_profile(&self, user: UserId) -> Result<UserProfile, ProfilesServiceError>;

    /// Retrieve the profile registered with `email`.
    async fn find_by_email(&self, email: &str) -> Result<UserProfile, ProfilesServiceError>;

    /// Change a profile's name and/or address.
    async fn update_profile(
        &self,
        user: UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, ProfilesServiceError>;

    /// Change a profile's role.
    async fn set_role(&self, user: UserId, role: Role) -> Result<UserProfile, ProfilesServiceError>;
}

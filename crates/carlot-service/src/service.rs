use std::sync::Arc;

use carlot_auth::{authenticate, Credentials, IdentityVerifier};
use carlot_store::ListingStore;
use carlot_types::{
    filter_listings, Listing, ListingDocument, ListingId, ListingUpdate, NewListing, Subject,
    MAX_IMAGES,
};

use crate::error::{Operation, ServiceError, ServiceResult};
use crate::request::{CreateListing, ListQuery, ReadPolicy};

/// Request handlers for listings.
///
/// Collaborators are injected at construction; the service holds no global
/// state and is cheap to clone.
#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn ListingStore>,
    verifier: Arc<dyn IdentityVerifier>,
    read_policy: ReadPolicy,
}

impl ListingService {
    pub fn new(store: Arc<dyn ListingStore>, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self {
            store,
            verifier,
            read_policy: ReadPolicy::default(),
        }
    }

    pub fn with_read_policy(mut self, read_policy: ReadPolicy) -> Self {
        self.read_policy = read_policy;
        self
    }

    pub fn read_policy(&self) -> ReadPolicy {
        self.read_policy
    }

    /// Verify `credentials` and return the caller's subject.
    ///
    /// Mutating operations call this before anything else; the HTTP layer
    /// also calls it before decoding a request body.
    pub async fn authenticate(&self, credentials: &Credentials) -> ServiceResult<Subject> {
        authenticate(self.verifier.as_ref(), credentials)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "credential rejected");
                ServiceError::Unauthenticated(e)
            })
    }

    /// Authenticate a read. Returns `None` for an allowed anonymous read.
    async fn read_subject(&self, credentials: &Credentials) -> ServiceResult<Option<Subject>> {
        if credentials.is_anonymous() && self.read_policy == ReadPolicy::AllowAnonymous {
            return Ok(None);
        }
        self.authenticate(credentials).await.map(Some)
    }

    /// Load a listing or fail with `NotFound`.
    async fn load(&self, id: &str, operation: Operation) -> ServiceResult<ListingDocument> {
        let Ok(listing_id) = ListingId::new(id) else {
            return Err(ServiceError::NotFound(id.to_string()));
        };
        self.store
            .get(&listing_id)
            .await
            .map_err(ServiceError::internal(operation))?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    /// Load a listing and check that `subject` owns it.
    async fn load_owned(
        &self,
        id: &str,
        subject: &Subject,
        operation: Operation,
    ) -> ServiceResult<ListingDocument> {
        let doc = self.load(id, operation).await?;
        if &doc.owner_id != subject {
            tracing::warn!(
                listing = %doc.id,
                owner = %doc.owner_id,
                caller = %subject,
                %operation,
                "ownership check failed"
            );
            return Err(ServiceError::Unauthorized { operation });
        }
        Ok(doc)
    }

    /// Create a listing owned by the verified caller.
    ///
    /// The claimed `user_id` must equal the verified subject. Field shape and
    /// image limits are not re-validated here.
    pub async fn create(
        &self,
        credentials: &Credentials,
        request: CreateListing,
    ) -> ServiceResult<ListingId> {
        let subject = self.authenticate(credentials).await?;
        self.create_as(&subject, request).await
    }

    /// [`create`](Self::create) for a caller already authenticated.
    pub async fn create_as(
        &self,
        subject: &Subject,
        request: CreateListing,
    ) -> ServiceResult<ListingId> {
        if request.user_id != subject.as_str() {
            tracing::warn!(claimed = %request.user_id, verified = %subject, "owner spoofing rejected");
            return Err(ServiceError::Unauthorized {
                operation: Operation::Create,
            });
        }
        if request.images.len() > MAX_IMAGES {
            tracing::warn!(
                images = request.images.len(),
                max = MAX_IMAGES,
                "listing exceeds client-side image limit"
            );
        }

        let id = self
            .store
            .create(NewListing {
                title: request.title,
                description: request.description,
                tags: request.tags,
                images: request.images,
                owner_id: subject.clone(),
            })
            .await
            .map_err(ServiceError::internal(Operation::Create))?;
        tracing::info!(listing = %id, owner = %subject, "listing created");
        Ok(id)
    }

    /// Fetch a single listing. Ownership is not required.
    pub async fn get(&self, credentials: &Credentials, id: &str) -> ServiceResult<Listing> {
        self.read_subject(credentials).await?;
        Ok(self.load(id, Operation::Read).await?.into_listing())
    }

    /// List listings, optionally restricted to one owner and filtered by a
    /// search term. No match is an empty result, not an error.
    pub async fn list(
        &self,
        credentials: &Credentials,
        query: &ListQuery,
    ) -> ServiceResult<Vec<Listing>> {
        self.read_subject(credentials).await?;

        let docs = match query.owner_filter() {
            Some(owner) => match Subject::new(owner) {
                Ok(owner) => self.store.list(Some(&owner)).await,
                // Not a valid subject, so nothing can be owned by it.
                Err(_) => Ok(Vec::new()),
            },
            None => self.store.list(None).await,
        }
        .map_err(ServiceError::internal(Operation::List))?;

        let listings = docs.into_iter().map(ListingDocument::into_listing).collect();
        Ok(filter_listings(listings, query.search_term()))
    }

    /// Replace the content of a listing owned by the caller.
    pub async fn update(
        &self,
        credentials: &Credentials,
        id: &str,
        update: ListingUpdate,
    ) -> ServiceResult<()> {
        let subject = self.authenticate(credentials).await?;
        self.update_as(&subject, id, update).await
    }

    /// [`update`](Self::update) for a caller already authenticated.
    pub async fn update_as(
        &self,
        subject: &Subject,
        id: &str,
        update: ListingUpdate,
    ) -> ServiceResult<()> {
        let doc = self.load_owned(id, subject, Operation::Update).await?;

        let found = self
            .store
            .update(&doc.id, update)
            .await
            .map_err(ServiceError::internal(Operation::Update))?;
        if !found {
            // Deleted between the ownership check and the write.
            return Err(ServiceError::NotFound(id.to_string()));
        }
        tracing::info!(listing = %doc.id, owner = %subject, "listing updated");
        Ok(())
    }

    /// Delete a listing owned by the caller.
    pub async fn delete(&self, credentials: &Credentials, id: &str) -> ServiceResult<()> {
        let subject = self.authenticate(credentials).await?;
        let doc = self.load_owned(id, &subject, Operation::Delete).await?;

        let removed = self
            .store
            .delete(&doc.id)
            .await
            .map_err(ServiceError::internal(Operation::Delete))?;
        if !removed {
            return Err(ServiceError::NotFound(id.to_string()));
        }
        tracing::info!(listing = %doc.id, owner = %subject, "listing deleted");
        Ok(())
    }
}

impl std::fmt::Debug for ListingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingService")
            .field("read_policy", &self.read_policy)
            .finish_non_exhaustive()
    }
}

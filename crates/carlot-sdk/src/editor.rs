use carlot_service::{CreateListing, ListQuery};
use carlot_types::Listing;

use crate::client::ApiClient;
use crate::error::{SdkError, SdkResult};
use crate::form::ListingForm;
use crate::picker::ImagePicker;
use crate::session::Session;
use crate::upload::Uploader;

/// Session-aware listing flows: browse, create, edit, delete.
///
/// Mutating flows need a signed-in session. Images are uploaded before the
/// API call; if the API call then fails, the uploaded images are not
/// removed.
#[derive(Clone, Debug)]
pub struct ListingEditor {
    api: ApiClient,
    uploader: Uploader,
    session: Option<Session>,
}

impl ListingEditor {
    pub fn new(api: ApiClient, uploader: Uploader, session: Option<Session>) -> Self {
        Self {
            api,
            uploader,
            session,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn require_session(&self, action: &'static str) -> SdkResult<&Session> {
        self.session.as_ref().ok_or(SdkError::NotLoggedIn(action))
    }

    /// All listings, filtered by `search`.
    pub async fn browse(&self, search: &str) -> SdkResult<Vec<Listing>> {
        self.require_session("browse cars")?;
        self.api
            .list(&ListQuery {
                user_id: None,
                search: Some(search.to_string()),
            })
            .await
    }

    /// The signed-in user's listings, filtered by `search`.
    pub async fn my_listings(&self, search: &str) -> SdkResult<Vec<Listing>> {
        let session = self.require_session("view your cars")?;
        self.api
            .list(&ListQuery {
                user_id: Some(session.subject().to_string()),
                search: Some(search.to_string()),
            })
            .await
    }

    pub async fn view(&self, id: &str) -> SdkResult<Listing> {
        self.api.get(id).await
    }

    /// Upload pending images and create the listing. Returns its id.
    pub async fn create(&self, form: &ListingForm, picker: ImagePicker) -> SdkResult<String> {
        let session = self.require_session("create a car listing")?;
        form.validate()?;

        let (existing, pending) = picker.into_parts();
        let mut images = existing;
        images.extend(self.uploader.upload_all(session.subject(), &pending).await?);

        let id = self
            .api
            .create(&CreateListing {
                title: form.title.clone(),
                description: form.description.clone(),
                tags: form.tag_list(),
                images,
                user_id: session.subject().to_string(),
            })
            .await?;
        tracing::info!(listing = %id, "listing created");
        Ok(id)
    }

    /// Load a listing for editing. Only its owner may edit it.
    pub async fn open_for_edit(&self, id: &str) -> SdkResult<(Listing, ListingForm, ImagePicker)> {
        let session = self.require_session("edit a car listing")?;
        let listing = self.api.get(id).await?;
        if !session.owns(&listing) {
            return Err(SdkError::InvalidInput("You can only edit your own cars".into()));
        }
        let form = ListingForm::from_listing(&listing);
        let picker = ImagePicker::with_existing(listing.images.clone());
        Ok((listing, form, picker))
    }

    /// Upload new images and replace the listing's content. Kept images
    /// come first, newly uploaded ones after them.
    pub async fn update(&self, id: &str, form: &ListingForm, picker: ImagePicker) -> SdkResult<()> {
        let session = self.require_session("edit a car listing")?;
        form.validate()?;

        let (existing, pending) = picker.into_parts();
        let mut images = existing;
        images.extend(self.uploader.upload_all(session.subject(), &pending).await?);

        self.api.update(id, &form.to_update(images)).await?;
        tracing::info!(listing = %id, "listing updated");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> SdkResult<()> {
        self.require_session("delete a car listing")?;
        self.api.delete(id).await?;
        tracing::info!(listing = %id, "listing deleted");
        Ok(())
    }
}

//! End-to-end listing flows against a live server on an ephemeral port.

use std::sync::Arc;

use bytes::Bytes;
use carlot_auth::{Credentials, SignedTokenVerifier, TokenIssuer, TokenKey};
use carlot_sdk::{
    ApiClient, CandidateImage, ImagePicker, ListingEditor, ListingForm, SdkError, Session, Uploader,
};
use carlot_server::{CarlotServer, ServerConfig};
use carlot_service::ListQuery;
use carlot_store::{InMemoryBlobStore, InMemoryListingStore};
use carlot_types::Subject;
use tokio::net::TcpListener;

struct Harness {
    base_url: String,
    issuer: TokenIssuer,
    blobs: Arc<InMemoryBlobStore>,
}

impl Harness {
    async fn start() -> Self {
        let key = TokenKey::generate();
        let server = CarlotServer::new(
            ServerConfig::default(),
            Arc::new(InMemoryListingStore::new()),
            Arc::new(SignedTokenVerifier::new(key.clone())),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = server.router();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{addr}"),
            issuer: TokenIssuer::new(key),
            blobs: Arc::new(InMemoryBlobStore::new()),
        }
    }

    fn session(&self, who: &str) -> Session {
        let token = self.issuer.issue(&Subject::new(who).unwrap());
        Session::from_token(token).unwrap()
    }

    fn editor(&self, session: Option<Session>) -> ListingEditor {
        let credentials = session
            .as_ref()
            .map(Session::credentials)
            .unwrap_or(Credentials::Anonymous);
        let api = ApiClient::new(&self.base_url, credentials).unwrap();
        ListingEditor::new(api, Uploader::new(self.blobs.clone()), session)
    }
}

fn png(name: &str) -> CandidateImage {
    CandidateImage::from_bytes(name, "image/png", Bytes::from_static(b"\x89PNG"))
}

#[tokio::test]
async fn create_edit_delete_round_trip() {
    let harness = Harness::start().await;
    let alice = harness.editor(Some(harness.session("alice")));

    let mut picker = ImagePicker::new();
    assert!(picker.add(vec![png("front.png"), png("back view.png")]).is_empty());
    let form = ListingForm::new("Red Civic", "Runs great", "honda, red");
    let id = alice.create(&form, picker).await.unwrap();

    let listing = alice.view(&id).await.unwrap();
    assert_eq!(listing.title, "Red Civic");
    assert_eq!(listing.tags, vec!["honda", "red"]);
    assert_eq!(listing.images.len(), 2);
    assert!(listing.images[0].starts_with("memory://cars/alice/"));
    assert!(listing.images[1].ends_with("-back_view.png"));
    assert_eq!(harness.blobs.len(), 2);

    let (_, mut form, mut picker) = alice.open_for_edit(&id).await.unwrap();
    assert_eq!(form.tags, "honda, red");
    picker.remove_existing(0);
    assert!(picker.add(vec![png("interior.png")]).is_empty());
    form.title = "Red Civic EX".into();
    alice.update(&id, &form, picker).await.unwrap();

    let listing = alice.view(&id).await.unwrap();
    assert_eq!(listing.title, "Red Civic EX");
    assert_eq!(listing.images.len(), 2);
    assert!(listing.images[1].ends_with("-interior.png"));
    assert!(listing.updated_at.is_some());

    alice.delete(&id).await.unwrap();
    let err = alice.view(&id).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn my_listings_and_search() {
    let harness = Harness::start().await;
    let alice = harness.editor(Some(harness.session("alice")));
    let bob = harness.editor(Some(harness.session("bob")));

    alice
        .create(&ListingForm::new("Blue Miata", "Convertible", "mazda"), ImagePicker::new())
        .await
        .unwrap();
    bob.create(&ListingForm::new("Grey Tacoma", "Truck", "toyota"), ImagePicker::new())
        .await
        .unwrap();

    assert_eq!(alice.browse("").await.unwrap().len(), 2);
    let mine = alice.my_listings("").await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].title, "Blue Miata");

    let found = bob.browse("TOYOTA").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].owner_id.as_str(), "bob");
    assert!(bob.my_listings("mazda").await.unwrap().is_empty());
}

#[tokio::test]
async fn non_owner_cannot_edit_or_delete() {
    let harness = Harness::start().await;
    let alice = harness.editor(Some(harness.session("alice")));
    let mallory = harness.editor(Some(harness.session("mallory")));

    let id = alice
        .create(&ListingForm::new("Civic", "Fine", ""), ImagePicker::new())
        .await
        .unwrap();

    let err = mallory.open_for_edit(&id).await.unwrap_err();
    assert!(matches!(err, SdkError::InvalidInput(ref m) if m == "You can only edit your own cars"));

    // Bypassing the client-side check still hits the server's ownership rule.
    let err = mallory
        .update(&id, &ListingForm::new("Mine now", "Yes", ""), ImagePicker::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SdkError::Api { status: 403, ref message } if message == "Not authorized to edit this car"
    ));

    let err = mallory.delete(&id).await.unwrap_err();
    assert!(matches!(
        err,
        SdkError::Api { status: 403, ref message } if message == "Not authorized to delete this car"
    ));
    assert_eq!(alice.view(&id).await.unwrap().title, "Civic");
}

#[tokio::test]
async fn signed_out_flows_are_refused_locally() {
    let harness = Harness::start().await;
    let anonymous = harness.editor(None);

    let err = anonymous
        .create(&ListingForm::new("T", "D", ""), ImagePicker::new())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "You must be logged in to create a car listing");
    assert!(matches!(anonymous.browse("").await, Err(SdkError::NotLoggedIn(_))));

    // The raw client reaches the server, which demands a credential.
    let err = anonymous.api().list(&ListQuery::default()).await.unwrap_err();
    assert!(matches!(err, SdkError::Api { status: 401, ref message } if message == "Unauthorized"));
}

#[tokio::test]
async fn invalid_form_uploads_nothing() {
    let harness = Harness::start().await;
    let alice = harness.editor(Some(harness.session("alice")));

    let mut picker = ImagePicker::new();
    picker.add(vec![png("a.png")]);
    let err = alice
        .create(&ListingForm::new("", "D", ""), picker)
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::InvalidInput(ref m) if m == "Title is required"));
    assert!(harness.blobs.is_empty());
}

#[tokio::test]
async fn forged_token_is_rejected_by_server() {
    let harness = Harness::start().await;
    let forged = TokenIssuer::new(TokenKey::generate()).issue(&Subject::new("alice").unwrap());
    let editor = harness.editor(Some(Session::from_token(forged).unwrap()));

    let err = editor
        .create(&ListingForm::new("T", "D", ""), ImagePicker::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
}

use carlot_service::ListingService;

/// Shared state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub listings: ListingService,
}

impl AppState {
    pub fn new(listings: ListingService) -> Self {
        Self { listings }
    }
}

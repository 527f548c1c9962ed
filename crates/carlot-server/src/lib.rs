//! HTTP server for Carlot.
//!
//! Exposes the listing service over a small JSON API:
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/api/cars?userId=&search=` | 200, array of listings |
//! | POST | `/api/cars` | 200, `{"id": ...}` |
//! | GET | `/api/cars/:id` | 200, listing |
//! | PUT | `/api/cars/:id` | 200, `{"message": ...}` |
//! | DELETE | `/api/cars/:id` | 200, `{"message": ...}` |
//!
//! Errors are `{"error": "..."}` with 401, 403, 404 or 500. The bearer
//! credential travels in `Authorization: Bearer <token>`.

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ServerError, ServerResult};
pub use router::{build_app, build_router, paths};
pub use server::CarlotServer;
pub use state::AppState;

//! axum glue
//!
//! Lets route handlers return engine results directly:
//!
//! ```rust,ignore
//! async fn list_books(
//!     State(state): State<AppState>,
//!     Query(request): Query<ListRequest>,
//! ) -> shelf_query::Result<PagedResult<Book>> {
//!     state.pager.page(&state.books, &request).await
//! }
//! ```
//!
//! Errors render through [`crate::Error`]'s own `IntoResponse`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::result::PagedResult;

impl<T: Serialize> IntoResponse for PagedResult<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

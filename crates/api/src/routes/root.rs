//! Welcome page endpoint.

use axum::response::Html;

/// GET / — static welcome page, the only non-JSON response.
pub async fn index() -> Html<&'static str> {
    Html("<h1>Bakery GET-POST-PATCH-DELETE API</h1>")
}

//! Response builders shared by the resource handlers.

use actix_web::HttpResponse;
use actix_web::http::header;
use serde::Serialize;

/// Redirect a successful write back to the collection (Post/Redirect/Get).
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Re-render a form whose input failed validation.
pub(crate) fn unprocessable<T: Serialize>(view: &T) -> HttpResponse {
    HttpResponse::UnprocessableEntity().json(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use rstest::rstest;

    #[rstest]
    fn see_other_sets_location() {
        let res = see_other("/users");
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("/users")
        );
    }

    #[rstest]
    fn unprocessable_uses_422() {
        let res = unprocessable(&serde_json::json!({ "errors": {} }));
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

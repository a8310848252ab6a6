//! HTTP inbound adapter exposing the users and scores resources.

pub mod error;
pub mod flash;
pub mod health;
mod responses;
pub mod schemas;
pub mod scores;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register the resource routes and the JSON body error handler.
///
/// `/users/new` and `/scores/new` are registered before their `{id}`
/// siblings so they are not parsed as identifiers.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use scorebook::inbound::http::configure;
///
/// let app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .service(users::list_users)
        .service(users::new_user)
        .service(users::create_user)
        .service(users::edit_user)
        .service(users::show_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(scores::list_scores)
        .service(scores::new_score)
        .service(scores::create_score)
        .service(scores::edit_score)
        .service(scores::show_score)
        .service(scores::update_score)
        .service(scores::delete_score);
}

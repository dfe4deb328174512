use axum::{middleware, response::IntoResponse, routing::get, Extension, Router};

use crate::{
    dtos::{
        userdtos::{FilterUserDto, UserData},
        ApiResponse,
    },
    error::HttpError,
    middleware::{auth, JWTAuthMiddeware},
};

pub fn users_handler() -> Router {
    Router::new().route("/me", get(get_me).layer(middleware::from_fn(auth)))
}

pub async fn get_me(
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let filtered_user = FilterUserDto::filter_user(&user.user);

    Ok(ApiResponse::success(
        "User info retrieved",
        UserData {
            user: filtered_user,
        },
    ))
}

use std::sync::Arc;

use axum::{
    middleware,
    response::IntoResponse,
    routing::post,
    Extension, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use validator::Validate;

use crate::{
    dtos::{
        userdtos::{AccessTokenData, AuthData, FilterUserDto, LoginUserDto, RefreshTokenDto, RegisterUserDto},
        ApiResponse,
    },
    error::HttpError,
    extract::AppJson,
    middleware::{auth, JWTAuthMiddeware, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE},
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh-token", post(refresh_token))
        .route("/logout", post(logout).layer(middleware::from_fn(auth)))
}

fn token_cookie(name: &'static str, value: String, minutes: i64) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .max_age(time::Duration::minutes(minutes))
        .http_only(true)
        .build()
}

fn expired_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}

pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    AppJson(body): AppJson<RegisterUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;

    let (user, tokens) = app_state.identity_service.register(body).await?;

    Ok(ApiResponse::created(
        "User registered successfully",
        AuthData {
            user: FilterUserDto::filter_user(&user),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        },
    ))
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    jar: CookieJar,
    AppJson(body): AppJson<LoginUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;

    let identity = &app_state.identity_service;
    let user = identity.authenticate(&body.email, &body.password).await?;
    let tokens = identity.issue_token_pair(&user).await?;

    let jar = jar
        .add(token_cookie(
            ACCESS_TOKEN_COOKIE,
            tokens.access_token.clone(),
            app_state.env.jwt_maxage,
        ))
        .add(token_cookie(
            REFRESH_TOKEN_COOKIE,
            tokens.refresh_token.clone(),
            app_state.env.jwt_refresh_maxage,
        ));

    tracing::info!(user_id = %user.id, "user logged in");

    Ok((
        jar,
        ApiResponse::success(
            "Login successful",
            AuthData {
                user: FilterUserDto::filter_user(&user),
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
            },
        ),
    ))
}

pub async fn refresh_token(
    Extension(app_state): Extension<Arc<AppState>>,
    jar: CookieJar,
    AppJson(body): AppJson<RefreshTokenDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;

    let access_token = app_state
        .identity_service
        .rotate_access_token(&body.refresh_token)
        .await?;

    let jar = jar.add(token_cookie(
        ACCESS_TOKEN_COOKIE,
        access_token.clone(),
        app_state.env.jwt_maxage,
    ));

    Ok((
        jar,
        ApiResponse::success("Token refreshed successfully", AccessTokenData { access_token }),
    ))
}

pub async fn logout(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    jar: CookieJar,
) -> Result<impl IntoResponse, HttpError> {
    app_state.identity_service.revoke(&user.user).await?;

    let jar = jar
        .remove(expired_cookie(ACCESS_TOKEN_COOKIE))
        .remove(expired_cookie(REFRESH_TOKEN_COOKIE));

    Ok((jar, ApiResponse::success("Logout successful", ())))
}

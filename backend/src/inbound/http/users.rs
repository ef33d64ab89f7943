//! Users API handlers.
//!
//! ```text
//! GET /users
//! GET /users/{id}
//! POST /create {"first_name":"Ada","last_name":"Lovelace",...}
//! POST /edit {"id":"...","first_name":"Ada",...}
//! DELETE /delete/{id}
//! ```
//!
//! Successful responses share one envelope: `total` is the size of the
//! returned collection, `message` a fixed human-readable status.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{Error, USER_NOT_FOUND_MESSAGE, User, UserId, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{CreateUserRequestSchema, ErrorSchema, UserSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::user_validation_error;

pub(crate) const LIST_MESSAGE: &str = "success";
pub(crate) const FOUND_MESSAGE: &str = "Success";
pub(crate) const CREATED_MESSAGE: &str = "New user created";
pub(crate) const EDITED_MESSAGE: &str = "User edited";
pub(crate) const DELETED_MESSAGE: &str = "User deleted";

/// Collection envelope returned by list and write endpoints.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UsersResponse {
    #[schema(example = 1)]
    pub total: usize,
    #[schema(example = "success")]
    pub message: String,
    #[schema(value_type = Vec<UserSchema>)]
    pub users: Vec<User>,
}

impl UsersResponse {
    fn new(message: &str, users: Vec<User>) -> Self {
        Self {
            total: users.len(),
            message: message.to_owned(),
            users,
        }
    }
}

/// Single-user envelope returned by `GET /users/{id}`.
///
/// A miss carries `total: 0` and no `user` member.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub total: usize,
    #[schema(example = "Success")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<UserSchema>)]
    pub user: Option<User>,
}

impl UserResponse {
    fn found(user: User) -> Self {
        Self {
            total: 1,
            message: FOUND_MESSAGE.to_owned(),
            user: Some(user),
        }
    }

    fn missing() -> Self {
        Self {
            total: 0,
            message: USER_NOT_FOUND_MESSAGE.to_owned(),
            user: None,
        }
    }
}

fn path_user_id(raw: String) -> ApiResult<UserId> {
    UserId::new(raw).map_err(|_| Error::not_found(USER_NOT_FOUND_MESSAGE))
}

/// List every stored user in insertion order.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_registry::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Users", body = UsersResponse),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let users = state.users.list_users().await?;
    Ok(HttpResponse::Ok().json(UsersResponse::new(LIST_MESSAGE, users)))
}

/// Fetch one user by identifier.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "User not found", body = UserResponse),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let Ok(id) = UserId::new(path.into_inner()) else {
        return Ok(HttpResponse::BadRequest().json(UserResponse::missing()));
    };
    let response = match state.users.find_user(&id).await? {
        Some(user) => HttpResponse::Ok().json(UserResponse::found(user)),
        None => HttpResponse::BadRequest().json(UserResponse::missing()),
    };
    Ok(response)
}

/// Register a new user.
///
/// The server assigns the identifier. The email and username must not match
/// the email or username of any stored user.
#[utoipa::path(
    post,
    path = "/create",
    request_body = CreateUserRequestSchema,
    responses(
        (status = 201, description = "User created", body = UsersResponse),
        (status = 400, description = "Invalid payload or identity already claimed", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/create")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<HttpResponse> {
    let profile =
        UserProfile::try_from_payload(payload.into_inner()).map_err(user_validation_error)?;
    let users = state.users_command.create_user(profile).await?;
    Ok(HttpResponse::Created().json(UsersResponse::new(CREATED_MESSAGE, users)))
}

/// Replace a stored user wholesale.
///
/// Members omitted from the payload are dropped from the stored record.
#[utoipa::path(
    post,
    path = "/edit",
    request_body = UserSchema,
    responses(
        (status = 201, description = "User replaced", body = UsersResponse),
        (status = 400, description = "Invalid payload or unknown user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "editUser"
)]
#[post("/edit")]
pub async fn edit_user(
    state: web::Data<HttpState>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<HttpResponse> {
    let user = User::try_from_edit_payload(payload.into_inner()).map_err(user_validation_error)?;
    let users = state.users_command.edit_user(user).await?;
    Ok(HttpResponse::Created().json(UsersResponse::new(EDITED_MESSAGE, users)))
}

/// Remove a user by identifier.
#[utoipa::path(
    delete,
    path = "/delete/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User deleted", body = UsersResponse),
        (status = 400, description = "User not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/delete/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path_user_id(path.into_inner())?;
    let users = state.users_command.delete_user(&id).await?;
    Ok(HttpResponse::Ok().json(UsersResponse::new(DELETED_MESSAGE, users)))
}

/// Register every users endpoint on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users)
        .service(get_user)
        .service(create_user)
        .service(edit_user)
        .service(delete_user);
}

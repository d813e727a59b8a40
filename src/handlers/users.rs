use actix_web::{web, HttpResponse};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::auth::{Permission, Principal};
use crate::domain::cart::UserId;
use crate::domain::user::{Credentials, Registration, User};
use crate::errors::AppError;
use crate::response;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginToken {
    pub token: String,
}

/// POST /users/register
#[utoipa::path(
    post,
    path = "/users/register",
    request_body = Registration,
    responses(
        (status = 201, description = "Account created with the user role", body = User),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "User name or email already registered"),
    ),
    tag = "users"
)]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<Registration>,
) -> Result<HttpResponse, AppError> {
    let registration = body.into_inner();

    let user = web::block(move || state.users.register(registration))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(response::created("User successfully added", user))
}

/// POST /users/login
///
/// Answers with a signed token carrying the account's id and role.
#[utoipa::path(
    post,
    path = "/users/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Signed bearer token", body = LoginToken),
        (status = 401, description = "Incorrect password"),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<Credentials>,
) -> Result<HttpResponse, AppError> {
    let credentials = body.into_inner();
    let verifier = state.clone();

    let (id, role) = web::block(move || verifier.users.authenticate(&credentials))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let token = state
        .auth
        .issue(id, Permission::from(role))
        .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))?;

    Ok(response::ok("Success", LoginToken { token }))
}

/// GET /users
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Every account, ordered by id", body = [User]),
        (status = 403, description = "Not an admin"),
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list_users(
    state: web::Data<AppState>,
    principal: Principal,
) -> Result<HttpResponse, AppError> {
    principal.require(&[Permission::Admin])?;

    let users = web::block(move || state.users.list())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(response::ok("Success", users))
}

/// GET /users/{id}
///
/// Admins can read any account; users only their own.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Account found", body = User),
        (status = 403, description = "Another user's account"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn get_user(
    state: web::Data<AppState>,
    principal: Principal,
    path: web::Path<UserId>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if principal.id != Some(id) {
        principal.require(&[Permission::Admin])?;
    }

    let user = web::block(move || state.users.get(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(response::ok("Success", user))
}

/// DELETE /users/delete/{id}
///
/// The account's cart goes with it.
#[utoipa::path(
    delete,
    path = "/users/delete/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Account deleted"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn delete_user(
    state: web::Data<AppState>,
    principal: Principal,
    path: web::Path<UserId>,
) -> Result<HttpResponse, AppError> {
    principal.require(&[Permission::Admin])?;
    let id = path.into_inner();

    web::block(move || state.users.delete(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(response::ok("User successfully deleted", json!({})))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use serde_json::{json, Value};

    use crate::auth::{Permission, Principal};
    use crate::handlers::configure;
    use crate::test_support::{memory_state, test_auth, test_bearer, InMemoryStore};

    macro_rules! app {
        ($store:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(memory_state($store.clone())))
                    .configure(configure),
            )
            .await
        };
    }

    fn sara() -> Value {
        json!({
            "userName": "sara_a",
            "password": "Secret123",
            "email": "sara@example.com",
            "fullName": "Sara Ahmadi",
            "phoneNumber": "09121234567"
        })
    }

    #[actix_web::test]
    async fn register_then_login_yields_a_working_cart_token() {
        let store = Arc::new(InMemoryStore::new());
        let latte = store.with_product("Latte", 45_000);
        let app = app!(store);

        let req = test::TestRequest::post()
            .uri("/users/register")
            .set_json(sara())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "User successfully added");
        assert_eq!(body["data"]["permission"], "user");
        assert!(body["data"].get("password").is_none());
        let id = body["data"]["id"].as_i64().expect("id missing");

        let req = test::TestRequest::post()
            .uri("/users/login")
            .set_json(json!({"userNameOrEmail": "sara@example.com", "password": "Secret123"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let token = body["data"]["token"].as_str().expect("token missing");

        assert_eq!(
            test_auth().verify(token),
            Ok(Principal {
                id: Some(id as i32),
                permission: Permission::User
            })
        );

        let req = test::TestRequest::post()
            .uri("/cart/add")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({"productId": latte}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn bad_login_statuses() {
        let store = Arc::new(InMemoryStore::new());
        let app = app!(store);
        let req = test::TestRequest::post()
            .uri("/users/register")
            .set_json(sara())
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/users/login")
            .set_json(json!({"userNameOrEmail": "sara_a", "password": "Wrong123"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Incorrect password.");

        let req = test::TestRequest::post()
            .uri("/users/login")
            .set_json(json!({"userNameOrEmail": "ghost", "password": "Secret123"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn duplicate_registration_is_409_with_a_fixed_message() {
        let store = Arc::new(InMemoryStore::new());
        let app = app!(store);

        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let req = test::TestRequest::post()
                .uri("/users/register")
                .set_json(sara())
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), expected);
            if expected == StatusCode::CONFLICT {
                let body: Value = test::read_body_json(resp).await;
                assert_eq!(body["message"], "This username is already registered");
            }
        }
    }

    #[actix_web::test]
    async fn account_routes_respect_roles() {
        let store = Arc::new(InMemoryStore::new());
        let app = app!(store);
        let req = test::TestRequest::post()
            .uri("/users/register")
            .set_json(sara())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = body["data"]["id"].as_i64().expect("id missing") as i32;

        let req = test::TestRequest::get()
            .uri(&format!("/users/{id}"))
            .insert_header(test_bearer(id, Permission::User))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/users/{id}"))
            .insert_header(test_bearer(id + 1, Permission::User))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = test::TestRequest::get()
            .uri("/users")
            .insert_header(test_bearer(id, Permission::User))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = test::TestRequest::delete()
            .uri(&format!("/users/delete/{id}"))
            .insert_header(test_bearer(99, Permission::Admin))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "User successfully deleted");

        let req = test::TestRequest::get()
            .uri("/users")
            .insert_header(test_bearer(99, Permission::Admin))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], json!([]));
    }
}

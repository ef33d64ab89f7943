//! Behaviour tests for the user registry HTTP surface.
//!
//! Each step drives the wired Actix application in-process against a
//! temporary JSON document, so state carries across steps through the file
//! exactly as it does between requests in production.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use std::sync::Arc;

use actix_web::http::Method;
use actix_web::{App, test as actix_test, web};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use serde_json::{Map, Value, json};
use user_registry::domain::UserDirectoryService;
use user_registry::inbound::http::health::{HealthState, live, ready};
use user_registry::inbound::http::state::HttpState;
use user_registry::inbound::http::users;
use user_registry::inbound::http::validation::json_config;
use user_registry::test_support::document::TempUserDocument;
use user_registry::test_support::fixtures::payload;
use user_registry::{Cors, Trace};

// -----------------------------------------------------------------------------
// Test World
// -----------------------------------------------------------------------------

#[derive(Default, ScenarioState)]
struct RegistryWorld {
    document: Slot<Arc<TempUserDocument>>,
    last_status: Slot<u16>,
    last_body: Slot<Value>,
    created_id: Slot<String>,
}

impl RegistryWorld {
    fn document(&self) -> Arc<TempUserDocument> {
        self.document.get().expect("registry should be running")
    }

    fn send(&self, method: Method, uri: &str, body: Option<Value>) {
        let document = self.document();
        let uri = uri.to_owned();
        let (status, value) = actix_web::rt::System::new().block_on(async move {
            let service = UserDirectoryService::new(Arc::new(document.repository()));
            let health = HealthState::new();
            health.mark_ready();
            let app = actix_test::init_service(
                App::new()
                    .app_data(web::Data::new(HttpState::from_service(Arc::new(service))))
                    .app_data(web::Data::new(health))
                    .app_data(json_config())
                    .wrap(Cors)
                    .wrap(Trace)
                    .configure(users::configure)
                    .service(ready)
                    .service(live),
            )
            .await;

            let mut request = actix_test::TestRequest::default().method(method).uri(&uri);
            if let Some(body) = body {
                request = request.set_json(body);
            }
            let response = actix_test::call_service(&app, request.to_request()).await;
            let status = response.status().as_u16();
            let bytes = actix_test::read_body(response).await;
            let value: Value = serde_json::from_slice(&bytes).expect("JSON response body");
            (status, value)
        });

        self.last_status.set(status);
        self.last_body.set(value);
    }

    fn body(&self) -> Value {
        self.last_body.get().expect("a response should be recorded")
    }

    fn created_id(&self) -> String {
        self.created_id.get().expect("a user should have been created")
    }

    fn remember_created_id(&self, username: &str) {
        let body = self.body();
        let id = body
            .get("users")
            .and_then(Value::as_array)
            .and_then(|users| {
                users
                    .iter()
                    .find(|user| user.get("username").and_then(Value::as_str) == Some(username))
            })
            .and_then(|user| user.get("id"))
            .and_then(Value::as_str);
        if let Some(id) = id {
            self.created_id.set(id.to_owned());
        }
    }
}

fn unquote(value: &str) -> &str {
    value.trim_matches('"')
}

#[fixture]
fn world() -> RegistryWorld {
    RegistryWorld::default()
}

// -----------------------------------------------------------------------------
// Given Steps
// -----------------------------------------------------------------------------

#[given("a running registry over an empty user document")]
fn a_running_registry_over_an_empty_user_document(world: &RegistryWorld) {
    let document = TempUserDocument::empty().expect("empty document");
    world.document.set(Arc::new(document));
}

// -----------------------------------------------------------------------------
// When Steps
// -----------------------------------------------------------------------------

#[when("the client creates a user with email {email} and username {username}")]
fn the_client_creates_a_user(world: &RegistryWorld, email: String, username: String) {
    let username = unquote(&username);
    let body = Value::Object(payload(unquote(&email), username));
    world.send(Method::POST, "/create", Some(body));
    world.remember_created_id(username);
}

#[when("the client creates a user without a first name")]
fn the_client_creates_a_user_without_a_first_name(world: &RegistryWorld) {
    let mut body: Map<String, Value> = payload("nobody@example.com", "nobody");
    body.remove("first_name");
    world.send(Method::POST, "/create", Some(Value::Object(body)));
}

#[when("the client renames the created user to {username}")]
fn the_client_renames_the_created_user(world: &RegistryWorld, username: String) {
    let mut body = payload("grace@example.com", unquote(&username));
    body.insert("id".to_owned(), json!(world.created_id()));
    world.send(Method::POST, "/edit", Some(Value::Object(body)));
}

#[when("the client fetches the created user")]
fn the_client_fetches_the_created_user(world: &RegistryWorld) {
    let uri = format!("/users/{}", world.created_id());
    world.send(Method::GET, &uri, None);
}

#[when("the client fetches the user {id}")]
fn the_client_fetches_the_user(world: &RegistryWorld, id: String) {
    let uri = format!("/users/{}", unquote(&id));
    world.send(Method::GET, &uri, None);
}

#[when("the client deletes the created user")]
fn the_client_deletes_the_created_user(world: &RegistryWorld) {
    let uri = format!("/delete/{}", world.created_id());
    world.send(Method::DELETE, &uri, None);
}

#[when("the client deletes the user {id}")]
fn the_client_deletes_the_user(world: &RegistryWorld, id: String) {
    let uri = format!("/delete/{}", unquote(&id));
    world.send(Method::DELETE, &uri, None);
}

// -----------------------------------------------------------------------------
// Then Steps
// -----------------------------------------------------------------------------

#[then("the response status is {status}")]
fn the_response_status_is(world: &RegistryWorld, status: u16) {
    assert_eq!(world.last_status.get(), Some(status));
}

#[then("the response message is {message}")]
fn the_response_message_is(world: &RegistryWorld, message: String) {
    let body = world.body();
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some(unquote(&message))
    );
}

#[then("the collection holds {count} users")]
fn the_collection_holds_users(world: &RegistryWorld, count: usize) {
    let body = world.body();
    let users = body
        .get("users")
        .and_then(Value::as_array)
        .expect("users array");
    assert_eq!(users.len(), count);
    assert_eq!(body.get("total").and_then(Value::as_u64), u64::try_from(count).ok());
}

#[then("the document stores {count} users")]
fn the_document_stores_users(world: &RegistryWorld, count: usize) {
    let stored = world.document().read_json().expect("stored document");
    assert_eq!(stored.as_array().map(Vec::len), Some(count));
}

#[then("the fetched user has username {username}")]
fn the_fetched_user_has_username(world: &RegistryWorld, username: String) {
    let body = world.body();
    assert_eq!(body.get("total"), Some(&json!(1)));
    assert_eq!(
        body.pointer("/user/username").and_then(Value::as_str),
        Some(unquote(&username))
    );
    assert_eq!(
        body.pointer("/user/id").and_then(Value::as_str),
        Some(world.created_id().as_str())
    );
}

// -----------------------------------------------------------------------------
// Scenario Bindings
// -----------------------------------------------------------------------------

#[scenario(
    path = "tests/features/user_registry.feature",
    name = "A user is created, a duplicate is rejected and the user is deleted"
)]
fn create_duplicate_delete_lifecycle(world: RegistryWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/user_registry.feature",
    name = "An edited user is returned by the lookup endpoint"
)]
fn edited_user_is_returned_by_lookup(world: RegistryWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/user_registry.feature",
    name = "Invalid payloads are rejected before touching storage"
)]
fn invalid_payloads_are_rejected(world: RegistryWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/user_registry.feature",
    name = "Unknown users are reported as not found"
)]
fn unknown_users_are_reported_as_not_found(world: RegistryWorld) {
    let _ = world;
}

//! Builders wiring repository adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;

use user_registry::domain::UserDirectoryService;
use user_registry::domain::ports::UserRepository;
use user_registry::inbound::http::state::HttpState;

/// Build the shared HTTP state around `repository`.
///
/// One service instance backs both ports so every worker shares the same
/// write lock.
pub(super) fn build_http_state<R>(repository: Arc<R>) -> web::Data<HttpState>
where
    R: UserRepository + 'static,
{
    let service = Arc::new(UserDirectoryService::new(repository));
    web::Data::new(HttpState::from_service(service))
}

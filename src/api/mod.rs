use std::sync::Arc;

use poem::{
    get,
    middleware::{CatchPanic, CookieJarManager, Tracing},
    Endpoint, EndpointExt, Route,
};

use crate::{auth::RequireRole, db::SupabaseClient, middleware::SessionGuard};

pub mod home;
pub mod layout;
pub mod section;

pub fn routes(client: Arc<SupabaseClient>) -> Route {
    let route = Route::new()
        .at("/", get(home::home))
        .at("/static/globals.css", get(layout::globals_css));

    section::SECTIONS.into_iter().fold(route, |route, s| {
        route.at(
            s.path,
            get(section::section_page)
                .with(RequireRole::new(client.clone(), s.allowed))
                .data(s),
        )
    })
}

pub fn build_app(client: Arc<SupabaseClient>, cookie_name: String) -> impl Endpoint {
    routes(client.clone())
        .with(SessionGuard::new(client, cookie_name))
        .with(CookieJarManager::new())
        .with(Tracing)
        .with(CatchPanic::new())
}

use maud::html;
use poem::{
    handler,
    web::{Data, Html},
};

use crate::extractor::auth_user::AuthUser;

use super::layout::root_layout;

#[derive(Clone, Debug)]
pub struct Section {
    pub path: &'static str,
    pub title: &'static str,
    pub allowed: &'static [&'static str],
}

pub const SECTIONS: [Section; 6] = [
    Section {
        path: "/admin",
        title: "Administration",
        allowed: &["admin"],
    },
    Section {
        path: "/designer",
        title: "Design studio",
        allowed: &["admin", "designer"],
    },
    Section {
        path: "/supervisor",
        title: "Site supervision",
        allowed: &["admin", "supervisor"],
    },
    Section {
        path: "/analytics",
        title: "Analytics",
        allowed: &["admin"],
    },
    Section {
        path: "/cart",
        title: "Cart",
        allowed: &["admin", "designer", "client"],
    },
    Section {
        path: "/quote",
        title: "Quotes",
        allowed: &["admin", "designer", "client"],
    },
];

#[handler]
pub fn section_page(auth: AuthUser, Data(section): Data<&Section>) -> Html<String> {
    let email = auth.user.email.as_deref().unwrap_or("unknown");
    let role = auth.role.as_deref().unwrap_or("none");

    root_layout(html! {
        main class="flex flex-col items-center gap-4 p-24" {
            h1 class="text-4xl font-bold" { (section.title) }
            p class="text-lg text-gray-600" { "Signed in as " (email) " (" (role) ")" }
        }
    })
}

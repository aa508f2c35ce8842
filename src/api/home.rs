use maud::html;
use poem::{handler, web::Html};

use super::layout::{root_layout, DESCRIPTION, TITLE};

#[handler]
pub fn home() -> Html<String> {
    root_layout(html! {
        div class="flex min-h-screen flex-col items-center justify-center p-24" {
            main class="flex flex-col items-center gap-4" {
                h1 class="text-4xl font-bold" { (TITLE) }
                p class="text-lg text-gray-600" { (DESCRIPTION) }
            }
        }
    })
}

use maud::{html, Markup, DOCTYPE};
use poem::{handler, web::Html, Response};

pub const TITLE: &str = "EKATAN";
pub const DESCRIPTION: &str = "Premium residential interior design and execution ERP";

const GLOBALS_CSS: &str = include_str!("../../static/globals.css");

pub fn root_layout(children: Markup) -> Html<String> {
    let page = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (TITLE) }
                meta name="description" content=(DESCRIPTION);
                link rel="stylesheet" href="/static/globals.css";
            }
            body { (children) }
        }
    };

    Html(page.into_string())
}

#[handler]
pub fn globals_css() -> Response {
    Response::builder()
        .content_type("text/css; charset=utf-8")
        .body(GLOBALS_CSS)
}

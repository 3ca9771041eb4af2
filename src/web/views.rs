//! Askama pages. Deriving `WebTemplate` makes each page an axum response;
//! a render failure becomes a plain 500.

use askama::Template;
use askama_web::WebTemplate;

#[derive(Template, WebTemplate, Default)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub error: Option<String>,
    pub short_url: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "404.html")]
pub struct NotFoundPage {
    pub short_id: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub message: String,
}

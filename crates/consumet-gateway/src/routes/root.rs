use actix_web::{web, HttpResponse};

use crate::state::AppState;

const WELCOME: &str = "Welcome to consumet api! 🎉 \n";
const DEMO_NOTICE: &str = "This is a demo of the api. You should only use this for testing purposes.";

/// Plain-text greeting, with a notice appended in demo mode.
pub fn welcome_message(demo_mode: bool) -> String {
    if demo_mode {
        format!("{WELCOME}{DEMO_NOTICE}")
    } else {
        WELCOME.to_string()
    }
}

/// GET / - informational root
pub async fn index(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(welcome_message(state.config.demo_mode()))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index));
}

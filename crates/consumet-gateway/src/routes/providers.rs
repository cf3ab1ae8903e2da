//! Mount points for the content providers.
//!
//! Provider handlers are owned elsewhere; the gateway only decides where each
//! one lives and whether a request gets that far. Every prefix answers its
//! own index so a freshly mounted provider is discoverable.

use actix_web::{web, HttpResponse};

/// Attaches a provider's handlers inside its scope.
pub type Mount = fn(&mut web::ServiceConfig);

#[derive(Clone)]
struct ProviderEntry {
    name: &'static str,
    prefix: &'static str,
    mount: Option<Mount>,
}

#[derive(Clone, Copy)]
struct ProviderIndex {
    name: &'static str,
}

/// Ordered set of provider scopes.
#[derive(Clone)]
pub struct ProviderRoutes {
    entries: Vec<ProviderEntry>,
}

const STANDARD: &[(&str, &str)] = &[
    ("books", "/books"),
    ("anime", "/anime"),
    ("manga", "/manga"),
    ("light-novels", "/light-novels"),
    ("movies", "/movies"),
    ("meta", "/meta"),
    ("news", "/news"),
    ("utils", "/utils"),
];

impl ProviderRoutes {
    /// The consumet provider families, each at its usual prefix.
    pub fn standard() -> Self {
        Self {
            entries: STANDARD
                .iter()
                .map(|&(name, prefix)| ProviderEntry {
                    name,
                    prefix,
                    mount: None,
                })
                .collect(),
        }
    }

    /// Attach handlers under `prefix`, adding the prefix if it is new.
    pub fn mount(mut self, name: &'static str, prefix: &'static str, mount: Mount) -> Self {
        match self.entries.iter_mut().find(|e| e.prefix == prefix) {
            Some(entry) => entry.mount = Some(mount),
            None => self.entries.push(ProviderEntry {
                name,
                prefix,
                mount: Some(mount),
            }),
        }
        self
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.prefix)
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        for entry in &self.entries {
            let mut scope = web::scope(entry.prefix)
                .app_data(web::Data::new(ProviderIndex { name: entry.name }))
                .route("", web::get().to(provider_index))
                .route("/", web::get().to(provider_index));
            if let Some(mount) = entry.mount {
                scope = scope.configure(mount);
            }
            cfg.service(scope);
        }
    }
}

impl Default for ProviderRoutes {
    fn default() -> Self {
        Self::standard()
    }
}

async fn provider_index(index: web::Data<ProviderIndex>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "provider": index.name,
        "intro": format!("Welcome to the {} provider", index.name),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test as atest, App};

    async fn ping() -> HttpResponse {
        HttpResponse::Ok().body("pong")
    }

    fn anime_routes(cfg: &mut web::ServiceConfig) {
        cfg.route("/ping", web::get().to(ping));
    }

    #[test]
    fn test_standard_prefixes() {
        let routes = ProviderRoutes::standard();
        let prefixes: Vec<&str> = routes.prefixes().collect();
        assert_eq!(prefixes.len(), 8);
        assert!(prefixes.contains(&"/light-novels"));
        assert!(prefixes.contains(&"/utils"));
    }

    #[actix_web::test]
    async fn test_index_per_prefix() {
        let routes = ProviderRoutes::standard();
        let app = atest::init_service(App::new().configure(|cfg| routes.configure(cfg))).await;

        let req = atest::TestRequest::get().uri("/movies").to_request();
        let resp = atest::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = atest::read_body_json(resp).await;
        assert_eq!(body["provider"], "movies");
    }

    #[actix_web::test]
    async fn test_mount_attaches_handlers() {
        let routes = ProviderRoutes::standard().mount("anime", "/anime", anime_routes);
        let app = atest::init_service(App::new().configure(|cfg| routes.configure(cfg))).await;

        let req = atest::TestRequest::get().uri("/anime/ping").to_request();
        let resp = atest::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(atest::read_body(resp).await, "pong");
    }
}

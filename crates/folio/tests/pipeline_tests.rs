//! Integration tests for the page pipeline and the endpoint invoker
//!
//! Each test builds a site on disk:
//! - routes/ for pages and JSON handler definitions
//! - templates/ for partials
//! - layout.html for the shell

use folio::{
    EndpointInvoker, EndpointRequest, EndpointResult, HandlerModule, HandlerRegistry, PageOutcome,
    Site, SiteConfig,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

const LAYOUT: &str = "<html><head><title>%title%</title>%head%</head><body>%body%</body></html>";

struct TestSite {
    dir: TempDir,
}

impl TestSite {
    fn new() -> Self {
        let site = Self {
            dir: TempDir::new().unwrap(),
        };
        site.file("layout.html", LAYOUT)
    }

    fn file(self, relative: &str, content: &str) -> Self {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn config(&self) -> SiteConfig {
        SiteConfig {
            root: self.root().to_path_buf(),
            ..SiteConfig::default()
        }
    }

    fn site(&self) -> Site {
        Site::from_config(&self.config())
    }

    fn site_with(&self, registry: HandlerRegistry) -> Site {
        Site::new(&self.config(), registry)
    }
}

async fn render(site: &Site, path: &str) -> String {
    match site.render_page(path).await.unwrap() {
        PageOutcome::Rendered(html) => html,
        PageOutcome::NotFound => panic!("{} was not found", path),
    }
}

#[tokio::test]
async fn test_literal_page_wrapped_in_layout() {
    let test = TestSite::new().file("routes/about.html", "<p>About us</p>");
    let html = render(&test.site(), "/about").await;

    assert_eq!(
        html,
        r#"<html><head><title></title><script>window.route = {"data":{},"path":"about.html"}</script></head><body><p>About us</p></body></html>"#
    );
}

#[tokio::test]
async fn test_wildcard_page_exposes_match() {
    let test = TestSite::new().file("routes/blog/[slug].html", "<p>%slug%</p>");
    let html = render(&test.site(), "/blog/2024/post-1").await;

    assert!(html.contains("<p>2024/post-1</p>"));
    assert!(html.contains(r#""path":"blog/[slug].html""#));
    assert!(html.contains(r#""match":"2024/post-1""#));
}

#[tokio::test]
async fn test_template_included_once() {
    let test = TestSite::new()
        .file("templates/header.html", "<h1>Hi</h1>")
        .file("routes/index.html", "<!-- @template header -->\n<main>home</main>");
    let html = render(&test.site(), "/").await;

    assert_eq!(html.matches("<h1>Hi</h1>").count(), 1);
    assert!(!html.contains("@template"));
}

#[tokio::test]
async fn test_data_directive_from_definition_file() {
    let test = TestSite::new()
        .file(
            "routes/api/users/[slug].json",
            r#"{"get": {"status": 200, "body": {"name": "Ann", "id": "%slug%"}}}"#,
        )
        .file(
            "routes/profile.html",
            "<!-- @data user /api/users/5 --><p>{{user.name}} #{{user.id}}</p>",
        );
    let html = render(&test.site(), "/profile").await;

    assert!(html.contains("<p>Ann #5</p>"));
    assert!(!html.contains("@data"));
    assert!(!html.contains("{{"));
    assert!(html.contains(r#""data":{"user":{"id":"5","name":"Ann"}}"#));
}

#[tokio::test]
async fn test_partial_directives_run_after_composition() {
    let test = TestSite::new()
        .file(
            "routes/api/users/[slug].json",
            r#"{"get": {"body": {"name": "Ann", "id": "%slug%"}}}"#,
        )
        .file(
            "templates/card.html",
            "<!-- @data user /api/users/5 --><div>{{user.name}}</div>",
        )
        .file("routes/team.html", "<!-- @template card --><p>#{{user.id}}</p>");
    let html = render(&test.site(), "/team").await;

    assert!(html.contains("<body><div>Ann</div><p>#5</p></body>"));
    assert!(!html.contains("@data"));
    assert!(!html.contains("{{"));
    assert!(html.contains(r#""data":{"user":{"id":"5","name":"Ann"}}"#));
}

#[tokio::test]
async fn test_missing_placeholder_segment_is_blank() {
    let registry = HandlerRegistry::new("unused").with(
        "api/users/[slug].json",
        HandlerModule::new().get(|_req| async { anyhow::Ok(EndpointResult::ok(json!({"name": "Ann"}))) }),
    );
    let test = TestSite::new().file(
        "routes/city.html",
        "<!-- @data user /api/users/1 --><p>[{{user.address.city}}]</p>",
    );
    let html = render(&test.site_with(registry), "/city").await;

    assert!(html.contains("<p>[]</p>"));
}

#[tokio::test]
async fn test_unknown_handler_is_not_found() {
    let test = TestSite::new();
    let site = test.site();
    let result = site.invoker().get("/nope.json").await.unwrap();

    assert_eq!(result.status, 404);
    assert_eq!(result.body, json!({"error": "Not Found"}));
}

#[tokio::test]
async fn test_handler_error_fails_page() {
    let registry = HandlerRegistry::new("unused").with(
        "api/broken.json",
        HandlerModule::new().get(|_req| async { Err::<EndpointResult, _>(anyhow::anyhow!("db offline")) }),
    );
    let test = TestSite::new().file("routes/index.html", "<!-- @data x /api/broken --><p>{{x}}</p>");

    let err = test.site_with(registry).render_page("/").await.unwrap_err();
    assert!(matches!(err, folio::FolioError::Handler { .. }));
}

#[tokio::test]
async fn test_malformed_definition_is_error() {
    let test = TestSite::new().file("routes/api/bad.json", "{ nope");
    let err = test.site().invoker().get("/api/bad.json").await.unwrap_err();
    assert!(matches!(err, folio::FolioError::HandlerDefinition { .. }));
}

#[tokio::test]
async fn test_missing_layout_uses_default_shell() {
    let test = TestSite::new().file("routes/about.html", "<p>About</p>");
    fs::remove_file(test.root().join("layout.html")).unwrap();
    let html = render(&test.site(), "/about").await;

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<body><p>About</p></body>"));
    assert!(html.contains("window.route"));
}

#[tokio::test]
async fn test_definition_cached_for_process_lifetime() {
    let test = TestSite::new().file("routes/api/ping.json", r#"{"get": {"body": {"v": 1}}}"#);
    let invoker: EndpointInvoker = test.site().invoker().clone();

    assert_eq!(invoker.get("/api/ping.json").await.unwrap().body, json!({"v": 1}));
    fs::write(test.root().join("routes/api/ping.json"), r#"{"get": {"body": {"v": 2}}}"#).unwrap();
    assert_eq!(invoker.get("/api/ping.json").await.unwrap().body, json!({"v": 1}));

    fs::remove_file(test.root().join("routes/api/ping.json")).unwrap();
    assert_eq!(invoker.get("/api/ping.json").await.unwrap().status, 404);
}

#[tokio::test]
async fn test_post_forwards_body_to_handler() {
    let registry = HandlerRegistry::new("unused").with(
        "api/echo.json",
        HandlerModule::new().post(|req| async move { anyhow::Ok(EndpointResult::ok(req.body).with_status(201)) }),
    );
    let test = TestSite::new();
    let site = test.site_with(registry);

    let mut request = EndpointRequest::get("/api/echo.json");
    request.method = axum::http::Method::POST;
    request.body = json!({"hello": "world"});
    let result = site.invoker().invoke(request).await.unwrap();

    assert_eq!(result.status, 201);
    assert_eq!(result.body, json!({"hello": "world"}));
}

#[tokio::test(start_paused = true)]
async fn test_all_data_calls_finish_before_substitution() {
    let registry = HandlerRegistry::new("unused")
        .with(
            "api/slow.json",
            HandlerModule::new().get(|_req| async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                anyhow::Ok(EndpointResult::ok(json!({"v": "slow"})))
            }),
        )
        .with(
            "api/fast.json",
            HandlerModule::new().get(|_req| async { anyhow::Ok(EndpointResult::ok(json!({"v": "fast"}))) }),
        );
    let test = TestSite::new().file(
        "routes/index.html",
        "<!-- @data a /api/slow --><!-- @data b /api/fast --><p>{{a.v}} {{b.v}}</p>",
    );
    let html = render(&test.site_with(registry), "/").await;

    assert!(html.contains("<p>slow fast</p>"));
}

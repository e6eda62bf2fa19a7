// File: src/pipeline.rs
// Purpose: Page pipeline: resolve, composite, preload, substitute, wrap in layout

use folio_router::{resolve, FsSource, LookupRule, ResolvedMatch};
use maud::html;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

use crate::config::SiteConfig;
use crate::endpoint::definition::SLUG_TOKEN;
use crate::endpoint::{EndpointInvoker, HandlerRegistry};
use crate::error::{FolioError, Result};
use crate::layout::Layout;
use crate::metadata::PageMetadata;
use crate::preload::DataPreloader;
use crate::renderer::substitute;
use crate::template_loader::TemplateCompositor;

/// Stand-in for the slug on a literal match
pub const LITERAL_SLUG: &str = "index";

/// Result of rendering a page path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Rendered(String),
    NotFound,
}

/// Everything needed to serve pages and handlers for one site root
///
/// Nothing here is cached between requests except handler modules, which
/// live in the [`HandlerRegistry`].
#[derive(Debug, Clone)]
pub struct Site {
    pages: FsSource,
    compositor: TemplateCompositor,
    preloader: DataPreloader,
    invoker: EndpointInvoker,
    layout_path: PathBuf,
}

impl Site {
    pub fn new(site: &SiteConfig, registry: HandlerRegistry) -> Self {
        let invoker = EndpointInvoker::new(registry);
        Self {
            pages: FsSource::new(site.routes_path()),
            compositor: TemplateCompositor::new(site.templates_path()),
            preloader: DataPreloader::new(invoker.clone()),
            invoker,
            layout_path: site.layout_path(),
        }
    }

    /// Site whose handlers all come from definition files under the routes
    /// directory
    pub fn from_config(site: &SiteConfig) -> Self {
        Self::new(site, HandlerRegistry::new(site.routes_path()))
    }

    pub fn invoker(&self) -> &EndpointInvoker {
        &self.invoker
    }

    /// Resolve a page path; `/about.html` and `/about` are the same page
    pub fn resolve_page(&self, pathname: &str) -> Option<ResolvedMatch> {
        let pathname = pathname.strip_suffix(".html").unwrap_or(pathname);
        resolve(&self.pages, pathname, &LookupRule::PAGE)
    }

    /// Run the whole page pipeline for `pathname`
    pub async fn render_page(&self, pathname: &str) -> Result<PageOutcome> {
        let Some(found) = self.resolve_page(pathname) else {
            debug!("No page for {}", pathname);
            return Ok(PageOutcome::NotFound);
        };

        let path = self.pages.path_of(&found.file_path);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PageOutcome::NotFound),
            Err(source) => return Err(FolioError::Read { path, source }),
        };

        let slug = found.wildcard_value.as_deref().unwrap_or(LITERAL_SLUG);
        let raw = raw.replace(SLUG_TOKEN, &escape_slug(slug));

        let composed = self.compositor.composite(&raw);

        let preloaded = self.preloader.preload(&composed).await?;
        let content = substitute(&preloaded.content, &preloaded.data);
        if content.is_empty() {
            debug!("{} rendered empty", found.file_path);
            return Ok(PageOutcome::NotFound);
        }

        let metadata = PageMetadata::from_match(&found).with_data(preloaded.data);
        let layout = Layout::load(&self.layout_path)?;
        Ok(PageOutcome::Rendered(layout.assemble(&content, &metadata, None)))
    }
}

/// HTML-escape a slug and neutralise braces
///
/// The slug comes from the URL and is spliced in before the directive stages,
/// so it must not be able to open a tag, a comment directive or a
/// placeholder.
pub fn escape_slug(slug: &str) -> String {
    html! { (slug) }
        .into_string()
        .replace('{', "&#123;")
        .replace('}', "&#125;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site_with(pages: &[(&str, &str)]) -> (TempDir, Site) {
        let dir = TempDir::new().unwrap();
        for (relative, content) in pages {
            let path = dir.path().join("routes").join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let config = SiteConfig {
            root: dir.path().to_path_buf(),
            ..SiteConfig::default()
        };
        let site = Site::from_config(&config);
        (dir, site)
    }

    #[test]
    fn test_html_extension_is_optional() {
        let (_dir, site) = site_with(&[("about.html", "about")]);
        assert_eq!(site.resolve_page("/about"), site.resolve_page("/about.html"));
        assert!(site.resolve_page("/about").is_some());
    }

    #[tokio::test]
    async fn test_slug_token_replaced() {
        let (_dir, site) = site_with(&[("blog/[slug].html", "<p>%slug%</p>"), ("index.html", "%slug%")]);

        let PageOutcome::Rendered(html) = site.render_page("/blog/hello").await.unwrap() else {
            panic!("expected a page");
        };
        assert!(html.contains("<p>hello</p>"));

        let PageOutcome::Rendered(html) = site.render_page("/").await.unwrap() else {
            panic!("expected a page");
        };
        assert!(html.contains("<body>index</body>"));
    }

    #[test]
    fn test_escape_slug() {
        assert_eq!(escape_slug("2024/post-1"), "2024/post-1");
        assert_eq!(
            escape_slug("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
        assert_eq!(escape_slug("{{user.name}}"), "&#123;&#123;user.name&#125;&#125;");
        assert_eq!(escape_slug("a&b\"c"), "a&amp;b&quot;c");
    }

    #[tokio::test]
    async fn test_slug_cannot_inject_markup_or_directives() {
        let (_dir, site) = site_with(&[
            ("blog/[slug].html", "<h1>%slug%</h1>"),
            ("api/secret.json", r#"{"get": {"body": {"token": "s3cr3t"}}}"#),
        ]);

        let PageOutcome::Rendered(html) = site
            .render_page("/blog/<script>alert(1)</script>")
            .await
            .unwrap()
        else {
            panic!("expected a page");
        };
        assert!(html.contains("<h1>&lt;script&gt;alert(1)&lt;/script&gt;</h1>"));
        assert!(!html.contains("<script>alert(1)"));

        let PageOutcome::Rendered(html) = site
            .render_page("/blog/<!-- @data leak /api/secret -->")
            .await
            .unwrap()
        else {
            panic!("expected a page");
        };
        assert!(!html.contains("s3cr3t"));
        assert!(html.contains(r#""data":{}"#));
    }

    #[tokio::test]
    async fn test_empty_page_is_not_found() {
        let (_dir, site) = site_with(&[("blank.html", "")]);
        assert_eq!(site.render_page("/blank").await.unwrap(), PageOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_unknown_page_is_not_found() {
        let (_dir, site) = site_with(&[]);
        assert_eq!(site.render_page("/nothing").await.unwrap(), PageOutcome::NotFound);
        assert_eq!(site.render_page("/../etc/passwd").await.unwrap(), PageOutcome::NotFound);
    }
}

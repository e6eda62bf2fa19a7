//! # Folio
//!
//! File-routed JSON handlers and server-composed HTML pages.
//!
//! A site is a directory:
//!
//! ```text
//! site/
//! ├── layout.html              shell with %head%, %title% and %body%
//! ├── routes/
//! │   ├── index.html           GET /
//! │   ├── blog/[slug].html     GET /blog/anything/below
//! │   └── api/users/[slug].json
//! └── templates/header.html    <!-- @template header -->
//! ```
//!
//! Pages go through four stages: `@template` partials are inlined,
//! `@data` directives are fetched concurrently from the JSON handlers,
//! `{{placeholders}}` are filled from that data, and the result is wrapped in
//! the layout together with a `window.route` script describing the match.

pub mod config;
pub mod directive;
pub mod endpoint;
pub mod error;
pub mod layout;
pub mod metadata;
pub mod pipeline;
pub mod preload;
pub mod renderer;
pub mod request_context;
pub mod template_loader;
pub mod value;

pub use config::{Config, ServerConfig, SiteConfig};
pub use directive::DataBinding;
pub use endpoint::{
    EndpointInvoker, EndpointRequest, EndpointResult, HandlerDefinition, HandlerModule,
    HandlerRegistry,
};
pub use error::{FolioError, Result};
pub use layout::Layout;
pub use metadata::PageMetadata;
pub use pipeline::{PageOutcome, Site};
pub use preload::{DataPreloader, Preloaded};
pub use renderer::{substitute, substitute_with, Renderer};
pub use request_context::{QueryParams, RouteKind, RouteRequest};
pub use template_loader::TemplateCompositor;
pub use value::Lookup;

pub use folio_router::{LookupRule, ResolvedMatch};

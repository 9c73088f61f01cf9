//! Live HTML preview for brew documents
//!
//!     A brew is a markdown document rendered with the Homebrewery parser and styled by a
//!     Homebrewery theme. This crate turns the active brew into HTML and keeps a mounted preview
//!     tree in sync with it as the author types.
//!
//!     This is a pure lib: it powers brew-cli but assumes no shell. The only outside processes it
//!     touches are the Node.js runtime used by the script renderer and the Homebrewery server.
//!
//! Architecture
//!
//!     .
//!     ├── error.rs            # Error enums for every layer
//!     ├── dom                 # TreeNode trait over an rcdom tree, parse and serialize helpers
//!     ├── reconcile.rs        # Positional reconciliation of two trees
//!     ├── presenter.rs        # Persistent mounted tree, bootstrap then reconcile
//!     ├── render              # Renderer trait, registry, script and markdown renderers
//!     ├── links.rs            # Wiki-link substitution before rendering
//!     ├── pipeline.rs         # Active document -> RenderedDocument
//!     ├── settings.rs         # Linked brews and their themes
//!     ├── remote.rs           # Homebrewery server client and parser cache
//!     ├── snippets.rs         # Theme snippets and the snippet menu
//!     └── view.rs             # Mountable BrewView tying pipeline and presenter together
//!
//! Core Algorithm
//!
//!     The first render builds the presentation tree. Every later render parses the new markup
//!     into a scratch tree and reconciles the live content against it, so subtrees that did not
//!     change keep their identity (see ./reconcile.rs). The stylesheet link is only rewritten when
//!     the theme URL changes.
//!
//! Testing
//!
//!     tests
//!     ├── lib.rs              # Entry point, includes the modules below
//!     ├── presenter           # Presenter behaviour through the public API
//!     ├── convergence         # Property tests: convergence and idempotence
//!     └── pipeline            # Pipeline and view with the offline markdown renderer
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
pub mod dom;
pub mod error;
pub mod links;
pub mod pipeline;
pub mod presenter;
pub mod reconcile;
pub mod remote;
pub mod render;
pub mod settings;
pub mod snippets;
pub mod view;

pub use error::{DomError, FetchError, PipelineError, PresentError, RenderError};
pub use pipeline::{DocumentSource, FileDocumentSource, RenderPipeline};
pub use presenter::{Mountable, PresentMode, PresentReport, Presenter, RenderedDocument};
pub use reconcile::ReconcileStats;
pub use remote::{Fetch, HttpFetcher, ParserCache, RemoteClient, ThemeInfo};
pub use render::{Renderer, RendererRegistry};
pub use settings::{BrewSettings, LinkedBrew};
pub use view::BrewView;

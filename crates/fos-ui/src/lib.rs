//! fOS UI
//!
//! A component runtime: parts render into tag trees, the tag trees are
//! written into a host document, and native events come back through
//! the message bus to the part that bound them.
//!
//! # Example
//! ```
//! use fos_ui::prelude::*;
//!
//! struct Hello;
//!
//! impl Part for Hello {
//!     type State = String;
//!
//!     fn render(&self, name: &String, _: &mut RenderCx<'_>, tag: &mut Tag) -> anyhow::Result<()> {
//!         tag.p(".greeting").text(format!("Hello, {name}"));
//!         Ok(())
//!     }
//! }
//!
//! let rt = fos_ui::launch(r#"<div id="app"></div>"#, "app", |_| Hello, "fOS".to_string()).unwrap();
//! let app = rt.host().resolve("app").unwrap();
//! assert_eq!(rt.host().inner_markup(app), r#"<p class="greeting">Hello, fOS</p>"#);
//! ```

use anyhow::Context;
use fos_bus::KeySource;

// Re-export sub-crates for advanced usage
pub use fos_bus as bus;
pub use fos_host as host;
pub use fos_part as part;
pub use fos_tag as tag;

pub use fos_host::MemoryHost;
pub use fos_part::{Part, Runtime, RuntimeConfig};

/// Runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything a part implementation usually needs
pub mod prelude {
    pub use fos_bus::{BindExt, Message, MessageKey};
    pub use fos_host::{EventKind, Host, MemoryHost};
    pub use fos_part::{Init, Part, PartCx, PartId, RenderCx, Runtime, RuntimeConfig};
    pub use fos_tag::{Attrs, Dataset, Style, Tag};
}

/// Parse `markup` into a [`MemoryHost`] and mount the part built by
/// `build` at `location`.
///
/// `build` receives the runtime's own [`KeySource`], so keys it issues
/// never collide with keys the parts issue during `init`.
pub fn launch<P, F>(markup: &str, location: &str, build: F, state: P::State) -> anyhow::Result<Runtime<MemoryHost>>
where
    P: Part,
    F: FnOnce(&mut KeySource) -> P,
{
    launch_with_config(markup, location, build, state, RuntimeConfig::default())
}

pub fn launch_with_config<P, F>(
    markup: &str,
    location: &str,
    build: F,
    state: P::State,
    config: RuntimeConfig,
) -> anyhow::Result<Runtime<MemoryHost>>
where
    P: Part,
    F: FnOnce(&mut KeySource) -> P,
{
    let host = MemoryHost::from_markup(markup).context("Failed to parse host document")?;
    let mut runtime = Runtime::with_config(host, config);
    let part = build(runtime.keys());
    runtime
        .mount(location, part, state)
        .with_context(|| format!("Failed to mount at {location:?}"))?;
    tracing::info!("fOS UI {} launched at {}", VERSION, location);
    Ok(runtime)
}

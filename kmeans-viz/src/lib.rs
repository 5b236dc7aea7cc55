//! Service layer around the `kmeans` engine: JSON-lines wire protocol,
//! request handlers, optional per-session step state, synthetic datasets,
//! cluster summaries and SVG plots.

pub mod context;
pub mod dataset;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod plot;
pub mod protocol;
pub mod session;
pub mod transport;

pub use context::VizContext;
pub use error::{VizError, VizResult};
pub use handlers::Handlers;
pub use protocol::{Request, Response};

pub mod errors;
pub mod context;
pub mod settings;
pub mod events;
pub mod identity;
pub mod suppress;
pub mod kiss_metrics;
pub mod tags;      // tag library and analytical locations

use errors::Result;
use context::Context;
use settings::Settings;

/// Validate `settings` and render the KISSmetrics snippet for one request.
pub fn render(settings: &Settings, context: &Context) -> Result<String> {
    KissMetricsNode::new(settings)?.render(context)
}

/// Re-export the most-used types for callers that render directly.
pub use kiss_metrics::{render_tracking_code, Command, KissMetricsNode};
pub use events::Event;
pub use errors::AnalyticalError;
pub use tags::{AnalyticalRegistry, Library, Node};

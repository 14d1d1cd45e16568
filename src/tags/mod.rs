use std::collections::HashMap;
use std::sync::Arc;

use crate::context::Context;
use crate::errors::{AnalyticalError, Result};
use crate::settings::Settings;

/// A compiled template node that renders against a request context.
pub trait Node: Send + Sync {
    fn render(&self, context: &Context) -> Result<String>;
}

/// Trait for template tags: turns a tag token into a node.
pub trait Tag: Send + Sync {
    fn name(&self) -> &'static str;
    fn compile(&self, bits: &[&str], settings: &Settings) -> Result<Arc<dyn Node>>;
}

/// Split `{% name arg .. %}` (or a bare `name arg ..`) into its words.
pub fn split_contents(token: &str) -> Vec<&str> {
    let t = token.trim();
    let t = t
        .strip_prefix("{%")
        .and_then(|t| t.strip_suffix("%}"))
        .unwrap_or(t);
    t.split_whitespace().collect()
}

/// Thread-safe tag library.
#[derive(Clone, Default)]
pub struct Library {
    inner: Arc<HashMap<&'static str, Arc<dyn Tag>>>,
}

impl Library {
    pub fn new() -> Self { Self::default() }

    pub fn with_builtins() -> Self {
        let mut lib = Self::new();
        lib.register(builtins::KissMetrics);
        lib
    }

    pub fn register<T: Tag + 'static>(&mut self, tag: T) {
        let mut_map = Arc::make_mut(&mut self.inner);
        mut_map.insert(tag.name(), Arc::new(tag));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tag>> {
        self.inner.get(name).cloned()
    }

    /// Compile a tag token with whichever tag its first word names.
    pub fn compile(&self, token: &str, settings: &Settings) -> Result<Arc<dyn Node>> {
        let bits = split_contents(token);
        let name = bits
            .first()
            .ok_or_else(|| AnalyticalError::TemplateSyntax("empty tag".into()))?;
        let tag = self
            .get(name)
            .ok_or_else(|| AnalyticalError::TemplateSyntax(format!("invalid block tag: '{name}'")))?;
        tag.compile(&bits, settings)
    }
}

type NodeFactory = Arc<dyn Fn(&Settings) -> Result<Arc<dyn Node>> + Send + Sync>;

/// Nodes contributed by each analytics service, grouped by page location
/// (`head_top`, `head_bottom`, `body_top`, `body_bottom`).
#[derive(Clone, Default)]
pub struct AnalyticalRegistry {
    locations: HashMap<&'static str, Vec<NodeFactory>>,
}

impl AnalyticalRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn add_node<F>(&mut self, location: &'static str, factory: F)
    where
        F: Fn(&Settings) -> Result<Arc<dyn Node>> + Send + Sync + 'static,
    {
        self.locations.entry(location).or_default().push(Arc::new(factory));
    }

    pub fn node_count(&self, location: &str) -> usize {
        self.locations.get(location).map_or(0, Vec::len)
    }

    /// Render every node registered for `location`, in registration order.
    pub fn render(&self, location: &str, settings: &Settings, context: &Context) -> Result<String> {
        let mut out = String::new();
        for factory in self.locations.get(location).into_iter().flatten() {
            out.push_str(&(**factory)(settings)?.render(context)?);
        }
        Ok(out)
    }
}

pub mod builtins {
    use super::*;
    use crate::kiss_metrics::KissMetricsNode;

    pub struct KissMetrics;
    impl Tag for KissMetrics {
        fn name(&self) -> &'static str { "kiss_metrics" }
        fn compile(&self, bits: &[&str], settings: &Settings) -> Result<Arc<dyn Node>> {
            if bits.len() > 1 {
                return Err(AnalyticalError::TemplateSyntax(format!(
                    "'{}' takes no arguments",
                    bits[0]
                )));
            }
            Ok(Arc::new(KissMetricsNode::new(settings)?))
        }
    }

    /// Hook the KISSmetrics node into the `head_top` location.
    /// Fails right away if the service is not configured.
    pub fn contribute_to_analytical(
        registry: &mut AnalyticalRegistry,
        settings: &Settings,
    ) -> Result<()> {
        KissMetricsNode::new(settings)?;
        registry.add_node("head_top", |s: &Settings| -> Result<Arc<dyn Node>> {
            Ok(Arc::new(KissMetricsNode::new(s)?))
        });
        Ok(())
    }
}

//! Layered merging
//!
//! Hierarchical configuration is a left fold of [`blend_defaults`]: each
//! layer is merged over everything before it, so later layers win. A typical
//! stack is global defaults, then organization, then repository, then local
//! overrides.
//!
//! [`blend_defaults`]: crate::blend_defaults

use crate::engine::{BlendOptions, Blender};
use crate::error::Result;
use crate::value::Value;

/// Merge layers in order, later layers overriding earlier ones.
///
/// An empty iterator yields [`Value::Null`]; a single layer is returned as is.
pub fn blend_layers<'a, I>(layers: I, options: &BlendOptions) -> Result<Value>
where
    I: IntoIterator<Item = &'a Value>,
{
    Blender::new(options).blend_layers(layers)
}

impl Blender {
    /// Merge layers in order with this engine's strategy table.
    pub fn blend_layers<'a, I>(&self, layers: I) -> Result<Value>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut layers = layers.into_iter();
        let Some(first) = layers.next() else {
            return Ok(Value::Null);
        };

        let mut merged = first.clone();
        for (index, layer) in layers.enumerate() {
            tracing::debug!(layer = index + 1, kind = %layer.kind(), "Blending layer");
            merged = self.blend(&merged, layer)?;
        }
        Ok(merged)
    }
}

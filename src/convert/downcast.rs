//! Model → view conversion.

use super::registry::ConversionRegistry;
use super::rule::ConversionRule;
use crate::document::TextRun;
use crate::error::Result;
use crate::schema::AttributeSchema;
use crate::view::ViewNode;

/// Renders text runs as view nodes.
///
/// Each attribute with a registered rule wraps the run's text in the rule's
/// element. Wraps nest in registration order: the first registered rule is
/// innermost, the last registered is outermost. Empty values still wrap.
#[derive(Debug, Clone, Copy)]
pub struct ModelToViewConverter<'a> {
    schema: &'a AttributeSchema,
    registry: &'a ConversionRegistry,
}

impl<'a> ModelToViewConverter<'a> {
    pub const fn new(schema: &'a AttributeSchema, registry: &'a ConversionRegistry) -> Self {
        Self { schema, registry }
    }

    /// Convert one run.
    ///
    /// Fails with `SchemaViolation` if the run carries an undeclared
    /// attribute. Declared attributes without a rule are not rendered.
    pub fn convert(&self, run: &TextRun) -> Result<Vec<ViewNode>> {
        let mut wraps: Vec<(usize, &ConversionRule, &str)> = Vec::new();
        for (name, value) in run.attributes() {
            self.schema.require(name)?;
            match self.registry.position(name.as_str()) {
                Some(position) => wraps.push((position, &self.registry.rules()[position], value.as_str())),
                None => tracing::trace!(attribute = %name, "no conversion rule, attribute not rendered"),
            }
        }
        wraps.sort_by_key(|(position, _, _)| *position);

        let mut node = ViewNode::Text(run.text().to_string());
        for (_, rule, value) in wraps {
            tracing::trace!(attribute = %rule.attribute(), value, "wrapping run");
            node = ViewNode::Element(rule.view_for(value).with_children(vec![node]));
        }
        Ok(vec![node])
    }

    /// Convert a run sequence, merging adjacent equal wrappers.
    ///
    /// The output does not depend on where run boundaries fall.
    pub fn convert_runs(&self, runs: &[TextRun]) -> Result<Vec<ViewNode>> {
        let mut nodes = Vec::with_capacity(runs.len());
        for run in runs {
            nodes.extend(self.convert(run)?);
        }
        Ok(merge_adjacent(nodes))
    }
}

/// Join neighbouring text nodes and neighbouring elements with the same
/// opening tag, recursively. Empty text nodes are dropped.
fn merge_adjacent(nodes: Vec<ViewNode>) -> Vec<ViewNode> {
    let mut out: Vec<ViewNode> = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            ViewNode::Text(text) => {
                if text.is_empty() {
                    continue;
                }
                if let Some(ViewNode::Text(last)) = out.last_mut() {
                    last.push_str(&text);
                } else {
                    out.push(ViewNode::Text(text));
                }
            }
            ViewNode::Element(mut element) => {
                if let Some(ViewNode::Element(last)) = out.last_mut() {
                    if last.same_wrapper(&element) {
                        last.children_mut().append(element.children_mut());
                        continue;
                    }
                }
                out.push(ViewNode::Element(element));
            }
        }
    }

    for node in &mut out {
        if let ViewNode::Element(element) = node {
            let children = std::mem::take(element.children_mut());
            *element.children_mut() = merge_adjacent(children);
        }
    }
    out
}

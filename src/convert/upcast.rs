//! View → model conversion.

use super::registry::ConversionRegistry;
use crate::document::{Attributes, TextRun, normalize_runs};
use crate::error::{Error, Result};
use crate::schema::AttributeSchema;
use crate::view::{ViewElement, ViewNode};

/// What upcast does with an element no rule recognizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownElementPolicy {
    /// Drop the wrapper and keep its text.
    #[default]
    Flatten,
    /// Fail with `UnrecognizedElement`.
    Reject,
}

/// Reads text runs out of a view tree.
#[derive(Debug, Clone, Copy)]
pub struct ViewToModelConverter<'a> {
    schema: &'a AttributeSchema,
    registry: &'a ConversionRegistry,
    policy: UnknownElementPolicy,
}

impl<'a> ViewToModelConverter<'a> {
    pub const fn new(
        schema: &'a AttributeSchema,
        registry: &'a ConversionRegistry,
        policy: UnknownElementPolicy,
    ) -> Self {
        Self {
            schema,
            registry,
            policy,
        }
    }

    /// Convert a sequence of sibling nodes into normalized runs.
    pub fn convert(&self, nodes: &[ViewNode]) -> Result<Vec<TextRun>> {
        let mut runs = Vec::new();
        self.walk(nodes, &Attributes::new(), &mut runs)?;
        Ok(normalize_runs(runs))
    }

    /// Convert a single element subtree.
    pub fn convert_element(&self, element: &ViewElement) -> Result<Vec<TextRun>> {
        let mut runs = Vec::new();
        self.walk_element(element, &Attributes::new(), &mut runs)?;
        Ok(normalize_runs(runs))
    }

    fn walk(
        &self,
        nodes: &[ViewNode],
        inherited: &Attributes,
        runs: &mut Vec<TextRun>,
    ) -> Result<()> {
        for node in nodes {
            match node {
                ViewNode::Text(text) => {
                    runs.push(TextRun::from_parts(text.clone(), inherited.clone()));
                }
                ViewNode::Element(element) => self.walk_element(element, inherited, runs)?,
            }
        }
        Ok(())
    }

    fn walk_element(
        &self,
        element: &ViewElement,
        inherited: &Attributes,
        runs: &mut Vec<TextRun>,
    ) -> Result<()> {
        // A rule whose extractor declines lets later rules try.
        let recognized = self
            .registry
            .rules()
            .iter()
            .find_map(|rule| rule.extract(element).map(|value| (rule, value)));

        let Some((rule, value)) = recognized else {
            return match self.policy {
                UnknownElementPolicy::Flatten => {
                    tracing::debug!(element = element.name(), "flattening unrecognized element");
                    self.walk(element.children(), inherited, runs)
                }
                UnknownElementPolicy::Reject => {
                    Err(Error::UnrecognizedElement(element.name().to_string()))
                }
            };
        };

        self.schema.require(rule.attribute())?;
        let mut scoped = inherited.clone();
        scoped.insert(rule.attribute().clone(), value);

        let before = runs.len();
        self.walk(element.children(), &scoped, runs)?;
        if runs.len() == before {
            // Keep an empty attributed span visible in the model.
            runs.push(TextRun::from_parts(String::new(), scoped));
        }
        Ok(())
    }
}

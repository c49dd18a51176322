//! The conversion engine: one schema, one registry, one upcast policy.
//!
//! Rules are registered while building; afterwards the engine is read-only
//! and every pass takes `&self`, so one engine can serve concurrent passes.

use crate::convert::{
    ConversionRegistry, ConversionRule, ModelToViewConverter, UnknownElementPolicy,
    ViewToModelConverter,
};
use crate::document::{AttributeName, Document, TextRun};
use crate::error::Result;
use crate::perf;
use crate::schema::AttributeSchema;
use crate::view::{self, ViewNode};

#[derive(Debug, Clone, Default)]
pub struct Engine {
    schema: AttributeSchema,
    registry: ConversionRegistry,
    policy: UnknownElementPolicy,
}

/// Collects declarations and rules before the engine is frozen.
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    schema: AttributeSchema,
    rules: Vec<ConversionRule>,
    policy: UnknownElementPolicy,
}

impl EngineBuilder {
    /// Declare an attribute that has no view representation.
    #[must_use]
    pub fn declare(mut self, name: impl Into<AttributeName>) -> Self {
        self.schema.declare(name);
        self
    }

    /// Declare the rule's attribute and queue the rule for registration.
    #[must_use]
    pub fn rule(mut self, rule: ConversionRule) -> Self {
        self.schema.declare(rule.attribute().clone());
        self.rules.push(rule);
        self
    }

    #[must_use]
    pub const fn policy(mut self, policy: UnknownElementPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Register the queued rules in order.
    ///
    /// Fails with `DuplicateAttribute` when two rules share an attribute.
    pub fn build(self) -> Result<Engine> {
        let mut registry = ConversionRegistry::new();
        for rule in self.rules {
            registry.register(rule)?;
        }
        Ok(Engine {
            schema: self.schema,
            registry,
            policy: self.policy,
        })
    }
}

impl Engine {
    /// Engine with no attributes or rules yet.
    pub fn new(policy: UnknownElementPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Engine knowing only `abbreviation` ↔ `<abbr title>`.
    pub fn with_abbreviation() -> Result<Self> {
        Self::builder().rule(ConversionRule::abbreviation()).build()
    }

    pub const fn schema(&self) -> &AttributeSchema {
        &self.schema
    }

    pub const fn registry(&self) -> &ConversionRegistry {
        &self.registry
    }

    pub const fn policy(&self) -> UnknownElementPolicy {
        self.policy
    }

    const fn model_to_view(&self) -> ModelToViewConverter<'_> {
        ModelToViewConverter::new(&self.schema, &self.registry)
    }

    const fn view_to_model(&self) -> ViewToModelConverter<'_> {
        ViewToModelConverter::new(&self.schema, &self.registry, self.policy)
    }

    /// Downcast a single run.
    pub fn downcast(&self, run: &TextRun) -> Result<Vec<ViewNode>> {
        self.model_to_view().convert(run)
    }

    /// Downcast a whole document, merging adjacent equal wrappers.
    pub fn downcast_document(&self, document: &Document) -> Result<Vec<ViewNode>> {
        let _scope = perf::scope("downcast");
        let nodes = self.model_to_view().convert_runs(document.runs())?;
        tracing::debug!(runs = document.runs().len(), nodes = nodes.len(), "downcast document");
        Ok(nodes)
    }

    /// Upcast sibling view nodes into runs.
    pub fn upcast(&self, nodes: &[ViewNode]) -> Result<Vec<TextRun>> {
        self.view_to_model().convert(nodes)
    }

    pub fn upcast_document(&self, nodes: &[ViewNode]) -> Result<Document> {
        let _scope = perf::scope("upcast");
        let runs = self.upcast(nodes)?;
        tracing::debug!(nodes = nodes.len(), runs = runs.len(), "upcast document");
        Ok(Document::from_runs(runs))
    }

    /// Parse HTML and upcast it.
    pub fn load_html(&self, markup: &str) -> Result<Document> {
        let nodes = {
            let _scope = perf::scope("parse");
            view::parse_fragment(markup)
        };
        self.upcast_document(&nodes)
    }

    /// Downcast and serialize to HTML.
    pub fn render_html(&self, document: &Document) -> Result<String> {
        let nodes = self.downcast_document(document)?;
        let _scope = perf::scope("serialize");
        view::serialize(&nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }

    #[test]
    fn test_new_engine_passes_text_through() {
        let engine = Engine::new(UnknownElementPolicy::Flatten);
        let doc = engine.load_html(r#"<abbr title="t">x</abbr>"#).unwrap();
        assert_eq!(doc.runs(), &[TextRun::new("x")]);
        assert!(engine.registry().is_empty());
    }

    #[test]
    fn test_builder_declares_rule_attributes() {
        let engine = Engine::with_abbreviation().unwrap();
        assert!(engine.schema().is_allowed("abbreviation"));
        assert_eq!(engine.registry().len(), 1);
        assert_eq!(engine.policy(), UnknownElementPolicy::Flatten);
    }

    #[test]
    fn test_builder_rejects_duplicate_rules() {
        let err = Engine::builder()
            .rule(ConversionRule::abbreviation())
            .rule(ConversionRule::attribute_to_element("abbreviation", "acronym", "title"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateAttribute(AttributeName::from("abbreviation"))
        );
    }

    #[test]
    fn test_load_html() {
        let engine = Engine::with_abbreviation().unwrap();
        let doc = engine
            .load_html(r#"The <abbr title="World Wide Web">WWW</abbr>."#)
            .unwrap();
        assert_eq!(
            doc.runs(),
            &[
                TextRun::new("The "),
                TextRun::new("WWW").with_attribute("abbreviation", "World Wide Web"),
                TextRun::new("."),
            ]
        );
    }

    #[test]
    fn test_render_html() {
        let engine = Engine::with_abbreviation().unwrap();
        let doc = Document::from_runs(vec![
            TextRun::new("The "),
            TextRun::new("WWW").with_attribute("abbreviation", "World Wide Web"),
        ]);
        assert_eq!(
            engine.render_html(&doc).unwrap(),
            r#"The <abbr title="World Wide Web">WWW</abbr>"#
        );
    }

    #[test]
    fn test_strict_engine_rejects_unknown_markup() {
        let engine = Engine::builder()
            .rule(ConversionRule::abbreviation())
            .policy(UnknownElementPolicy::Reject)
            .build()
            .unwrap();
        assert_eq!(
            engine.load_html("<b>bold</b>").unwrap_err(),
            Error::UnrecognizedElement("b".to_string())
        );
    }

    #[test]
    fn test_declared_only_attribute_is_dropped_on_render() {
        let engine = Engine::builder()
            .rule(ConversionRule::abbreviation())
            .declare("comment")
            .build()
            .unwrap();
        let doc = Document::from_runs(vec![TextRun::new("x").with_attribute("comment", "hi")]);
        assert_eq!(engine.render_html(&doc).unwrap(), "x");
    }
}

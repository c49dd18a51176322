//! Attribute mutations over a range of text.
//!
//! These are the operations a host editor command calls: setting an
//! attribute on a selected range, clearing it, and inserting new text that
//! already carries attributes (the collapsed-selection case).

use std::ops::Range;

use super::types::{AttributeName, AttributeValue, Attributes, Document, TextRun};
use crate::error::{Error, Result};
use crate::schema::AttributeSchema;

impl Document {
    /// Apply `name = value` to every character in `range`.
    pub fn set_attribute(
        &mut self,
        schema: &AttributeSchema,
        range: Range<usize>,
        name: impl Into<AttributeName>,
        value: impl Into<AttributeValue>,
    ) -> Result<()> {
        let name = name.into();
        schema.require(&name)?;
        self.check_range(&range)?;
        if range.is_empty() {
            return Ok(());
        }

        let value = value.into();
        let span = self.isolate(range);
        for run in &mut self.runs_mut()[span] {
            run.set_attribute(name.clone(), value.clone());
        }
        self.normalize();
        Ok(())
    }

    /// Remove `name` from every character in `range`.
    pub fn remove_attribute(
        &mut self,
        schema: &AttributeSchema,
        range: Range<usize>,
        name: &AttributeName,
    ) -> Result<()> {
        schema.require(name)?;
        self.check_range(&range)?;
        if range.is_empty() {
            return Ok(());
        }

        let span = self.isolate(range);
        for run in &mut self.runs_mut()[span] {
            run.remove_attribute(name.as_str());
        }
        self.normalize();
        Ok(())
    }

    /// Insert `text` at `offset` as a run carrying `attributes`.
    pub fn insert_text(
        &mut self,
        schema: &AttributeSchema,
        offset: usize,
        text: impl Into<String>,
        attributes: Attributes,
    ) -> Result<()> {
        for name in attributes.keys() {
            schema.require(name)?;
        }
        self.check_range(&(offset..offset))?;

        let index = self.boundary_at(offset);
        self.runs_mut()
            .insert(index, TextRun::from_parts(text.into(), attributes));
        self.normalize();
        Ok(())
    }

    fn check_range(&self, range: &Range<usize>) -> Result<()> {
        let len = self.char_len();
        if range.start > range.end || range.end > len {
            return Err(Error::OutOfRange {
                start: range.start,
                end: range.end,
                len,
            });
        }
        Ok(())
    }

    /// Split runs so `range` covers whole runs; returns their index range.
    ///
    /// Empty runs sitting on the leading edge belong to the text before the
    /// range and are left out.
    fn isolate(&mut self, range: Range<usize>) -> Range<usize> {
        let mut first = self.boundary_at(range.start);
        let last = self.boundary_at(range.end);
        while first < last && self.runs()[first].char_len() == 0 {
            first += 1;
        }
        first..last
    }

    /// Ensure a run starts at character `offset` and return its index.
    fn boundary_at(&mut self, offset: usize) -> usize {
        let runs = self.runs_mut();
        let mut pos = 0;
        for index in 0..runs.len() {
            if pos == offset {
                return index;
            }
            let len = runs[index].char_len();
            if offset < pos + len {
                let (head, tail) = runs[index].split_at_char(offset - pos);
                runs[index] = head;
                runs.insert(index + 1, tail);
                return index + 1;
            }
            pos += len;
        }
        runs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> AttributeSchema {
        let mut schema = AttributeSchema::new();
        schema.declare("abbreviation");
        schema
    }

    fn abbr() -> AttributeName {
        AttributeName::from("abbreviation")
    }

    #[test]
    fn test_set_attribute_splits_run() {
        let mut doc = Document::from_runs(vec![TextRun::new("see the WWW now")]);
        doc.set_attribute(&schema(), 8..11, "abbreviation", "World Wide Web")
            .unwrap();

        assert_eq!(
            doc.runs(),
            &[
                TextRun::new("see the "),
                TextRun::new("WWW").with_attribute("abbreviation", "World Wide Web"),
                TextRun::new(" now"),
            ]
        );
    }

    #[test]
    fn test_set_attribute_across_runs_merges() {
        let mut doc = Document::from_runs(vec![
            TextRun::new("ab").with_attribute("abbreviation", "x"),
            TextRun::new("cd"),
        ]);
        doc.set_attribute(&schema(), 0..4, "abbreviation", "x").unwrap();
        assert_eq!(
            doc.runs(),
            &[TextRun::new("abcd").with_attribute("abbreviation", "x")]
        );
    }

    #[test]
    fn test_set_attribute_overwrites_value() {
        let mut doc = Document::from_runs(vec![
            TextRun::new("HTML").with_attribute("abbreviation", "old"),
        ]);
        doc.set_attribute(&schema(), 0..2, "abbreviation", "new")
            .unwrap();
        assert_eq!(doc.runs()[0].attribute("abbreviation"), Some("new"));
        assert_eq!(doc.runs()[1].attribute("abbreviation"), Some("old"));
    }

    #[test]
    fn test_set_undeclared_attribute_fails() {
        let mut doc = Document::from_runs(vec![TextRun::new("abc")]);
        let err = doc.set_attribute(&schema(), 0..1, "bold", "").unwrap_err();
        assert_eq!(err, Error::SchemaViolation(AttributeName::from("bold")));
        assert_eq!(doc.runs(), &[TextRun::new("abc")]);
    }

    #[test]
    fn test_set_attribute_out_of_range() {
        let mut doc = Document::from_runs(vec![TextRun::new("abc")]);
        let err = doc
            .set_attribute(&schema(), 2..9, "abbreviation", "x")
            .unwrap_err();
        assert_eq!(
            err,
            Error::OutOfRange {
                start: 2,
                end: 9,
                len: 3
            }
        );
    }

    #[test]
    fn test_empty_range_is_noop() {
        let mut doc = Document::from_runs(vec![TextRun::new("abc")]);
        doc.set_attribute(&schema(), 1..1, "abbreviation", "x").unwrap();
        assert_eq!(doc.runs(), &[TextRun::new("abc")]);
    }

    #[test]
    fn test_set_attribute_skips_empty_run_at_range_start() {
        let mut schema = schema();
        schema.declare("definition");
        let marker = TextRun::new("").with_attribute("abbreviation", "t");
        let mut doc = Document::from_runs(vec![
            TextRun::new("a"),
            marker.clone(),
            TextRun::new("bc"),
        ]);
        doc.set_attribute(&schema, 1..3, "definition", "d").unwrap();
        assert_eq!(
            doc.runs(),
            &[
                TextRun::new("a"),
                marker,
                TextRun::new("bc").with_attribute("definition", "d"),
            ]
        );
    }

    #[test]
    fn test_remove_attribute_restores_plain_text() {
        let mut doc = Document::from_runs(vec![
            TextRun::new("a"),
            TextRun::new("WWW").with_attribute("abbreviation", "web"),
            TextRun::new("b"),
        ]);
        doc.remove_attribute(&schema(), 1..4, &abbr()).unwrap();
        assert_eq!(doc.runs(), &[TextRun::new("aWWWb")]);
    }

    #[test]
    fn test_remove_attribute_partial() {
        let mut doc = Document::from_runs(vec![
            TextRun::new("WWW").with_attribute("abbreviation", "web"),
        ]);
        doc.remove_attribute(&schema(), 0..1, &abbr()).unwrap();
        assert_eq!(
            doc.runs(),
            &[
                TextRun::new("W"),
                TextRun::new("WW").with_attribute("abbreviation", "web"),
            ]
        );
    }

    #[test]
    fn test_insert_text_with_attribute() {
        let mut doc = Document::from_runs(vec![TextRun::new("Hello  world")]);
        let mut attributes = Attributes::new();
        attributes.insert(abbr(), "What You See Is What You Get".to_string());
        doc.insert_text(&schema(), 6, "WYSIWYG", attributes).unwrap();

        assert_eq!(doc.text(), "Hello WYSIWYG world");
        assert_eq!(
            doc.runs()[1],
            TextRun::new("WYSIWYG").with_attribute("abbreviation", "What You See Is What You Get")
        );
    }

    #[test]
    fn test_insert_text_at_end_and_start() {
        let mut doc = Document::from_runs(vec![TextRun::new("mid")]);
        doc.insert_text(&schema(), 3, "!", Attributes::new()).unwrap();
        doc.insert_text(&schema(), 0, ">", Attributes::new()).unwrap();
        assert_eq!(doc.runs(), &[TextRun::new(">mid!")]);
    }

    #[test]
    fn test_insert_into_empty_document() {
        let mut doc = Document::empty();
        let mut attributes = Attributes::new();
        attributes.insert(abbr(), String::new());
        doc.insert_text(&schema(), 0, "X", attributes).unwrap();
        assert_eq!(
            doc.runs(),
            &[TextRun::new("X").with_attribute("abbreviation", "")]
        );
    }

    #[test]
    fn test_insert_past_end_fails() {
        let mut doc = Document::from_runs(vec![TextRun::new("ab")]);
        let err = doc
            .insert_text(&schema(), 5, "x", Attributes::new())
            .unwrap_err();
        assert!(matches!(err, Error::OutOfRange { len: 2, .. }));
    }

    #[test]
    fn test_insert_undeclared_attribute_fails() {
        let mut doc = Document::empty();
        let mut attributes = Attributes::new();
        attributes.insert(AttributeName::from("bold"), String::new());
        assert!(matches!(
            doc.insert_text(&schema(), 0, "x", attributes),
            Err(Error::SchemaViolation(_))
        ));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn set_attribute_preserves_text(
                text in "[a-z ]{1,40}",
                start in 0..40usize,
                len in 0..40usize,
            ) {
                let mut doc = Document::from_runs(vec![TextRun::new(text.clone())]);
                let total = doc.char_len();
                let start = start.min(total);
                let end = (start + len).min(total);
                doc.set_attribute(&schema(), start..end, "abbreviation", "t").unwrap();
                prop_assert_eq!(doc.text(), text);
            }

            #[test]
            fn set_then_remove_is_identity(
                text in "[a-z ]{1,40}",
                start in 0..40usize,
                len in 0..40usize,
            ) {
                let original = Document::from_runs(vec![TextRun::new(text)]);
                let mut doc = original.clone();
                let total = doc.char_len();
                let start = start.min(total);
                let end = (start + len).min(total);
                doc.set_attribute(&schema(), start..end, "abbreviation", "t").unwrap();
                doc.remove_attribute(&schema(), start..end, &abbr()).unwrap();
                prop_assert_eq!(doc, original);
            }

            #[test]
            fn runs_stay_normalized(
                text in "[a-z]{2,20}",
                ranges in prop::collection::vec((0..20usize, 0..20usize), 1..6),
            ) {
                let mut doc = Document::from_runs(vec![TextRun::new(text)]);
                let total = doc.char_len();
                for (i, (a, b)) in ranges.into_iter().enumerate() {
                    let (start, end) = (a.min(b).min(total), a.max(b).min(total));
                    let value = if i % 2 == 0 { "even" } else { "odd" };
                    doc.set_attribute(&schema(), start..end, "abbreviation", value).unwrap();
                }
                for pair in doc.runs().windows(2) {
                    prop_assert_ne!(pair[0].attributes(), pair[1].attributes());
                }
            }
        }
    }
}

//! Output sinks receiving the rendered token stream.
//!
//! The renderer never builds strings itself; it calls into a [`Formatter`] token by token so
//! that a host can colour keywords, hyperlink references or collect annotations. Two sinks are
//! provided:
//!
//! - [`TextFormatter`] - plain text with four-space indentation
//! - [`FragmentFormatter`] - the typed token stream as a `Vec<Fragment>`, replayable into any
//!   other formatter

use crate::model::{
    EventReference, FieldReference, MethodReference, PropertyReference, TypeReference,
};

/// The model object a declaration or reference fragment points at.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    /// An assembly, by display name
    Assembly(String),
    /// A module, by name
    Module(String),
    /// A namespace, by name
    Namespace(String),
    /// A type
    Type(TypeReference),
    /// A method or constructor
    Method(MethodReference),
    /// A field
    Field(FieldReference),
    /// A property
    Property(PropertyReference),
    /// An event
    Event(EventReference),
    /// A method parameter, by name
    Parameter(String),
    /// A local variable, by name
    Variable(String),
    /// A jump label
    Label(String),
}

/// Receiver of rendered output.
///
/// Indentation is logical: [`Formatter::write_indent`] and [`Formatter::write_outdent`] change
/// the level applied to lines started afterwards.
pub trait Formatter {
    /// Punctuation, operators and other plain text
    fn write(&mut self, text: &str);

    /// A keyword of the target syntax
    fn write_keyword(&mut self, keyword: &str);

    /// A literal value, already escaped
    fn write_literal(&mut self, literal: &str);

    /// A comment, including its comment marker
    fn write_comment(&mut self, comment: &str);

    /// The name introduced by a declaration
    fn write_declaration(&mut self, name: &str, target: Option<&Entity>);

    /// A name referring to a declaration elsewhere; `description` is a tooltip text
    fn write_reference(&mut self, name: &str, description: &str, target: Option<&Entity>);

    /// Increase the indentation level
    fn write_indent(&mut self);

    /// Decrease the indentation level
    fn write_outdent(&mut self);

    /// End the current line
    fn write_line(&mut self);

    /// An annotation that is not part of the source text
    fn write_property(&mut self, name: &str, value: &str);
}

/// Plain-text sink.
#[derive(Debug, Default, Clone)]
pub struct TextFormatter {
    text: String,
    level: usize,
    line_started: bool,
    properties: Vec<(String, String)>,
}

impl TextFormatter {
    /// Create an empty text sink
    #[must_use]
    pub fn new() -> Self {
        TextFormatter::default()
    }

    /// The text written so far
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the sink, returning its text
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }

    /// Annotations received through [`Formatter::write_property`], in order
    #[must_use]
    pub fn properties(&self) -> &[(String, String)] {
        &self.properties
    }

    fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.line_started {
            for _ in 0..self.level {
                self.text.push_str("    ");
            }
            self.line_started = true;
        }
        self.text.push_str(text);
    }
}

impl Formatter for TextFormatter {
    fn write(&mut self, text: &str) {
        self.append(text);
    }

    fn write_keyword(&mut self, keyword: &str) {
        self.append(keyword);
    }

    fn write_literal(&mut self, literal: &str) {
        self.append(literal);
    }

    fn write_comment(&mut self, comment: &str) {
        self.append(comment);
    }

    fn write_declaration(&mut self, name: &str, _target: Option<&Entity>) {
        self.append(name);
    }

    fn write_reference(&mut self, name: &str, _description: &str, _target: Option<&Entity>) {
        self.append(name);
    }

    fn write_indent(&mut self) {
        self.level += 1;
    }

    fn write_outdent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    fn write_line(&mut self) {
        self.text.push('\n');
        self.line_started = false;
    }

    fn write_property(&mut self, name: &str, value: &str) {
        self.properties.push((name.to_string(), value.to_string()));
    }
}

/// One token of a [`FragmentFormatter`] stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Plain text
    Text(String),
    /// Keyword
    Keyword(String),
    /// Literal
    Literal(String),
    /// Comment
    Comment(String),
    /// Declared name
    Declaration {
        /// Name as written
        name: String,
        /// Declared entity
        target: Option<Entity>,
    },
    /// Cross-reference
    Reference {
        /// Name as written
        name: String,
        /// Tooltip text
        description: String,
        /// Referenced entity
        target: Option<Entity>,
    },
    /// Indentation increase
    Indent,
    /// Indentation decrease
    Outdent,
    /// Line break
    LineBreak,
    /// Annotation
    Property {
        /// Annotation name
        name: String,
        /// Annotation value
        value: String,
    },
}

/// Sink recording the typed token stream.
#[derive(Debug, Default, Clone)]
pub struct FragmentFormatter {
    fragments: Vec<Fragment>,
}

impl FragmentFormatter {
    /// Create an empty fragment sink
    #[must_use]
    pub fn new() -> Self {
        FragmentFormatter::default()
    }

    /// The recorded fragments
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Every reference fragment pointing at `target`
    pub fn references_to<'a>(&'a self, target: &'a Entity) -> impl Iterator<Item = &'a Fragment> {
        self.fragments.iter().filter(move |fragment| {
            matches!(fragment, Fragment::Reference { target: Some(t), .. } if t == target)
        })
    }

    /// Feed the recorded stream into another formatter
    pub fn replay(&self, out: &mut dyn Formatter) {
        for fragment in &self.fragments {
            match fragment {
                Fragment::Text(text) => out.write(text),
                Fragment::Keyword(keyword) => out.write_keyword(keyword),
                Fragment::Literal(literal) => out.write_literal(literal),
                Fragment::Comment(comment) => out.write_comment(comment),
                Fragment::Declaration { name, target } => {
                    out.write_declaration(name, target.as_ref());
                }
                Fragment::Reference {
                    name,
                    description,
                    target,
                } => out.write_reference(name, description, target.as_ref()),
                Fragment::Indent => out.write_indent(),
                Fragment::Outdent => out.write_outdent(),
                Fragment::LineBreak => out.write_line(),
                Fragment::Property { name, value } => out.write_property(name, value),
            }
        }
    }

    /// Plain text of the recorded stream
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = TextFormatter::new();
        self.replay(&mut text);
        text.into_text()
    }
}

impl Formatter for FragmentFormatter {
    fn write(&mut self, text: &str) {
        self.fragments.push(Fragment::Text(text.to_string()));
    }

    fn write_keyword(&mut self, keyword: &str) {
        self.fragments.push(Fragment::Keyword(keyword.to_string()));
    }

    fn write_literal(&mut self, literal: &str) {
        self.fragments.push(Fragment::Literal(literal.to_string()));
    }

    fn write_comment(&mut self, comment: &str) {
        self.fragments.push(Fragment::Comment(comment.to_string()));
    }

    fn write_declaration(&mut self, name: &str, target: Option<&Entity>) {
        self.fragments.push(Fragment::Declaration {
            name: name.to_string(),
            target: target.cloned(),
        });
    }

    fn write_reference(&mut self, name: &str, description: &str, target: Option<&Entity>) {
        self.fragments.push(Fragment::Reference {
            name: name.to_string(),
            description: description.to_string(),
            target: target.cloned(),
        });
    }

    fn write_indent(&mut self) {
        self.fragments.push(Fragment::Indent);
    }

    fn write_outdent(&mut self) {
        self.fragments.push(Fragment::Outdent);
    }

    fn write_line(&mut self) {
        self.fragments.push(Fragment::LineBreak);
    }

    fn write_property(&mut self, name: &str, value: &str) {
        self.fragments.push(Fragment::Property {
            name: name.to_string(),
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_indentation_is_applied_lazily() {
        let mut out = TextFormatter::new();
        out.write_keyword("class");
        out.write(" ");
        out.write_declaration("Foo", None);
        out.write_line();
        out.write("{");
        out.write_indent();
        out.write_line();
        out.write_keyword("int");
        out.write(" x;");
        out.write_outdent();
        out.write_line();
        out.write("}");

        assert_eq!(out.text(), "class Foo\n{\n    int x;\n}");
    }

    #[test]
    fn test_outdent_saturates() {
        let mut out = TextFormatter::new();
        out.write_outdent();
        out.write("x");
        assert_eq!(out.text(), "x");
    }

    #[test]
    fn test_properties_are_not_text() {
        let mut out = TextFormatter::new();
        out.write_property("MVID", "0");
        assert_eq!(out.text(), "");
        assert_eq!(out.properties(), &[("MVID".to_string(), "0".to_string())]);
    }

    #[test]
    fn test_fragments_replay_to_same_text() {
        let target = Entity::Type(TypeReference::new("System", "String"));

        let mut fragments = FragmentFormatter::new();
        fragments.write_keyword("return");
        fragments.write(" ");
        fragments.write_reference("String", "System.String", Some(&target));
        fragments.write(".Empty;");

        assert_eq!(fragments.to_text(), "return String.Empty;");
        assert_eq!(fragments.references_to(&target).count(), 1);
        assert_eq!(fragments.fragments().len(), 4);
    }
}

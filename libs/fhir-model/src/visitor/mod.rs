//! Depth-first traversal over the model graph.
//!
//! Every model type implements [`Visitable`] by listing its fields in
//! declaration order. The engine in this module drives a [`Visitor`] over
//! that listing, so visitors never need to know concrete types. Empty
//! optional fields and empty lists are skipped; an element's `id` and a
//! primitive's `value` are delivered through [`Visitor::visit_value`].
//!
//! For a node the callback order is: `pre_visit`, `visit_start`, `visit`
//! (its return value decides whether children are walked), children,
//! `visit_end`, `post_visit`. Each non-empty list is bracketed by
//! `visit_list_start` and `visit_list_end`.

use std::any::Any;
use std::fmt::Debug;

use crate::types::element::{BackboneFields, ElementFields};
use crate::types::{ChoiceType, Element};

mod collect;
mod digest;
mod json;
mod path;

pub use collect::{collect, CollectingVisitor};
pub use digest::structural_hash;
pub use json::{to_json, JsonWriter};
pub use path::PathVisitor;

/// Structural category of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Primitive,
    Complex,
    Backbone,
    Resource,
}

/// A node of the model graph.
pub trait Visitable: Any + Debug + Send + Sync {
    /// FHIR type name, e.g. `dateTime`, `CodeableConcept` or `Immunization`.
    fn type_name(&self) -> &'static str;

    fn kind(&self) -> NodeKind;

    /// Populated fields in declaration order.
    fn fields(&self) -> Vec<Field<'_>>;

    /// True for a primitive carrying a value.
    fn has_value(&self) -> bool {
        false
    }

    /// True when any field other than a primitive value is populated.
    fn has_children(&self) -> bool {
        !self.fields().is_empty()
    }

    fn as_any(&self) -> &dyn Any;
}

impl dyn Visitable {
    pub fn is<T: Visitable>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Visitable>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Leaf value delivered to [`Visitor::visit_value`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Boolean(bool),
    Integer(i32),
    Decimal(&'a rust_decimal::Decimal),
    String(&'a str),
}

#[derive(Debug, Clone, Copy)]
pub enum Child<'a> {
    Node(&'a dyn Visitable),
    Value(Value<'a>),
}

#[derive(Debug, Clone)]
pub enum FieldContent<'a> {
    Single(Child<'a>),
    Repeated(Vec<Child<'a>>),
}

/// One populated field of a node.
#[derive(Debug, Clone)]
pub struct Field<'a> {
    pub name: &'static str,
    /// Whether the field is a choice element (`value[x]`, `occurrence[x]`, ...).
    pub choice: bool,
    pub content: FieldContent<'a>,
}

/// Where a child sits inside its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position<'a> {
    pub name: &'a str,
    /// Index within a repeated field.
    pub index: Option<usize>,
    pub choice: bool,
}

impl<'a> Position<'a> {
    pub fn root(name: &'a str) -> Self {
        Self {
            name,
            index: None,
            choice: false,
        }
    }
}

/// Callbacks invoked by [`walk`]. Every method has a no-op default.
#[allow(unused_variables)]
pub trait Visitor {
    /// Return false to skip the node entirely, including `post_visit`.
    fn pre_visit(&mut self, node: &dyn Visitable) -> bool {
        true
    }

    fn visit_start(&mut self, at: Position<'_>, node: &dyn Visitable) {}

    /// Return false to skip the node's children.
    fn visit(&mut self, at: Position<'_>, node: &dyn Visitable) -> bool {
        true
    }

    fn visit_end(&mut self, at: Position<'_>, node: &dyn Visitable) {}

    fn post_visit(&mut self, node: &dyn Visitable) {}

    fn visit_list_start(&mut self, name: &str, len: usize) {}

    fn visit_list_end(&mut self, name: &str, len: usize) {}

    fn visit_value(&mut self, at: Position<'_>, value: Value<'_>) {}
}

/// Walk `root` and everything reachable from it. The root is reported
/// under its own type name.
pub fn walk<V: Visitor + ?Sized>(root: &dyn Visitable, visitor: &mut V) {
    tracing::trace!(root = root.type_name(), "walking model graph");
    accept(root, Position::root(root.type_name()), visitor);
}

/// Visit `node` as a child at position `at`.
pub fn accept<V: Visitor + ?Sized>(node: &dyn Visitable, at: Position<'_>, visitor: &mut V) {
    if !visitor.pre_visit(node) {
        return;
    }
    visitor.visit_start(at, node);
    if visitor.visit(at, node) {
        for field in node.fields() {
            accept_field(&field, visitor);
        }
    }
    visitor.visit_end(at, node);
    visitor.post_visit(node);
}

fn accept_field<V: Visitor + ?Sized>(field: &Field<'_>, visitor: &mut V) {
    match &field.content {
        FieldContent::Single(child) => {
            let at = Position {
                name: field.name,
                index: None,
                choice: field.choice,
            };
            accept_child(child, at, visitor);
        }
        FieldContent::Repeated(children) => {
            visitor.visit_list_start(field.name, children.len());
            for (index, child) in children.iter().enumerate() {
                let at = Position {
                    name: field.name,
                    index: Some(index),
                    choice: field.choice,
                };
                accept_child(child, at, visitor);
            }
            visitor.visit_list_end(field.name, children.len());
        }
    }
}

fn accept_child<V: Visitor + ?Sized>(child: &Child<'_>, at: Position<'_>, visitor: &mut V) {
    match child {
        Child::Node(node) => accept(*node, at, visitor),
        Child::Value(value) => visitor.visit_value(at, *value),
    }
}

// ============================================================================
// Field listing helper
// ============================================================================

/// Accumulates a node's populated fields. Empty inputs are dropped.
#[derive(Debug, Default)]
pub struct Fields<'a> {
    fields: Vec<Field<'a>>,
}

impl<'a> Fields<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, name: &'static str, choice: bool, content: FieldContent<'a>) -> Self {
        self.fields.push(Field {
            name,
            choice,
            content,
        });
        self
    }

    pub fn value(self, name: &'static str, value: Option<Value<'a>>) -> Self {
        match value {
            Some(value) => self.push(name, false, FieldContent::Single(Child::Value(value))),
            None => self,
        }
    }

    pub fn one<T: Visitable>(self, name: &'static str, node: &'a T) -> Self {
        self.push(name, false, FieldContent::Single(Child::Node(node)))
    }

    pub fn opt<T: Visitable>(self, name: &'static str, node: Option<&'a T>) -> Self {
        match node {
            Some(node) => self.one(name, node),
            None => self,
        }
    }

    pub fn many<T: Visitable>(self, name: &'static str, nodes: &'a [T]) -> Self {
        if nodes.is_empty() {
            return self;
        }
        let children = nodes
            .iter()
            .map(|node| Child::Node(node as &dyn Visitable))
            .collect();
        self.push(name, false, FieldContent::Repeated(children))
    }

    /// A repeated field of heterogeneous nodes, such as `contained`.
    pub fn nodes(self, name: &'static str, nodes: Vec<&'a dyn Visitable>) -> Self {
        if nodes.is_empty() {
            return self;
        }
        let children = nodes.into_iter().map(Child::Node).collect();
        self.push(name, false, FieldContent::Repeated(children))
    }

    /// A closed choice field.
    pub fn choice<C: ChoiceType>(self, name: &'static str, value: Option<&'a C>) -> Self {
        match value {
            Some(value) => self.push(name, true, FieldContent::Single(Child::Node(value.value()))),
            None => self,
        }
    }

    /// An open choice field accepting any datatype.
    pub fn any(self, name: &'static str, value: Option<&'a Element>) -> Self {
        match value {
            Some(value) => self.push(
                name,
                true,
                FieldContent::Single(Child::Node(value.as_visitable())),
            ),
            None => self,
        }
    }

    pub fn raw_string(self, name: &'static str, value: Option<&'a str>) -> Self {
        self.value(name, value.map(Value::String))
    }

    /// `id` and `extension` of an element.
    pub fn element(self, base: &'a ElementFields) -> Self {
        self.raw_string("id", base.id.as_deref())
            .many("extension", &base.extension)
    }

    /// `id`, `extension` and `modifierExtension` of a backbone element.
    pub fn backbone(self, base: &'a BackboneFields) -> Self {
        self.element(&base.element)
            .many("modifierExtension", &base.modifier_extension)
    }

    pub fn build(self) -> Vec<Field<'a>> {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;
    use crate::types::{CodeableConcept, Coding, FhirString};

    #[derive(Default)]
    struct Trace(Vec<String>);

    impl Visitor for Trace {
        fn visit_start(&mut self, at: Position<'_>, node: &dyn Visitable) {
            self.0.push(format!("start {}:{}", at.name, node.type_name()));
        }

        fn visit_end(&mut self, at: Position<'_>, _node: &dyn Visitable) {
            self.0.push(format!("end {}", at.name));
        }

        fn visit_list_start(&mut self, name: &str, len: usize) {
            self.0.push(format!("list {name} {len}"));
        }

        fn visit_value(&mut self, at: Position<'_>, value: Value<'_>) {
            self.0.push(format!("value {} {:?}", at.name, value));
        }
    }

    fn concept() -> CodeableConcept {
        CodeableConcept::builder()
            .coding([Coding::builder()
                .code(crate::types::Code::new("a").unwrap())
                .build()
                .unwrap()])
            .text(FhirString::new("A").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_walk_order() {
        let mut trace = Trace::default();
        walk(&concept(), &mut trace);
        assert_eq!(
            trace.0,
            vec![
                "start CodeableConcept:CodeableConcept",
                "list coding 1",
                "start coding:Coding",
                "start code:code",
                "value value String(\"a\")",
                "end code",
                "end coding",
                "start text:string",
                "value value String(\"A\")",
                "end text",
                "end CodeableConcept",
            ]
        );
    }

    #[test]
    fn test_visit_false_skips_children() {
        struct Shallow(usize);
        impl Visitor for Shallow {
            fn visit(&mut self, _at: Position<'_>, _node: &dyn Visitable) -> bool {
                self.0 += 1;
                false
            }
        }
        let mut shallow = Shallow(0);
        walk(&concept(), &mut shallow);
        assert_eq!(shallow.0, 1);
    }

    #[test]
    fn test_pre_visit_false_skips_node() {
        #[derive(Default)]
        struct Posts(usize);
        impl Visitor for Posts {
            fn pre_visit(&mut self, node: &dyn Visitable) -> bool {
                node.type_name() != "Coding"
            }
            fn post_visit(&mut self, _node: &dyn Visitable) {
                self.0 += 1;
            }
        }
        let mut posts = Posts::default();
        walk(&concept(), &mut posts);
        // CodeableConcept and text only
        assert_eq!(posts.0, 2);
    }

    #[test]
    fn test_downcast() {
        let concept = concept();
        let node: &dyn Visitable = &concept;
        assert!(node.is::<CodeableConcept>());
        assert_eq!(node.downcast_ref::<CodeableConcept>(), Some(&concept));
        assert!(node.downcast_ref::<Coding>().is_none());
    }

    #[test]
    fn test_element_id_is_a_value() {
        let text = FhirString::builder().id("t1").value("x").build().unwrap();
        let mut trace = Trace::default();
        walk(&text, &mut trace);
        assert_eq!(trace.0[1], "value id String(\"t1\")");
    }
}

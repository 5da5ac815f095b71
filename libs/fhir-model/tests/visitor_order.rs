//! Traversal order and the bundled visitors over a populated resource.

use ferrum_model::prelude::*;
use ferrum_model::resource::{Immunization, MedicationRequest};
use ferrum_model::types::Reference;
use ferrum_model::visitor::{collect, walk, PathVisitor, Position};

mod test_support;
use test_support::*;

/// Records the fields of the root node as `(name, index)` pairs.
#[derive(Default)]
struct TopLevel {
    depth: usize,
    fields: Vec<(String, Option<usize>)>,
    events: Vec<String>,
}

impl Visitor for TopLevel {
    fn visit_start(&mut self, at: Position<'_>, _node: &dyn Visitable) {
        if self.depth == 1 {
            self.fields.push((at.name.to_string(), at.index));
        }
        self.depth += 1;
    }

    fn visit_end(&mut self, _at: Position<'_>, _node: &dyn Visitable) {
        self.depth -= 1;
    }

    fn pre_visit(&mut self, node: &dyn Visitable) -> bool {
        if self.depth <= 1 {
            self.events.push(format!("pre {}", node.type_name()));
        }
        true
    }

    fn post_visit(&mut self, node: &dyn Visitable) {
        if self.depth <= 1 {
            self.events.push(format!("post {}", node.type_name()));
        }
    }

    fn visit_list_start(&mut self, name: &str, len: usize) {
        if self.depth == 1 {
            self.events.push(format!("list {name} {len}"));
        }
    }
}

#[test]
fn medication_request_fields_follow_declaration_order() {
    let order = populated_order();
    let mut recorder = TopLevel::default();
    walk(&order, &mut recorder);

    let expected: Vec<(String, Option<usize>)> = [
        ("id", None),
        ("contained", Some(0)),
        ("identifier", Some(0)),
        ("identifier", Some(1)),
        ("status", None),
        ("intent", None),
        ("category", Some(0)),
        ("medication", None),
        ("subject", None),
        ("authoredOn", None),
        ("requester", None),
        ("dosageInstruction", Some(0)),
    ]
    .into_iter()
    .map(|(name, index)| (name.to_string(), index))
    .collect();
    assert_eq!(recorder.fields, expected);

    assert_eq!(recorder.events.first().map(String::as_str), Some("pre MedicationRequest"));
    assert_eq!(recorder.events.last().map(String::as_str), Some("post MedicationRequest"));
    assert!(recorder.events.contains(&"list identifier 2".to_string()));
}

#[test]
fn choice_fields_are_flagged() {
    #[derive(Default)]
    struct Choices(Vec<(String, &'static str)>);

    impl Visitor for Choices {
        fn visit_start(&mut self, at: Position<'_>, node: &dyn Visitable) {
            if at.choice {
                self.0.push((at.name.to_string(), node.type_name()));
            }
        }
    }

    let order = amoxicillin_order()
        .reported(reference("Practitioner/p1"))
        .build()
        .unwrap();
    let mut choices = Choices::default();
    walk(&order, &mut choices);
    assert_eq!(
        choices.0,
        vec![
            ("reported".to_string(), "Reference"),
            ("medication".to_string(), "CodeableConcept"),
        ]
    );
}

#[test]
fn skipped_subtrees_still_get_end_callbacks() {
    #[derive(Default)]
    struct Shallow {
        started: Vec<String>,
        ends: usize,
    }

    impl Visitor for Shallow {
        fn visit_start(&mut self, at: Position<'_>, _node: &dyn Visitable) {
            self.started.push(at.name.to_string());
        }

        fn visit(&mut self, at: Position<'_>, _node: &dyn Visitable) -> bool {
            at.name != "identifier"
        }

        fn visit_end(&mut self, _at: Position<'_>, _node: &dyn Visitable) {
            self.ends += 1;
        }
    }

    let order = amoxicillin_order()
        .identifier([identifier("x")])
        .build()
        .unwrap();
    let mut shallow = Shallow::default();
    walk(&order, &mut shallow);

    assert_eq!(shallow.started.len(), shallow.ends);
    assert!(shallow.started.iter().any(|name| name == "identifier"));
    // Identifier.system is only reachable through the skipped identifier
    assert!(!shallow.started.iter().any(|name| name == "system"));
}

#[test]
fn paths_index_repeated_fields() {
    let order = populated_order();
    let mut paths = PathVisitor::new();
    walk(&order, &mut paths);
    let paths = paths.into_paths();

    assert_eq!(paths[0], "MedicationRequest");
    assert!(paths.contains(&"MedicationRequest.identifier[1].value".to_string()));
    assert!(paths.contains(&"MedicationRequest.contained[0].status".to_string()));
    assert!(paths.contains(&"MedicationRequest.medication.text".to_string()));
    let first = paths
        .iter()
        .position(|p| p == "MedicationRequest.identifier[0]")
        .unwrap();
    let second = paths
        .iter()
        .position(|p| p == "MedicationRequest.identifier[1]")
        .unwrap();
    let status = paths
        .iter()
        .position(|p| p == "MedicationRequest.status")
        .unwrap();
    assert!(first < second && second < status);
}

#[test]
fn collect_reaches_contained_resources() {
    let order = populated_order();
    let references: Vec<String> = collect::<Reference>(&order)
        .iter()
        .filter_map(|r| r.reference().and_then(|s| s.as_str()).map(str::to_string))
        .collect();
    assert_eq!(
        references,
        vec!["Patient/1", "Patient/example", "Practitioner/dr-1"]
    );
    assert_eq!(collect::<Immunization>(&order).len(), 1);
    assert_eq!(collect::<MedicationRequest>(&order), vec![order]);
}

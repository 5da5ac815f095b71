use super::{NodeKind, Position, Value, Visitable, Visitor};

/// Records the FHIRPath-style path of every node and leaf value visited,
/// such as `Immunization.identifier[1].value`.
///
/// A primitive's own value shares the primitive's path; an element `id`
/// gets a path of its own.
#[derive(Debug, Default)]
pub struct PathVisitor {
    stack: Vec<(String, NodeKind)>,
    paths: Vec<String>,
}

impl PathVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the node currently being visited.
    pub fn current(&self) -> Option<&str> {
        self.stack.last().map(|(path, _)| path.as_str())
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn into_paths(self) -> Vec<String> {
        self.paths
    }

    fn child_path(&self, at: Position<'_>) -> String {
        let mut path = match self.stack.last() {
            Some((parent, _)) => format!("{parent}.{}", at.name),
            None => at.name.to_string(),
        };
        if let Some(index) = at.index {
            path.push_str(&format!("[{index}]"));
        }
        path
    }
}

impl Visitor for PathVisitor {
    fn visit_start(&mut self, at: Position<'_>, node: &dyn Visitable) {
        let path = self.child_path(at);
        self.paths.push(path.clone());
        self.stack.push((path, node.kind()));
    }

    fn visit_end(&mut self, _at: Position<'_>, _node: &dyn Visitable) {
        self.stack.pop();
    }

    fn visit_value(&mut self, at: Position<'_>, _value: Value<'_>) {
        let own_value = matches!(self.stack.last(), Some((_, NodeKind::Primitive)))
            && at.name == "value";
        if !own_value {
            let path = self.child_path(at);
            self.paths.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CodeableConcept, Code, Coding, FhirString};
    use crate::builder::ElementBuilder;
    use crate::visitor::walk;

    #[test]
    fn test_paths() {
        let concept = CodeableConcept::builder()
            .coding([
                Coding::builder().code(Code::new("a").unwrap()).build().unwrap(),
                Coding::builder().code(Code::new("b").unwrap()).build().unwrap(),
            ])
            .text(FhirString::builder().id("t").value("A").build().unwrap())
            .build()
            .unwrap();
        let mut paths = PathVisitor::new();
        walk(&concept, &mut paths);
        assert_eq!(
            paths.into_paths(),
            vec![
                "CodeableConcept",
                "CodeableConcept.coding[0]",
                "CodeableConcept.coding[0].code",
                "CodeableConcept.coding[1]",
                "CodeableConcept.coding[1].code",
                "CodeableConcept.text",
                "CodeableConcept.text.id",
            ]
        );
    }
}

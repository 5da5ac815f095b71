use super::{walk, Position, Visitable, Visitor};

/// Gathers clones of every node whose runtime type is `T`.
#[derive(Debug)]
pub struct CollectingVisitor<T> {
    found: Vec<T>,
}

impl<T: Visitable + Clone> CollectingVisitor<T> {
    pub fn new() -> Self {
        Self { found: Vec::new() }
    }

    pub fn found(&self) -> &[T] {
        &self.found
    }

    pub fn into_inner(self) -> Vec<T> {
        self.found
    }
}

impl<T: Visitable + Clone> Default for CollectingVisitor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Visitable + Clone> Visitor for CollectingVisitor<T> {
    fn visit_start(&mut self, _at: Position<'_>, node: &dyn Visitable) {
        if let Some(found) = node.downcast_ref::<T>() {
            self.found.push(found.clone());
        }
    }
}

/// Every node of type `T` reachable from `root`, in traversal order.
pub fn collect<T: Visitable + Clone>(root: &dyn Visitable) -> Vec<T> {
    let mut collector = CollectingVisitor::new();
    walk(root, &mut collector);
    collector.into_inner()
}

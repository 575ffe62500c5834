use super::ast::{Expression, Node, Scope};

#[allow(non_camel_case_types)]
pub(crate) type index32 = u32;

pub(crate) type ExpressionIndex = index32;
pub(crate) type NodeIndex = index32;
pub(crate) type ScopeIndex = index32;

/// default arena capacity, exceeding any realistic source file for this language
pub(crate) const DEFAULT_CAPACITY: usize = 4 * 1024 * 1024;

/// Region allocator backing the AST.
///
/// Nodes are allocated bump-style into typed pools and addressed by typed
/// indices, so every node edge is an owning reference into this region. There
/// is no per-node deallocation, the whole region is released at once when the
/// arena is dropped together with the AST.
#[derive(Debug)]
pub struct Arena<'src> {
    capacity: usize,
    allocated: usize,

    expressions: Vec<Expression<'src>>,
    nodes: Vec<Node<'src>>,
    scopes: Vec<Scope>,
}

impl<'src> Arena<'src> {
    #[must_use]
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        return Self {
            capacity,
            allocated: 0,
            expressions: Vec::new(),
            nodes: Vec::new(),
            scopes: Vec::new(),
        };
    }

    // each pool stores properly aligned slots, so the byte budget only needs
    // to account for the slot sizes
    fn bump(&mut self, bytes: usize) {
        self.allocated += bytes;
        assert!(
            self.allocated <= self.capacity,
            "arena exhausted: {allocated} bytes needed but only {capacity} available",
            allocated = self.allocated,
            capacity = self.capacity,
        );
    }

    pub(crate) fn new_expression(&mut self, expression: Expression<'src>) -> ExpressionIndex {
        self.bump(size_of::<Expression<'src>>());
        let expression_index = self.expressions.len() as ExpressionIndex;
        self.expressions.push(expression);
        return expression_index;
    }

    pub(crate) fn new_node(&mut self, node: Node<'src>) -> NodeIndex {
        self.bump(size_of::<Node<'src>>());
        let node_index = self.nodes.len() as NodeIndex;
        self.nodes.push(node);
        return node_index;
    }

    pub(crate) fn new_scope(&mut self, scope: Scope) -> ScopeIndex {
        self.bump(size_of::<Scope>());
        let scope_index = self.scopes.len() as ScopeIndex;
        self.scopes.push(scope);
        return scope_index;
    }

    #[must_use]
    pub(crate) fn expression(&self, expression_index: ExpressionIndex) -> &Expression<'src> {
        return &self.expressions[expression_index as usize];
    }

    #[must_use]
    pub(crate) fn node(&self, node_index: NodeIndex) -> &Node<'src> {
        return &self.nodes[node_index as usize];
    }

    #[must_use]
    pub(crate) fn scope(&self, scope_index: ScopeIndex) -> &Scope {
        return &self.scopes[scope_index as usize];
    }
}

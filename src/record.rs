//! The recording value type.
//!
//! [`Record`] behaves like the scalar it wraps while mirroring every
//! operation it participates in into an associated [`Graph`]. Values start
//! out untraced; they acquire a node either through an explicit
//! [`Record::register`] call or lazily, the first time they are used as an
//! operand next to a value that already belongs to a graph.

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::rc::Rc;

use log::debug;

use crate::graph::{Graph, NodeId, NodeOp};
use crate::passive::{FloatPassive, Passive, SignedPassive};

/// A numeric value that records the operations applied to it.
///
/// A `Record` holds the computed value, the kind of operation that produced
/// it, and an optional handle to the shared [`Graph`] it is registered in.
/// The graph handle is a shared, reference-counted resource: many records
/// may point at the same graph, and a record may point at none, in which
/// case arithmetic is purely numeric.
///
/// When two operands belong to *different* graphs, the result silently
/// carries no graph at all: mixing independently traced computations
/// degrades to untraced arithmetic instead of crashing.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use tracegraph::{Graph, NodeOp, Record};
///
/// let graph = Rc::new(Graph::new());
/// let mut x = Record::new(1.0);
/// let mut y = Record::new(2.0);
/// x.register(&graph);
/// y.register(&graph);
///
/// let z = &x * &y + &x;
/// assert_eq!(*z.value(), 3.0);
/// assert_eq!(graph.len(), 4); // x, y, MUL, ADD
/// assert_eq!(graph.count_op(NodeOp::Mul), 1);
/// ```
pub struct Record<T: Passive> {
    graph: RefCell<Option<Rc<Graph<T>>>>,
    value: T,
    id: Cell<Option<NodeId>>,
    op: NodeOp,
}

impl<T: Passive> Record<T> {
    /// Creates an untraced variable. No graph node is created until the
    /// value is registered or first used as an operand.
    pub fn new(value: T) -> Self {
        Self::with_op(value, NodeOp::Var)
    }

    /// Creates an untraced literal constant. Registers as a `LITERAL` node
    /// instead of a `VAR` node when it enters a graph.
    pub fn literal(value: T) -> Self {
        Self::with_op(value, NodeOp::Literal)
    }

    fn with_op(value: T, op: NodeOp) -> Self {
        Record {
            graph: RefCell::new(None),
            value,
            id: Cell::new(None),
            op,
        }
    }

    fn traced(value: T, op: NodeOp, id: NodeId, graph: Rc<Graph<T>>) -> Self {
        Record {
            graph: RefCell::new(Some(graph)),
            value,
            id: Cell::new(Some(id)),
            op,
        }
    }

    /// Binds this value to `graph` and appends a node for it.
    ///
    /// Registration does not mark the node as a program input; call
    /// [`Record::mark_input`] (or use [`register_inputs`]) when the value is
    /// semantically an input. Registering an already-registered value
    /// appends a fresh node.
    pub fn register(&mut self, graph: &Rc<Graph<T>>) -> NodeId {
        let id = graph.add_node(self.source_op(), self.value.clone(), &[]);
        debug!("registered {} as node_{}", self.value, id.0);
        self.id.set(Some(id));
        *self.graph.borrow_mut() = Some(Rc::clone(graph));
        id
    }

    /// Marks this value's node as a program input.
    ///
    /// # Panics
    ///
    /// Panics if the value is not registered in a graph.
    pub fn mark_input(&self) {
        let graph = self.graph.borrow();
        let (Some(graph), Some(id)) = (graph.as_deref(), self.id.get()) else {
            panic!("value is not registered in a graph and cannot be marked as an input");
        };
        graph.mark_input(id);
    }

    /// Marks this value's node as a program output.
    ///
    /// # Panics
    ///
    /// Panics if the value is not registered in a graph.
    pub fn mark_output(&self) {
        let graph = self.graph.borrow();
        let (Some(graph), Some(id)) = (graph.as_deref(), self.id.get()) else {
            panic!("value is not registered in a graph and cannot be marked as an output");
        };
        graph.mark_output(id);
    }

    /// Attaches a diagnostic label to this value's node.
    ///
    /// # Panics
    ///
    /// Panics if the value is not registered in a graph.
    pub fn set_name(&self, name: impl Into<String>) {
        let graph = self.graph.borrow();
        let (Some(graph), Some(id)) = (graph.as_deref(), self.id.get()) else {
            panic!("value is not registered in a graph and cannot be named");
        };
        graph.set_name(id, name);
    }

    /// Returns the wrapped numeric value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns this value's node id, or `None` if it has no node yet.
    pub fn id(&self) -> Option<NodeId> {
        self.id.get()
    }

    /// Returns the kind of operation that produced this value.
    pub fn op(&self) -> NodeOp {
        self.op
    }

    /// Returns a handle to the graph this value is associated with, if any.
    pub fn graph(&self) -> Option<Rc<Graph<T>>> {
        self.graph.borrow().clone()
    }

    /// Recorded assignment: the value takes on `other`'s number and a fresh
    /// `VAR` alias node depending on `other`'s node is appended.
    ///
    /// The target's graph becomes whichever of the two graphs is present;
    /// if both are present and differ, tracing silently stops for this
    /// value (no graph, no node).
    pub fn assign(&mut self, other: &Record<T>) {
        // Capture the source id before touching any state; other may be a
        // clone of self.
        let other_id = other.id.get();
        let graph = common_graph(self.graph(), other.graph());
        self.value = other.value.clone();
        self.op = NodeOp::Var;
        match graph {
            Some(graph) => {
                let src = match other_id {
                    Some(id) => id,
                    None => other.ensure_registered(&graph),
                };
                let id = graph.add_node(NodeOp::Var, self.value.clone(), &[src]);
                self.id.set(Some(id));
                *self.graph.borrow_mut() = Some(graph);
            }
            None => {
                self.id.set(None);
                *self.graph.borrow_mut() = None;
            }
        }
    }

    /// The kind this value registers under when it enters a graph without a
    /// dependency: a value produced by untraced arithmetic re-enters as a
    /// plain variable so that operation nodes always carry their operands.
    fn source_op(&self) -> NodeOp {
        if self.op.is_op() {
            NodeOp::Var
        } else {
            self.op
        }
    }

    /// Returns this value's node id, appending a source node for it first
    /// if it has none. The value is bound to `graph` afterwards, so the id
    /// can never be read against a different node list.
    fn ensure_registered(&self, graph: &Rc<Graph<T>>) -> NodeId {
        if let Some(id) = self.id.get() {
            return id;
        }
        let id = graph.add_node(self.source_op(), self.value.clone(), &[]);
        self.id.set(Some(id));
        *self.graph.borrow_mut() = Some(Rc::clone(graph));
        id
    }
}

impl<T: FloatPassive> Record<T> {
    /// Records the reciprocal, `1/x`.
    pub fn recip(&self) -> Record<T> {
        record_unary(NodeOp::Recip, self.value.clone().recip(), self)
    }

    /// Records the square root.
    pub fn sqrt(&self) -> Record<T> {
        record_unary(NodeOp::Sqrt, self.value.clone().sqrt(), self)
    }

    /// Records the sine.
    pub fn sin(&self) -> Record<T> {
        record_unary(NodeOp::Sin, self.value.clone().sin(), self)
    }

    /// Records the cosine.
    pub fn cos(&self) -> Record<T> {
        record_unary(NodeOp::Cos, self.value.clone().cos(), self)
    }
}

/// The rule for choosing a common graph when combining two values: shared
/// if equal, the present one if exactly one is present, none otherwise.
fn common_graph<T: Passive>(
    lhs: Option<Rc<Graph<T>>>,
    rhs: Option<Rc<Graph<T>>>,
) -> Option<Rc<Graph<T>>> {
    match (lhs, rhs) {
        (Some(lhs), Some(rhs)) => Rc::ptr_eq(&lhs, &rhs).then_some(lhs),
        (Some(lhs), None) => Some(lhs),
        (None, Some(rhs)) => Some(rhs),
        (None, None) => None,
    }
}

fn record_binary<T: Passive>(
    op: NodeOp,
    value: T,
    lhs: &Record<T>,
    rhs: &Record<T>,
) -> Record<T> {
    match common_graph(lhs.graph(), rhs.graph()) {
        Some(graph) => {
            // Operand order is preserved verbatim in the dependency list.
            let lhs_id = lhs.ensure_registered(&graph);
            let rhs_id = rhs.ensure_registered(&graph);
            let id = graph.add_node(op, value.clone(), &[lhs_id, rhs_id]);
            Record::traced(value, op, id, graph)
        }
        None => Record::with_op(value, op),
    }
}

fn record_unary<T: Passive>(op: NodeOp, value: T, x: &Record<T>) -> Record<T> {
    match x.graph() {
        Some(graph) => {
            let x_id = x.ensure_registered(&graph);
            let id = graph.add_node(op, value.clone(), &[x_id]);
            Record::traced(value, op, id, graph)
        }
        None => Record::with_op(value, op),
    }
}

// --- Operator Overloads ---

// Add: a + b
impl<T: Passive> Add for &Record<T> {
    type Output = Record<T>;
    fn add(self, rhs: Self) -> Record<T> {
        record_binary(
            NodeOp::Add,
            self.value.clone() + rhs.value.clone(),
            self,
            rhs,
        )
    }
}

// Mul: a * b
impl<T: Passive> Mul for &Record<T> {
    type Output = Record<T>;
    fn mul(self, rhs: Self) -> Record<T> {
        record_binary(
            NodeOp::Mul,
            self.value.clone() * rhs.value.clone(),
            self,
            rhs,
        )
    }
}

// Neg: -a
impl<T: SignedPassive> Neg for &Record<T> {
    type Output = Record<T>;
    fn neg(self) -> Record<T> {
        record_unary(NodeOp::Neg, -self.value.clone(), self)
    }
}

// Sub: a - b = a + (-b)
impl<T: SignedPassive> Sub for &Record<T> {
    type Output = Record<T>;
    fn sub(self, rhs: Self) -> Record<T> {
        self + &(-rhs)
    }
}

// Div: a / b = a * recip(b)
impl<T: FloatPassive> Div for &Record<T> {
    type Output = Record<T>;
    fn div(self, rhs: Self) -> Record<T> {
        self * &rhs.recip()
    }
}

impl<T: SignedPassive> Neg for Record<T> {
    type Output = Record<T>;
    fn neg(self) -> Record<T> {
        -&self
    }
}

// Forward the owned and mixed operand combinations to the reference impls.
// A clone would record an extra alias node, so operands are passed through
// by reference. The scalar combinations wrap the plain number in an
// untraced variable first, mirroring implicit promotion.
macro_rules! forward_binop {
    ($trait:ident, $method:ident, $bound:ident) => {
        impl<T: $bound> $trait for Record<T> {
            type Output = Record<T>;
            fn $method(self, rhs: Record<T>) -> Record<T> {
                (&self).$method(&rhs)
            }
        }

        impl<T: $bound> $trait<&Record<T>> for Record<T> {
            type Output = Record<T>;
            fn $method(self, rhs: &Record<T>) -> Record<T> {
                (&self).$method(rhs)
            }
        }

        impl<T: $bound> $trait<Record<T>> for &Record<T> {
            type Output = Record<T>;
            fn $method(self, rhs: Record<T>) -> Record<T> {
                self.$method(&rhs)
            }
        }

        impl<T: $bound> $trait<T> for Record<T> {
            type Output = Record<T>;
            fn $method(self, rhs: T) -> Record<T> {
                (&self).$method(&Record::new(rhs))
            }
        }

        impl<T: $bound> $trait<T> for &Record<T> {
            type Output = Record<T>;
            fn $method(self, rhs: T) -> Record<T> {
                self.$method(&Record::new(rhs))
            }
        }
    };
}

forward_binop!(Add, add, Passive);
forward_binop!(Sub, sub, SignedPassive);
forward_binop!(Mul, mul, Passive);
forward_binop!(Div, div, FloatPassive);

// Compound assignment computes the operation and then performs a recorded
// assignment, so `y += x` appends the ADD node and a VAR alias node.
macro_rules! compound_assign {
    ($trait:ident, $method:ident, $op:tt, $bound:ident) => {
        impl<T: $bound> $trait<&Record<T>> for Record<T> {
            fn $method(&mut self, rhs: &Record<T>) {
                let result = &*self $op rhs;
                self.assign(&result);
            }
        }

        impl<T: $bound> $trait for Record<T> {
            fn $method(&mut self, rhs: Record<T>) {
                self.$method(&rhs);
            }
        }

        impl<T: $bound> $trait<T> for Record<T> {
            fn $method(&mut self, rhs: T) {
                self.$method(&Record::new(rhs));
            }
        }
    };
}

compound_assign!(AddAssign, add_assign, +, Passive);
compound_assign!(SubAssign, sub_assign, -, SignedPassive);
compound_assign!(MulAssign, mul_assign, *, Passive);
compound_assign!(DivAssign, div_assign, /, FloatPassive);

/// Cloning is itself a recorded operation: the clone is a fresh `VAR` node
/// whose single dependency is the source's node, with the source lazily
/// registered first if it had none. Cloning an untraced value stays
/// untraced.
impl<T: Passive> Clone for Record<T> {
    fn clone(&self) -> Self {
        match self.graph() {
            Some(graph) => {
                let src = self.ensure_registered(&graph);
                let id = graph.add_node(NodeOp::Var, self.value.clone(), &[src]);
                Record::traced(self.value.clone(), NodeOp::Var, id, graph)
            }
            None => Record::with_op(self.value.clone(), NodeOp::Var),
        }
    }
}

// Comparisons look at the numeric value only; provenance is ignored, so two
// equal numbers from different graphs compare equal.
impl<T: Passive> PartialEq for Record<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Passive> PartialOrd for Record<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<T: Passive> From<T> for Record<T> {
    fn from(value: T) -> Self {
        Record::new(value)
    }
}

impl<T: Passive + Default> Default for Record<T> {
    fn default() -> Self {
        Record::new(T::default())
    }
}

impl<T: Passive> fmt::Display for Record<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.graph(), self.id.get()) {
            (Some(graph), Some(id)) => {
                let node = graph.node(id);
                match &node.name {
                    Some(name) => write!(f, "{name} ({}, {})", self.op, self.value),
                    None => write!(f, "node_{} ({}, {})", id.0, self.op, self.value),
                }
            }
            _ => write!(f, "unregistered ({}, {})", self.op, self.value),
        }
    }
}

impl<T: Passive> fmt::Debug for Record<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("value", &self.value)
            .field("id", &self.id.get())
            .field("op", &self.op)
            .field("traced", &self.graph.borrow().is_some())
            .finish()
    }
}

// --- Container helpers ---

/// Registers every value of an iterator in `graph`.
pub fn register_all<'a, T, I>(values: I, graph: &Rc<Graph<T>>)
where
    T: Passive + 'a,
    I: IntoIterator<Item = &'a mut Record<T>>,
{
    for value in values {
        value.register(graph);
    }
}

/// Registers every value of an iterator in `graph` and marks it as a
/// program input.
pub fn register_inputs<'a, T, I>(values: I, graph: &Rc<Graph<T>>)
where
    T: Passive + 'a,
    I: IntoIterator<Item = &'a mut Record<T>>,
{
    for value in values {
        let id = value.register(graph);
        graph.mark_input(id);
    }
}

/// Marks every value of an iterator as a program output.
///
/// # Panics
///
/// Panics if any value is not registered in a graph.
pub fn mark_outputs<'a, T, I>(values: I)
where
    T: Passive + 'a,
    I: IntoIterator<Item = &'a Record<T>>,
{
    for value in values {
        value.mark_output();
    }
}

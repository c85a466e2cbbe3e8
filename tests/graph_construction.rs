//! Registration, lazy registration, and graph reconciliation.

use std::rc::Rc;

use tracegraph::prelude::*;
use tracegraph::NodeId;

#[test]
fn registration_appends_one_var_node() {
    let graph = Rc::new(Graph::new());
    let mut x = Record::new(42.0);
    assert_eq!(x.id(), None);
    assert!(x.graph().is_none());

    let id = x.register(&graph);

    assert_eq!(id, NodeId(0));
    assert_eq!(x.id(), Some(id));
    assert_eq!(graph.len(), 1);
    let node = graph.node(id);
    assert_eq!(node.op, NodeOp::Var);
    assert_eq!(node.value, 42.0);
    assert!(node.deps.is_empty());
}

#[test]
fn registration_does_not_mark_input() {
    let graph = Rc::new(Graph::new());
    let mut x = Record::new(1.0);
    let id = x.register(&graph);
    assert_eq!(graph.node(id).io, IoKind::Intermediate);

    x.mark_input();
    assert_eq!(graph.node(id).io, IoKind::Input);
}

#[test]
fn literal_registers_as_literal_node() {
    let graph = Rc::new(Graph::new());
    let mut x = Record::new(1.0);
    x.register(&graph);
    let c = Record::literal(2.0);

    let y = &x + &c;

    assert_eq!(*y.value(), 3.0);
    let ops: Vec<NodeOp> = graph.nodes().iter().map(|n| n.op).collect();
    assert_eq!(ops, vec![NodeOp::Var, NodeOp::Literal, NodeOp::Add]);
    assert_eq!(c.id(), Some(NodeId(1)));
}

#[test]
fn addition_with_unregistered_operand() {
    let graph = Rc::new(Graph::new());
    let mut rt1 = Record::new(1.0);
    let rt2 = Record::new(2.0);
    rt1.register(&graph);

    let rt3 = &rt1 + &rt2;

    assert_eq!(rt1.id(), Some(NodeId(0)));
    assert_eq!(rt2.id(), Some(NodeId(1)), "rt2 was not lazily registered");
    assert_eq!(rt3.id(), Some(NodeId(2)));

    let nodes = graph.nodes();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0].op, NodeOp::Var);
    assert_eq!(nodes[1].op, NodeOp::Var);
    assert_eq!(nodes[2].op, NodeOp::Add);
    assert_eq!(nodes[0].value, 1.0);
    assert_eq!(nodes[1].value, 2.0);
    assert_eq!(nodes[2].value, 3.0);
    assert_eq!(nodes[2].deps, vec![NodeId(0), NodeId(1)]);
}

#[test]
fn lazy_registration_happens_once() {
    let graph = Rc::new(Graph::new());
    let mut b = Record::new(2.0);
    b.register(&graph);
    let a = Record::new(3.0);

    let _c = &b + &a;
    assert_eq!(graph.len(), 3); // b, a, ADD
    let a_id = a.id().expect("a should have been registered");

    // Reusing `a` must not register it a second time.
    let d = &a * &b;
    assert_eq!(graph.len(), 4);
    assert_eq!(a.id(), Some(a_id));
    assert_eq!(graph.node(d.id().unwrap()).deps, vec![a_id, NodeId(0)]);
}

#[test]
fn lazily_registered_operand_is_bound_to_the_graph() {
    let graph = Rc::new(Graph::new());
    let mut b = Record::new(2.0);
    b.register(&graph);
    let a = Record::new(3.0);

    let _ = &b + &a;

    let a_graph = a.graph().expect("a should now be bound to the graph");
    assert!(Rc::ptr_eq(&a_graph, &graph));
}

#[test]
fn reconciliation_shared_graph() {
    let graph = Rc::new(Graph::new());
    let mut x = Record::new(1.0);
    let mut y = Record::new(2.0);
    x.register(&graph);
    y.register(&graph);

    let z = &x + &y;

    let z_graph = z.graph().expect("result should share the operands' graph");
    assert!(Rc::ptr_eq(&z_graph, &graph));
    assert!(z.id().is_some());
}

#[test]
fn reconciliation_single_graph_wins() {
    for register_lhs in [true, false] {
        let graph = Rc::new(Graph::new());
        let mut x = Record::new(1.0);
        let mut y = Record::new(2.0);
        if register_lhs {
            x.register(&graph);
        } else {
            y.register(&graph);
        }

        let z = &x + &y;

        let z_graph = z.graph().expect("result should adopt the non-null graph");
        assert!(Rc::ptr_eq(&z_graph, &graph));
        assert_eq!(graph.len(), 3);
    }
}

#[test]
fn reconciliation_no_graph_stays_numeric() {
    let x = Record::new(1.0);
    let y = Record::new(2.0);

    let z = &x + &y;

    assert_eq!(*z.value(), 3.0);
    assert!(z.graph().is_none());
    assert_eq!(z.id(), None);
    assert_eq!(x.id(), None);
    assert_eq!(y.id(), None);
}

#[test]
fn reconciliation_distinct_graphs_stops_tracing() {
    let g1 = Rc::new(Graph::new());
    let g2 = Rc::new(Graph::new());
    let mut x = Record::new(1.0);
    let mut y = Record::new(2.0);
    x.register(&g1);
    y.register(&g2);

    let z = &x + &y;

    assert_eq!(*z.value(), 3.0);
    assert!(z.graph().is_none());
    assert_eq!(z.id(), None);
    // Neither graph gained a node.
    assert_eq!(g1.len(), 1);
    assert_eq!(g2.len(), 1);
}

#[test]
fn untraced_result_can_keep_computing() {
    let g1 = Rc::new(Graph::new());
    let g2 = Rc::new(Graph::new());
    let mut x = Record::new(1.0);
    let mut y = Record::new(2.0);
    x.register(&g1);
    y.register(&g2);

    let z = &x + &y;
    let w = &z * &z;

    assert_eq!(*w.value(), 9.0);
    assert!(w.graph().is_none());
}

#[test]
fn register_all_and_register_inputs() {
    let graph = Rc::new(Graph::new());
    let mut values = vec![Record::new(1.0), Record::new(2.0), Record::new(3.0)];
    register_all(values.iter_mut(), &graph);
    assert_eq!(graph.len(), 3);
    assert!(graph.nodes().iter().all(|n| n.io == IoKind::Intermediate));

    let mut inputs = vec![Record::new(4.0), Record::new(5.0)];
    register_inputs(inputs.iter_mut(), &graph);
    assert_eq!(graph.len(), 5);
    assert_eq!(graph.node(NodeId(3)).io, IoKind::Input);
    assert_eq!(graph.node(NodeId(4)).io, IoKind::Input);
}

#[test]
#[should_panic(expected = "not registered")]
fn marking_unregistered_value_is_fatal() {
    let x = Record::new(1.0);
    x.mark_output();
}

//! End-to-end resolution scenarios through the public API.

mod common;

use common::{Catalog, init_tracing};
use genbind::{
    AmbiguityPolicy, GenericTypeBuilder, ResolveError, ResolverOptions, TypeDatabase, TypeId,
    make_closed_implementation,
};

#[test]
fn test_round_trip() {
    init_tracing();
    let c = Catalog::new();
    let closed = make_closed_implementation(
        &c.store,
        c.apply(c.irepository, &[c.customer]),
        c.store.open(c.repository),
    )
    .expect("well-formed input");
    assert_eq!(c.format(closed).as_deref(), Some("Repository<Customer>"));
}

#[test]
fn test_nested_argument_unification() {
    init_tracing();
    let c = Catalog::new();
    // class ValidatingRepository<T> : IRepository<IValidator<T>>
    let validating = c.store.declare_class("ValidatingRepository", &["T"]);
    let t = c.store.param(validating, 0);
    c.store.add_implements(
        validating,
        c.apply(c.irepository, &[c.apply(c.validator, &[t])]),
    );
    let open = c.store.open(validating);

    let matching = c.apply(c.irepository, &[c.apply(c.validator, &[c.customer])]);
    let closed = make_closed_implementation(&c.store, matching, open).expect("well-formed input");
    assert_eq!(
        c.format(closed).as_deref(),
        Some("ValidatingRepository<Customer>")
    );

    let other = c.apply(c.irepository, &[c.apply(c.ilist, &[c.customer])]);
    assert_eq!(make_closed_implementation(&c.store, other, open), Ok(None));
}

#[test]
fn test_partial_closure() {
    init_tracing();
    let c = Catalog::new();
    // class Dispatcher<T, U> : IHandler<U>
    let dispatcher = c.store.declare_class("Dispatcher", &["T", "U"]);
    let u = c.store.param(dispatcher, 1);
    c.store.add_implements(dispatcher, c.apply(c.ihandler, &[u]));

    let partial = c.apply(dispatcher, &[c.int, u]);
    let closed = make_closed_implementation(&c.store, c.apply(c.ihandler, &[c.string]), partial)
        .expect("well-formed input");
    assert_eq!(c.format(closed).as_deref(), Some("Dispatcher<int, string>"));
}

#[test]
fn test_constraint_enforcement() {
    init_tracing();
    let c = Catalog::new();
    // class SortedRepository<T> : IRepository<T> where T : IComparable<T>
    let sorted = c.store.declare_class("SortedRepository", &["T"]);
    let t = c.store.param(sorted, 0);
    c.store.add_implements(sorted, c.apply(c.irepository, &[t]));
    c.store.constrain(sorted, 0, vec![c.apply(c.comparable, &[t])]);
    let open = c.store.open(sorted);

    let closed = make_closed_implementation(&c.store, c.apply(c.irepository, &[c.int]), open)
        .expect("well-formed input");
    assert_eq!(c.format(closed).as_deref(), Some("SortedRepository<int>"));

    assert_eq!(
        make_closed_implementation(&c.store, c.apply(c.irepository, &[c.customer]), open),
        Ok(None)
    );
}

#[test]
fn test_mutually_recursive_constraints_terminate() {
    init_tracing();
    let c = Catalog::new();
    let inode = c.store.declare_interface("INode", &["TEdge"]);
    let iedge = c.store.declare_interface("IEdge", &["TNode"]);
    let igraph = c.store.declare_interface("IGraph", &["TNode"]);

    // class Graph<TNode, TEdge> : IGraph<TNode>
    //     where TNode : INode<TEdge>
    //     where TEdge : IEdge<TNode>
    let graph = c.store.declare_class("Graph", &["TNode", "TEdge"]);
    let node_param = c.store.param(graph, 0);
    let edge_param = c.store.param(graph, 1);
    c.store.add_implements(graph, c.apply(igraph, &[node_param]));
    c.store.constrain(graph, 0, vec![c.apply(inode, &[edge_param])]);
    c.store.constrain(graph, 1, vec![c.apply(iedge, &[node_param])]);

    let city_def = c.store.declare_class("City", &[]);
    let road_def = c.store.declare_class("Road", &[]);
    let city = c.store.named(city_def);
    let road = c.store.named(road_def);
    c.store.add_implements(city_def, c.apply(inode, &[road]));
    c.store.add_implements(road_def, c.apply(iedge, &[city]));

    let open = c.store.open(graph);
    let closed = make_closed_implementation(&c.store, c.apply(igraph, &[city]), open)
        .expect("well-formed input");
    assert_eq!(c.format(closed).as_deref(), Some("Graph<City, Road>"));

    assert_eq!(
        make_closed_implementation(&c.store, c.apply(igraph, &[c.customer]), open),
        Ok(None)
    );
}

#[test]
fn test_naked_parameter_cycle_terminates() {
    init_tracing();
    let c = Catalog::new();
    // class Alias<T, U> : IHandler<T> where T : U where U : T
    let alias = c.store.declare_class("Alias", &["T", "U"]);
    let t = c.store.param(alias, 0);
    let u = c.store.param(alias, 1);
    c.store.add_implements(alias, c.apply(c.ihandler, &[t]));
    c.store.constrain(alias, 0, vec![u]);
    c.store.constrain(alias, 1, vec![t]);

    let closed = make_closed_implementation(
        &c.store,
        c.apply(c.ihandler, &[c.order]),
        c.store.open(alias),
    )
    .expect("well-formed input");
    assert_eq!(c.format(closed).as_deref(), Some("Alias<Order, Order>"));
}

#[test]
fn test_self_referential_hierarchy_terminates() {
    init_tracing();
    let c = Catalog::new();
    // class Grow<T> : Grow<List<T>>, IHandler<T>
    let grow = c.store.declare_class("Grow", &["T"]);
    let t = c.store.param(grow, 0);
    c.store
        .set_extends(grow, c.apply(grow, &[c.apply(c.list, &[t])]));
    c.store.add_implements(grow, c.apply(c.ihandler, &[t]));

    // Every level of the chain implements IHandler of a different list depth,
    // so the requested element matches at most a bounded number of candidates.
    let closed = make_closed_implementation(
        &c.store,
        c.apply(c.ihandler, &[c.customer]),
        c.store.open(grow),
    )
    .expect("well-formed input");
    assert_eq!(c.format(closed).as_deref(), Some("Grow<Customer>"));
}

#[test]
fn test_repeated_calls_are_identical() {
    init_tracing();
    let c = Catalog::new();
    let abstraction = c.apply(c.irepository, &[c.apply(c.list, &[c.customer])]);
    let implementation = c.store.open(c.repository);

    let first = make_closed_implementation(&c.store, abstraction, implementation);
    let interned = c.store.interner().len();
    for _ in 0..10 {
        assert_eq!(
            make_closed_implementation(&c.store, abstraction, implementation),
            first
        );
    }
    assert_eq!(c.store.interner().len(), interned);
}

#[test]
fn test_non_generic_fast_path() {
    init_tracing();
    let c = Catalog::new();
    let customer_repo = c.store.declare_class("CustomerRepository", &[]);
    c.store
        .add_implements(customer_repo, c.apply(c.irepository, &[c.customer]));
    let implementation = c.store.named(customer_repo);

    assert_eq!(
        make_closed_implementation(
            &c.store,
            c.apply(c.irepository, &[c.customer]),
            implementation
        ),
        Ok(Some(implementation))
    );
    assert_eq!(
        make_closed_implementation(&c.store, c.apply(c.irepository, &[c.order]), implementation),
        Ok(None)
    );
}

#[test]
fn test_options_from_json() {
    init_tracing();
    let c = Catalog::new();
    // class Fanout<T> : IHandler<T>, IHandler<List<T>>
    let fanout = c.store.declare_class("Fanout", &["T"]);
    let t = c.store.param(fanout, 0);
    c.store.add_implements(fanout, c.apply(c.ihandler, &[t]));
    c.store
        .add_implements(fanout, c.apply(c.ihandler, &[c.apply(c.list, &[t])]));
    let requested = c.apply(c.ihandler, &[c.apply(c.list, &[c.int])]);
    let open = c.store.open(fanout);

    let options: ResolverOptions =
        serde_json::from_str(r#"{ "ambiguity": "firstMatch" }"#).expect("valid options");
    assert_eq!(options.ambiguity, AmbiguityPolicy::FirstMatch);

    let first = GenericTypeBuilder::new(&c.store, requested, open)
        .with_options(options)
        .build()
        .expect("well-formed input");
    assert_eq!(
        c.format(first.closed_type()).as_deref(),
        Some("Fanout<List<int>>")
    );

    let rejected = GenericTypeBuilder::new(&c.store, requested, open)
        .build()
        .expect("well-formed input");
    assert!(!rejected.is_valid());
}

#[test]
fn test_unknown_type_is_reported() {
    init_tracing();
    let c = Catalog::new();
    let unknown = TypeId(u32::MAX);
    assert_eq!(
        make_closed_implementation(&c.store, c.apply(c.irepository, &[c.customer]), unknown),
        Err(ResolveError::UnknownType(unknown))
    );
    assert!(c.store.lookup(unknown).is_none());
}

#[test]
fn test_implementation_leaking_another_definitions_parameter_is_reported() {
    init_tracing();
    let c = Catalog::new();
    let other = c.store.declare_class("Other", &["X"]);
    let x = c.store.param(other, 0);
    let leaked = c.apply(c.repository, &[x]);

    let result = make_closed_implementation(&c.store, c.apply(c.irepository, &[x]), leaked);
    assert!(matches!(result, Err(ResolveError::ForeignParameter { ty, .. }) if ty == leaked));
}

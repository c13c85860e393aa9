use super::*;
use crate::db::TypeDatabase;
use crate::fixtures::Universe;

fn sorted_set(u: &Universe) -> DefId {
    // class SortedSet<T> where T : IComparable<T>
    let sorted = u.store.declare_class("SortedSet", &["T"]);
    let t = u.store.param(sorted, 0);
    u.store.constrain(sorted, 0, vec![u.apply(u.comparable, &[t])]);
    sorted
}

#[test]
fn test_construct_satisfied_constraint() {
    let u = Universe::new();
    let sorted = sorted_set(&u);
    let ty = construct(&u.store, sorted, &[u.int]).expect("int is comparable");
    assert_eq!(u.format(ty), "SortedSet<int>");
}

#[test]
fn test_construct_violated_constraint() {
    let u = Universe::new();
    let sorted = sorted_set(&u);
    let err = construct(&u.store, sorted, &[u.customer]).unwrap_err();
    assert_eq!(
        err,
        ConstructError::ConstraintViolation {
            param: ParamRef::new(sorted, 0),
            argument: u.customer,
            constraint: u.apply(u.comparable, &[u.customer]),
        }
    );
}

#[test]
fn test_construct_arity_and_unknown_definition() {
    let u = Universe::new();
    assert_eq!(
        construct(&u.store, u.list, &[u.int, u.string]),
        Err(ConstructError::ArityMismatch {
            expected: 1,
            found: 2
        })
    );
    assert_eq!(
        construct(&u.store, DefId(999), &[u.int]),
        Err(ConstructError::UnknownDefinition(DefId(999)))
    );
}

#[test]
fn test_construct_special_constraints() {
    let u = Universe::new();
    let pool = u.store.declare_class("Pool", &["T"]);
    u.store.add_special_constraints(
        pool,
        0,
        SpecialConstraints::REFERENCE_TYPE | SpecialConstraints::DEFAULT_CONSTRUCTOR,
    );
    let service = u.store.named(u.store.declare_interface("IService", &[]));

    assert!(construct(&u.store, pool, &[u.customer]).is_ok());
    assert_eq!(
        construct(&u.store, pool, &[u.int]),
        Err(ConstructError::SpecialConstraintViolation {
            param: ParamRef::new(pool, 0),
            argument: u.int,
            missing: SpecialConstraints::REFERENCE_TYPE,
        })
    );
    assert_eq!(
        construct(&u.store, pool, &[service]),
        Err(ConstructError::SpecialConstraintViolation {
            param: ParamRef::new(pool, 0),
            argument: service,
            missing: SpecialConstraints::DEFAULT_CONSTRUCTOR,
        })
    );
}

#[test]
fn test_construct_with_parameter_arguments() {
    let u = Universe::new();
    let sorted = sorted_set(&u);

    // class Wrapper<U> where U : IComparable<U> can build SortedSet<U>.
    let wrapper = u.store.declare_class("Wrapper", &["U"]);
    let param = u.store.param(wrapper, 0);
    u.store.constrain(wrapper, 0, vec![u.apply(u.comparable, &[param])]);
    assert!(construct(&u.store, sorted, &[param]).is_ok());

    // An unconstrained parameter promises nothing.
    let loose = u.store.declare_class("Loose", &["U"]);
    assert!(construct(&u.store, sorted, &[u.store.param(loose, 0)]).is_err());
}

#[test]
fn test_construct_constraint_mentioning_other_parameter() {
    let u = Universe::new();
    // class Bag<TItem, TList> where TList : IList<TItem>
    let bag = u.store.declare_class("Bag", &["TItem", "TList"]);
    let item = u.store.param(bag, 0);
    u.store.constrain(bag, 1, vec![u.apply(u.ilist, &[item])]);

    assert!(construct(&u.store, bag, &[u.int, u.list_of(u.int)]).is_ok());
    assert!(construct(&u.store, bag, &[u.string, u.list_of(u.int)]).is_err());
    assert_eq!(
        construct(&u.store, bag, &[u.int, u.list_of(u.int)]),
        Ok(u.store.application(bag, &[u.int, u.list_of(u.int)]))
    );
}

use super::*;
use crate::types::TypeArgs;
use std::sync::Arc;

#[test]
fn test_structurally_equal_types_share_id() {
    let interner = TypeInterner::new();
    let customer = interner.named(DefId(1));
    let a = interner.application(DefId(2), &[customer]);
    let b = interner.application(DefId(2), &[customer]);
    assert_eq!(a, b);
    assert_eq!(interner.len(), 2);
}

#[test]
fn test_distinct_arguments_get_distinct_ids() {
    let interner = TypeInterner::new();
    let customer = interner.named(DefId(1));
    let order = interner.named(DefId(3));
    let a = interner.application(DefId(2), &[customer]);
    let b = interner.application(DefId(2), &[order]);
    assert_ne!(a, b);
}

#[test]
fn test_empty_application_normalizes_to_named() {
    let interner = TypeInterner::new();
    let named = interner.named(DefId(7));
    let empty = interner.intern(TypeData::Application {
        def: DefId(7),
        args: TypeArgs::new(),
    });
    assert_eq!(named, empty);
    assert_eq!(interner.lookup(empty), Some(TypeData::Named(DefId(7))));
}

#[test]
fn test_arguments_are_interned_before_application() {
    let interner = TypeInterner::new();
    let param = interner.param(ParamRef::new(DefId(1), 0));
    let inner = interner.application(DefId(2), &[param]);
    let outer = interner.application(DefId(3), &[inner]);
    assert!(param.0 < inner.0);
    assert!(inner.0 < outer.0);
}

#[test]
fn test_lookup_unknown_id() {
    let interner = TypeInterner::new();
    assert!(interner.is_empty());
    assert_eq!(interner.lookup(TypeId(0)), None);
}

#[test]
fn test_concurrent_interning_agrees() {
    let interner = Arc::new(TypeInterner::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let interner = Arc::clone(&interner);
            std::thread::spawn(move || {
                let customer = interner.named(DefId(1));
                interner.application(DefId(2), &[customer])
            })
        })
        .collect();
    let ids: Vec<TypeId> = handles
        .into_iter()
        .map(|handle| handle.join().expect("interning thread panicked"))
        .collect();
    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(interner.len(), 2);
}

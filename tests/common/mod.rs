//! Shared declarations for the integration tests.

#![allow(dead_code)]

use genbind::{DefId, TypeId, TypeStore};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A container's view of an application's types.
pub struct Catalog {
    pub store: TypeStore,
    pub int: TypeId,
    pub string: TypeId,
    pub customer: TypeId,
    pub order: TypeId,
    pub comparable: DefId,
    pub ilist: DefId,
    pub list: DefId,
    pub validator: DefId,
    pub irepository: DefId,
    pub repository: DefId,
    pub ihandler: DefId,
}

impl Catalog {
    pub fn new() -> Self {
        let store = TypeStore::new();

        let comparable = store.declare_interface("IComparable", &["T"]);
        let ilist = store.declare_interface("IList", &["T"]);
        let list = store.declare_class("List", &["T"]);
        store.add_implements(list, store.apply(ilist, &[store.param(list, 0)]));

        let int_def = store.declare_struct("int", &[]);
        let int = store.named(int_def);
        store.add_implements(int_def, store.apply(comparable, &[int]));

        let string_def = store.declare_class("string", &[]);
        let string = store.named(string_def);
        store.add_implements(string_def, store.apply(comparable, &[string]));

        let customer = store.named(store.declare_class("Customer", &[]));
        let order = store.named(store.declare_class("Order", &[]));

        let validator = store.declare_interface("IValidator", &["T"]);
        let irepository = store.declare_interface("IRepository", &["T"]);
        let repository = store.declare_class("Repository", &["T"]);
        store.add_implements(
            repository,
            store.apply(irepository, &[store.param(repository, 0)]),
        );
        let ihandler = store.declare_interface("IHandler", &["T"]);

        Self {
            store,
            int,
            string,
            customer,
            order,
            comparable,
            ilist,
            list,
            validator,
            irepository,
            repository,
            ihandler,
        }
    }

    pub fn apply(&self, def: DefId, args: &[TypeId]) -> TypeId {
        self.store.apply(def, args)
    }

    pub fn format(&self, ty: Option<TypeId>) -> Option<String> {
        ty.map(|ty| self.store.format(ty))
    }
}

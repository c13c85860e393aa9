//! Type database facade.
//!
//! The resolution engine never talks to a concrete type system. It reads
//! types, definitions and names through [`TypeDatabase`], which a host
//! container implements over whatever metadata it has. [`TypeStore`] is the
//! in-memory implementation used by the container and by the tests: a name
//! interner, a [`TypeInterner`] and a [`DefinitionStore`].

use crate::def::{DefId, DefinitionInfo, DefinitionStore};
use crate::format::TypeFormatter;
use crate::intern::TypeInterner;
use crate::types::{ParamRef, SpecialConstraints, TypeData, TypeId, TypeParamInfo, Variance};
use genbind_common::{Atom, Interner};
use std::sync::Arc;

/// Read access to the host type system, plus interning of new
/// instantiations.
///
/// Implementations must be safe to share between threads; the engine reads
/// from several resolution calls concurrently and interns the closed types it
/// produces.
///
/// Ids may be allocated in any order, but following `lookup` through type
/// arguments must always bottom out. A type that reaches itself is rejected
/// by [`validate_type`](crate::validate_type) as
/// [`ResolveError::CyclicType`](crate::ResolveError::CyclicType).
pub trait TypeDatabase: Sync {
    /// Structure behind `id`, or `None` if the id is unknown.
    fn lookup(&self, id: TypeId) -> Option<TypeData>;

    /// Intern a type expression.
    fn intern(&self, data: TypeData) -> TypeId;

    /// Definition behind `def`, or `None` if the id is unknown.
    fn definition(&self, def: DefId) -> Option<Arc<DefinitionInfo>>;

    /// Resolve an interned name.
    fn resolve_atom(&self, atom: Atom) -> Option<Arc<str>>;

    fn application(&self, def: DefId, args: &[TypeId]) -> TypeId {
        self.intern(TypeData::Application {
            def,
            args: args.iter().copied().collect(),
        })
    }

    fn param_type(&self, param: ParamRef) -> TypeId {
        self.intern(TypeData::Param(param))
    }

    /// Declaration of a generic parameter.
    fn param_info(&self, param: ParamRef) -> Option<TypeParamInfo> {
        self.definition(param.owner)?
            .type_params
            .get(param.index as usize)
            .cloned()
    }

    /// The generic type definition of `def`: `def` applied to its own
    /// parameters. Non-generic definitions yield their `Named` type.
    fn definition_type(&self, def: DefId) -> Option<TypeId> {
        let info = self.definition(def)?;
        let args: Vec<TypeId> = (0..info.arity() as u32)
            .map(|index| self.param_type(ParamRef::new(def, index)))
            .collect();
        Some(self.application(def, &args))
    }
}

/// In-memory type system.
pub struct TypeStore {
    atoms: Interner,
    types: TypeInterner,
    defs: DefinitionStore,
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeStore {
    pub fn new() -> Self {
        Self {
            atoms: Interner::new(),
            types: TypeInterner::new(),
            defs: DefinitionStore::new(),
        }
    }

    pub fn interner(&self) -> &TypeInterner {
        &self.types
    }

    pub fn definitions(&self) -> &DefinitionStore {
        &self.defs
    }

    pub fn intern_string(&self, text: &str) -> Atom {
        self.atoms.intern(text)
    }

    /// Register a definition built by the caller.
    pub fn register(&self, info: DefinitionInfo) -> DefId {
        self.defs.register(info)
    }

    fn params(&self, names: &[&str]) -> Vec<TypeParamInfo> {
        names
            .iter()
            .map(|name| TypeParamInfo::new(self.intern_string(name)))
            .collect()
    }

    /// Declare a class with the given parameter names.
    pub fn declare_class(&self, name: &str, params: &[&str]) -> DefId {
        self.register(DefinitionInfo::class(
            self.intern_string(name),
            self.params(params),
        ))
    }

    /// Declare an interface with the given parameter names.
    pub fn declare_interface(&self, name: &str, params: &[&str]) -> DefId {
        self.register(DefinitionInfo::interface(
            self.intern_string(name),
            self.params(params),
        ))
    }

    /// Declare a struct with the given parameter names.
    pub fn declare_struct(&self, name: &str, params: &[&str]) -> DefId {
        self.register(DefinitionInfo::structure(
            self.intern_string(name),
            self.params(params),
        ))
    }

    pub fn named(&self, def: DefId) -> TypeId {
        self.types.named(def)
    }

    pub fn apply(&self, def: DefId, args: &[TypeId]) -> TypeId {
        self.types.application(def, args)
    }

    /// Parameter `index` of `def` as a type.
    pub fn param(&self, def: DefId, index: u32) -> TypeId {
        self.types.param(ParamRef::new(def, index))
    }

    /// Open generic definition type of `def` (`Repository<T>`).
    pub fn open(&self, def: DefId) -> TypeId {
        self.definition_type(def)
            .unwrap_or_else(|| self.types.named(def))
    }

    pub fn set_extends(&self, def: DefId, base: TypeId) -> bool {
        self.defs.set_extends(def, base)
    }

    pub fn add_implements(&self, def: DefId, interface: TypeId) -> bool {
        self.defs.add_implements(def, interface)
    }

    pub fn constrain(&self, def: DefId, index: usize, constraints: Vec<TypeId>) -> bool {
        self.defs.set_param_constraints(def, index, constraints)
    }

    pub fn add_special_constraints(
        &self,
        def: DefId,
        index: usize,
        special: SpecialConstraints,
    ) -> bool {
        self.defs.add_special_constraints(def, index, special)
    }

    pub fn set_variance(&self, def: DefId, index: usize, variance: Variance) -> bool {
        self.defs.set_variance(def, index, variance)
    }

    /// Render `ty` as `Name<Arg, ...>`.
    pub fn format(&self, ty: TypeId) -> String {
        TypeFormatter::new(self).format(ty)
    }
}

impl TypeDatabase for TypeStore {
    fn lookup(&self, id: TypeId) -> Option<TypeData> {
        self.types.lookup(id)
    }

    fn intern(&self, data: TypeData) -> TypeId {
        self.types.intern(data)
    }

    fn definition(&self, def: DefId) -> Option<Arc<DefinitionInfo>> {
        self.defs.get(def)
    }

    fn resolve_atom(&self, atom: Atom) -> Option<Arc<str>> {
        self.atoms.resolve(atom)
    }
}

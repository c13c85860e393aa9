//! Human-readable rendering of type expressions.

use crate::db::TypeDatabase;
use crate::def::DefId;
use crate::types::{TypeData, TypeId};

/// Renders types as `Name<Arg, ...>`, parameters by their declared name.
pub struct TypeFormatter<'a> {
    db: &'a dyn TypeDatabase,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self { db }
    }

    pub fn format(&self, ty: TypeId) -> String {
        let mut out = String::new();
        self.write(ty, &mut out);
        out
    }

    fn write(&self, ty: TypeId, out: &mut String) {
        let Some(data) = self.db.lookup(ty) else {
            out.push_str(&format!("<unknown #{}>", ty.0));
            return;
        };

        match data {
            TypeData::Named(def) => self.write_def_name(def, out),
            TypeData::Application { def, args } => {
                self.write_def_name(def, out);
                out.push('<');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write(*arg, out);
                }
                out.push('>');
            }
            TypeData::Param(param) => {
                let name = self
                    .db
                    .param_info(param)
                    .and_then(|info| self.db.resolve_atom(info.name));
                match name {
                    Some(name) => out.push_str(&name),
                    None => out.push_str(&format!("<param {}#{}>", param.owner.0, param.index)),
                }
            }
        }
    }

    fn write_def_name(&self, def: DefId, out: &mut String) {
        let name = self
            .db
            .definition(def)
            .and_then(|info| self.db.resolve_atom(info.name));
        match name {
            Some(name) => out.push_str(&name),
            None => out.push_str(&format!("<def #{}>", def.0)),
        }
    }
}

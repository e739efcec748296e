//! Lexically-scoped symbol table.
//!
//! A stack of frames rather than a linked list of heap-allocated nodes
//! (the reference's `Scope`/`Symbol` pair) — pushing/popping a `Vec`
//! entry gets the same innermost-first lookup without manual frees.

use inkwell::types::BasicTypeEnum;
use inkwell::values::PointerValue;
use lpc_util::Symbol;
use rustc_hash::FxHashMap;

pub struct Scope<'ctx> {
    frames: Vec<FxHashMap<Symbol, (PointerValue<'ctx>, BasicTypeEnum<'ctx>)>>,
}

impl<'ctx> Scope<'ctx> {
    pub fn new() -> Self {
        Scope { frames: vec![FxHashMap::default()] }
    }

    pub fn push(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    pub fn pop(&mut self) {
        self.frames.pop();
        debug_assert!(!self.frames.is_empty(), "popped the root scope frame");
    }

    pub fn define(&mut self, name: Symbol, value: PointerValue<'ctx>, ty: BasicTypeEnum<'ctx>) {
        self.frames
            .last_mut()
            .expect("at least one scope frame is always open")
            .insert(name, (value, ty));
    }

    pub fn lookup(&self, name: Symbol) -> Option<(PointerValue<'ctx>, BasicTypeEnum<'ctx>)> {
        self.frames.iter().rev().find_map(|frame| frame.get(&name).copied())
    }
}

impl<'ctx> Default for Scope<'ctx> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell::context::Context;

    #[test]
    fn lookup_finds_innermost_binding_first() {
        let context = Context::create();
        let i64_type = context.i64_type();
        let builder = context.create_builder();
        let module = context.create_module("scope_test");
        let func = module.add_function("f", context.void_type().fn_type(&[], false), None);
        let entry = context.append_basic_block(func, "entry");
        builder.position_at_end(entry);

        let outer_slot = builder.build_alloca(i64_type, "outer").unwrap();
        let inner_slot = builder.build_alloca(i64_type, "inner").unwrap();

        let name = Symbol::intern("x");
        let mut scope = Scope::new();
        scope.define(name, outer_slot, i64_type.into());
        scope.push();
        scope.define(name, inner_slot, i64_type.into());

        let (found, _) = scope.lookup(name).unwrap();
        assert_eq!(found, inner_slot);

        scope.pop();
        let (found, _) = scope.lookup(name).unwrap();
        assert_eq!(found, outer_slot);
    }

    #[test]
    fn lookup_misses_after_scope_closes() {
        let context = Context::create();
        let i64_type = context.i64_type();
        let builder = context.create_builder();
        let module = context.create_module("scope_test");
        let func = module.add_function("f", context.void_type().fn_type(&[], false), None);
        let entry = context.append_basic_block(func, "entry");
        builder.position_at_end(entry);
        let slot = builder.build_alloca(i64_type, "x").unwrap();

        let name = Symbol::intern("y");
        let mut scope = Scope::new();
        scope.push();
        scope.define(name, slot, i64_type.into());
        scope.pop();

        assert!(scope.lookup(name).is_none());
    }
}

//! AST type annotations to LLVM types.

use inkwell::context::Context;
use inkwell::types::BasicTypeEnum;
use inkwell::AddressSpace;
use lpc_ast::Type;

/// Maps a type annotation to the LLVM type used for its storage slot.
///
/// `Void` has no `BasicTypeEnum` representation in LLVM (you cannot
/// `alloca` a void) — since the only place this mapping is consulted is
/// a `Let`'s target type, it folds into the same `i64` fallback used for
/// every other kind this grammar has no real codegen meaning for
/// (`Unknown`, `Array`, `Func`, `Async`).
pub fn llvm_type<'ctx>(context: &'ctx Context, ty: &Type) -> BasicTypeEnum<'ctx> {
    match ty {
        Type::I8 | Type::U8 => context.i8_type().into(),
        Type::I16 | Type::U16 => context.i16_type().into(),
        Type::I32 | Type::U32 => context.i32_type().into(),
        Type::I64 | Type::U64 => context.i64_type().into(),
        Type::F32 => context.f32_type().into(),
        Type::F64 => context.f64_type().into(),
        Type::Str | Type::Ptr => context.ptr_type(AddressSpace::default()).into(),
        Type::Void | Type::Unknown | Type::Array(..) | Type::Func(..) | Type::Async(..) => {
            context.i64_type().into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_integer_width() {
        let context = Context::create();
        assert_eq!(llvm_type(&context, &Type::I8), context.i8_type().into());
        assert_eq!(llvm_type(&context, &Type::U16), context.i16_type().into());
        assert_eq!(llvm_type(&context, &Type::I32), context.i32_type().into());
        assert_eq!(llvm_type(&context, &Type::U64), context.i64_type().into());
    }

    #[test]
    fn maps_float_widths() {
        let context = Context::create();
        assert_eq!(llvm_type(&context, &Type::F32), context.f32_type().into());
        assert_eq!(llvm_type(&context, &Type::F64), context.f64_type().into());
    }

    #[test]
    fn str_and_ptr_map_to_opaque_pointer() {
        let context = Context::create();
        let expected: BasicTypeEnum = context.ptr_type(AddressSpace::default()).into();
        assert_eq!(llvm_type(&context, &Type::Str), expected);
        assert_eq!(llvm_type(&context, &Type::Ptr), expected);
    }

    #[test]
    fn unrepresentable_kinds_fall_back_to_i64() {
        let context = Context::create();
        let i64_type: BasicTypeEnum = context.i64_type().into();
        assert_eq!(llvm_type(&context, &Type::Void), i64_type);
        assert_eq!(llvm_type(&context, &Type::Unknown), i64_type);
    }
}

//! AST-to-LLVM lowering.

use std::path::Path;

use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::passes::PassBuilderOptions;
use inkwell::targets::{
    CodeModel, FileType, InitializationConfig, RelocMode, Target, TargetMachine, TargetTriple,
};
use inkwell::values::{BasicValueEnum, FunctionValue, InstructionValue, IntValue};
use inkwell::{AddressSpace, FloatPredicate, IntPredicate, OptimizationLevel};

use lpc_ast::{BinOp, Block, Expr, ExprKind, Type, UnOp};
use lpc_util::{Handler, Span, Symbol};

use crate::error::{CodeGenError, Result};
use crate::scope::Scope;
use crate::types::llvm_type;

fn llvm_err(e: impl std::fmt::Display) -> CodeGenError {
    CodeGenError::MissingValue(e.to_string())
}

fn expr_kind_name(kind: &ExprKind) -> String {
    let name = match kind {
        ExprKind::Lambda(..) => "lambda expression",
        ExprKind::Apply(..) => "function application",
        ExprKind::Array(..) => "array literal",
        ExprKind::Index(..) => "index expression",
        ExprKind::Async(..) => "async expression",
        ExprKind::Await(..) => "await expression",
        ExprKind::GpuKernel(..) => "gpu kernel",
        ExprKind::Let(..) => "let binding in expression position",
        ExprKind::For(..) => "for loop in expression position",
        ExprKind::Block(..) => "block in expression position",
        ExprKind::Program(..) => "nested program",
        _ => "expression",
    };
    name.to_string()
}

fn optimization_level(opt_level: u8) -> OptimizationLevel {
    match opt_level {
        n if n >= 3 => OptimizationLevel::Aggressive,
        2 => OptimizationLevel::Default,
        1 => OptimizationLevel::Less,
        _ => OptimizationLevel::None,
    }
}

fn opt_passes(opt_level: u8) -> &'static str {
    match opt_level {
        1 => "default<O1>",
        2 => "default<O2>",
        _ => "default<O3>",
    }
}

pub struct CodeGen<'ctx> {
    context: &'ctx Context,
    module: Module<'ctx>,
    builder: Builder<'ctx>,
    target_machine: TargetMachine,
    opt_level: u8,
    scope: Scope<'ctx>,
}

impl<'ctx> CodeGen<'ctx> {
    pub fn new(
        context: &'ctx Context,
        module_name: &str,
        target_triple: Option<&str>,
        opt_level: u8,
    ) -> Result<Self> {
        Target::initialize_all(&InitializationConfig::default());

        let module = context.create_module(module_name);
        let triple = match target_triple {
            Some(t) => TargetTriple::create(t),
            None => TargetMachine::get_default_triple(),
        };
        module.set_triple(&triple);

        let target =
            Target::from_triple(&triple).map_err(|e| CodeGenError::TargetInitFailed(e.to_string()))?;

        let target_machine = target
            .create_target_machine(
                &triple,
                "generic",
                "",
                optimization_level(opt_level),
                RelocMode::Default,
                CodeModel::Default,
            )
            .ok_or_else(|| {
                CodeGenError::TargetInitFailed("no target machine for this triple".to_string())
            })?;

        module.set_data_layout(&target_machine.get_target_data().get_data_layout());

        Ok(CodeGen {
            context,
            module,
            builder: context.create_builder(),
            target_machine,
            opt_level,
            scope: Scope::new(),
        })
    }

    pub fn emit_ir(&self) -> String {
        self.module.print_to_string().to_string()
    }

    pub fn write_object_file(&self, path: &Path) -> Result<()> {
        self.target_machine
            .write_to_file(&self.module, FileType::Object, path)
            .map_err(|e| CodeGenError::ObjectEmitFailed(e.to_string()))
    }

    /// Lowers every top-level statement into `main`'s entry block,
    /// closes the function with `ret i32 0`, soft-verifies the module,
    /// and — above `-O0` — runs the LLVM pass pipeline. A failed verify
    /// is pushed onto `handler` as a warning rather than returned, so the
    /// caller keeps going and still sees it surfaced at the end of the
    /// run.
    pub fn compile_program(&mut self, program: &Expr, handler: &Handler) -> Result<()> {
        let main_type = self.context.i32_type().fn_type(&[], false);
        let main_fn = self.module.add_function("main", main_type, None);
        let entry = self.context.append_basic_block(main_fn, "entry");
        self.builder.position_at_end(entry);

        if let ExprKind::Program(stmts) = &program.kind {
            for stmt in stmts {
                self.codegen_stmt(stmt)?;
            }
        }

        self.builder
            .build_return(Some(&self.context.i32_type().const_int(0, false)))
            .map_err(llvm_err)?;

        if let Err(message) = self.module.verify() {
            let message = message.to_string();
            tracing::warn!(error = %message, "module failed LLVM verification");
            handler.warning(message, Span::DUMMY);
        }

        if self.opt_level > 0 {
            self.run_optimizer()?;
        }

        Ok(())
    }

    fn run_optimizer(&self) -> Result<()> {
        let options = PassBuilderOptions::create();
        options.set_loop_vectorization(true);
        options.set_slp_vectorization(true);
        options.set_loop_unrolling(true);

        self.module
            .run_passes(opt_passes(self.opt_level), &self.target_machine, options)
            .map_err(|e| CodeGenError::ObjectEmitFailed(format!("optimization pipeline: {e}")))
    }

    fn current_function(&self) -> Result<FunctionValue<'ctx>> {
        self.builder
            .get_insert_block()
            .and_then(|bb| bb.get_parent())
            .ok_or_else(|| CodeGenError::BlockNotFound("no open insertion point".to_string()))
    }

    fn codegen_stmt(&mut self, expr: &Expr) -> Result<()> {
        match &expr.kind {
            ExprKind::Let(name, ty, value) => self.codegen_let(*name, ty.as_ref(), value),
            ExprKind::For(var, start, end, body, is_parallel) => {
                self.codegen_for(*var, start, end, body, *is_parallel)
            }
            ExprKind::Block(block) => self.codegen_block(block),
            ExprKind::Builtin(name, args) => {
                self.codegen_builtin(*name, args)?;
                Ok(())
            }
            _ => {
                self.codegen_expr(expr)?;
                Ok(())
            }
        }
    }

    fn codegen_block(&mut self, block: &Block) -> Result<()> {
        self.scope.push();
        let result = block.stmts.iter().try_for_each(|stmt| self.codegen_stmt(stmt));
        self.scope.pop();
        result
    }

    fn codegen_let(&mut self, name: Symbol, annotation: Option<&Type>, value: &Expr) -> Result<()> {
        let init = self.codegen_expr(value)?;
        let target_type = match annotation {
            Some(ty) => llvm_type(self.context, ty),
            None => init.get_type(),
        };
        let coerced = self.coerce(init, target_type)?;

        let slot = self.builder.build_alloca(target_type, name.as_str()).map_err(llvm_err)?;
        self.builder.build_store(slot, coerced).map_err(llvm_err)?;
        self.scope.define(name, slot, target_type);
        Ok(())
    }

    fn codegen_for(
        &mut self,
        var: Symbol,
        start: &Expr,
        end: &Expr,
        body: &Block,
        is_parallel: bool,
    ) -> Result<()> {
        let function = self.current_function()?;
        let i64_type = self.context.i64_type();

        let start_val = self.codegen_expr(start)?;
        let end_val = self.codegen_expr(end)?;
        let start_int = self.coerce(start_val, i64_type.into())?.into_int_value();
        let end_int = self.coerce(end_val, i64_type.into())?.into_int_value();

        let loop_slot = self.builder.build_alloca(i64_type, var.as_str()).map_err(llvm_err)?;
        self.builder.build_store(loop_slot, start_int).map_err(llvm_err)?;

        let loop_bb = self.context.append_basic_block(function, "loop");
        let body_bb = self.context.append_basic_block(function, "body");
        let after_bb = self.context.append_basic_block(function, "after");

        self.builder.build_unconditional_branch(loop_bb).map_err(llvm_err)?;

        self.builder.position_at_end(loop_bb);
        let current = self
            .builder
            .build_load(i64_type, loop_slot, "i")
            .map_err(llvm_err)?
            .into_int_value();
        let cond = self
            .builder
            .build_int_compare(IntPredicate::SLT, current, end_int, "loopcond")
            .map_err(llvm_err)?;
        let branch = self
            .builder
            .build_conditional_branch(cond, body_bb, after_bb)
            .map_err(llvm_err)?;

        if is_parallel {
            self.attach_parallel_metadata(branch)?;
        }

        self.builder.position_at_end(body_bb);
        self.scope.push();
        self.scope.define(var, loop_slot, i64_type.into());
        let body_result = body.stmts.iter().try_for_each(|stmt| self.codegen_stmt(stmt));
        self.scope.pop();
        body_result?;

        let current = self
            .builder
            .build_load(i64_type, loop_slot, "cur")
            .map_err(llvm_err)?
            .into_int_value();
        let next = self
            .builder
            .build_int_add(current, i64_type.const_int(1, false), "next")
            .map_err(llvm_err)?;
        self.builder.build_store(loop_slot, next).map_err(llvm_err)?;
        self.builder.build_unconditional_branch(loop_bb).map_err(llvm_err)?;

        self.builder.position_at_end(after_bb);
        Ok(())
    }

    /// See DESIGN.md's "`@parallel` loop-id metadata self-reference"
    /// decision: `loop_id` is an empty node, not a self-reference.
    fn attach_parallel_metadata(&self, branch: InstructionValue<'ctx>) -> Result<()> {
        let ctx = self.context;
        let true_val = ctx.bool_type().const_int(1, false);

        let loop_id = ctx.metadata_node(&[]);

        let parallel_str = ctx.metadata_string("llvm.loop.parallel_accesses");
        let parallel_md = ctx.metadata_node(&[parallel_str.into()]);

        let vec_str = ctx.metadata_string("llvm.loop.vectorize.enable");
        let vec_md = ctx.metadata_node(&[vec_str.into(), true_val.into()]);

        let unroll_str = ctx.metadata_string("llvm.loop.unroll.enable");
        let unroll_md = ctx.metadata_node(&[unroll_str.into(), true_val.into()]);

        let loop_md =
            ctx.metadata_node(&[loop_id.into(), parallel_md.into(), vec_md.into(), unroll_md.into()]);

        let kind_id = ctx.get_kind_id("llvm.loop");
        branch
            .set_metadata(loop_md, kind_id)
            .map_err(|e| CodeGenError::MissingValue(e.to_string()))
    }

    fn codegen_expr(&mut self, expr: &Expr) -> Result<BasicValueEnum<'ctx>> {
        match &expr.kind {
            ExprKind::IntLit(v) => Ok(self.context.i64_type().const_int(*v as u64, true).into()),
            ExprKind::FloatLit(v) => Ok(self.context.f64_type().const_float(*v).into()),
            ExprKind::StrLit(sym) => {
                let ptr = self
                    .builder
                    .build_global_string_ptr(sym.as_str(), "str")
                    .map_err(llvm_err)?
                    .as_pointer_value();
                Ok(ptr.into())
            }
            ExprKind::Ident(name) => {
                let (ptr, ty) = self.scope.lookup(*name).ok_or_else(|| {
                    CodeGenError::MissingValue(format!("undefined name `{}`", name.as_str()))
                })?;
                self.builder.build_load(ty, ptr, name.as_str()).map_err(llvm_err)
            }
            ExprKind::Binary(op, lhs, rhs) => self.codegen_binary(*op, lhs, rhs),
            ExprKind::Unary(op, operand) => self.codegen_unary(*op, operand),
            ExprKind::Ternary(cond, then_e, else_e) => self.codegen_ternary(cond, then_e, else_e),
            ExprKind::Builtin(name, args) => Ok(self
                .codegen_builtin(*name, args)?
                .unwrap_or_else(|| self.context.i64_type().const_int(0, false).into())),
            other => Err(CodeGenError::Unsupported(expr_kind_name(other))),
        }
    }

    fn codegen_binary(&mut self, op: BinOp, lhs: &Expr, rhs: &Expr) -> Result<BasicValueEnum<'ctx>> {
        let left = self.codegen_expr(lhs)?;
        let right = self.codegen_expr(rhs)?;

        if matches!(op, BinOp::And | BinOp::Or) {
            let lb = self.truthiness(left)?;
            let rb = self.truthiness(right)?;
            let combined = match op {
                BinOp::And => self.builder.build_and(lb, rb, "and").map_err(llvm_err)?,
                BinOp::Or => self.builder.build_or(lb, rb, "or").map_err(llvm_err)?,
                _ => unreachable!(),
            };
            return Ok(self
                .builder
                .build_int_z_extend(combined, self.context.i64_type(), "bool_zext")
                .map_err(llvm_err)?
                .into());
        }

        let is_float =
            matches!(left, BasicValueEnum::FloatValue(_)) || matches!(right, BasicValueEnum::FloatValue(_));
        let (left, right) = if is_float {
            (self.to_float(left)?, self.to_float(right)?)
        } else {
            (left, right)
        };

        match op {
            BinOp::Add => Ok(if is_float {
                self.builder
                    .build_float_add(left.into_float_value(), right.into_float_value(), "fadd")
                    .map_err(llvm_err)?
                    .into()
            } else {
                self.builder
                    .build_int_add(left.into_int_value(), right.into_int_value(), "add")
                    .map_err(llvm_err)?
                    .into()
            }),
            BinOp::Sub => Ok(if is_float {
                self.builder
                    .build_float_sub(left.into_float_value(), right.into_float_value(), "fsub")
                    .map_err(llvm_err)?
                    .into()
            } else {
                self.builder
                    .build_int_sub(left.into_int_value(), right.into_int_value(), "sub")
                    .map_err(llvm_err)?
                    .into()
            }),
            BinOp::Mul => Ok(if is_float {
                self.builder
                    .build_float_mul(left.into_float_value(), right.into_float_value(), "fmul")
                    .map_err(llvm_err)?
                    .into()
            } else {
                self.builder
                    .build_int_mul(left.into_int_value(), right.into_int_value(), "mul")
                    .map_err(llvm_err)?
                    .into()
            }),
            BinOp::Div => Ok(if is_float {
                self.builder
                    .build_float_div(left.into_float_value(), right.into_float_value(), "fdiv")
                    .map_err(llvm_err)?
                    .into()
            } else {
                self.builder
                    .build_int_signed_div(left.into_int_value(), right.into_int_value(), "sdiv")
                    .map_err(llvm_err)?
                    .into()
            }),
            BinOp::Mod => Ok(if is_float {
                self.builder
                    .build_float_rem(left.into_float_value(), right.into_float_value(), "frem")
                    .map_err(llvm_err)?
                    .into()
            } else {
                self.builder
                    .build_int_signed_rem(left.into_int_value(), right.into_int_value(), "srem")
                    .map_err(llvm_err)?
                    .into()
            }),
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => {
                let result = if is_float {
                    let pred = match op {
                        BinOp::Eq => FloatPredicate::OEQ,
                        BinOp::Ne => FloatPredicate::ONE,
                        BinOp::Lt => FloatPredicate::OLT,
                        BinOp::Gt => FloatPredicate::OGT,
                        BinOp::Le => FloatPredicate::OLE,
                        BinOp::Ge => FloatPredicate::OGE,
                        _ => unreachable!(),
                    };
                    self.builder
                        .build_float_compare(pred, left.into_float_value(), right.into_float_value(), "fcmp")
                        .map_err(llvm_err)?
                } else {
                    let pred = match op {
                        BinOp::Eq => IntPredicate::EQ,
                        BinOp::Ne => IntPredicate::NE,
                        BinOp::Lt => IntPredicate::SLT,
                        BinOp::Gt => IntPredicate::SGT,
                        BinOp::Le => IntPredicate::SLE,
                        BinOp::Ge => IntPredicate::SGE,
                        _ => unreachable!(),
                    };
                    self.builder
                        .build_int_compare(pred, left.into_int_value(), right.into_int_value(), "icmp")
                        .map_err(llvm_err)?
                };
                Ok(self
                    .builder
                    .build_int_z_extend(result, self.context.i64_type(), "cmp_zext")
                    .map_err(llvm_err)?
                    .into())
            }
            BinOp::And | BinOp::Or => unreachable!("handled above"),
        }
    }

    fn codegen_unary(&mut self, op: UnOp, operand: &Expr) -> Result<BasicValueEnum<'ctx>> {
        let value = self.codegen_expr(operand)?;
        match op {
            UnOp::Neg => match value {
                BasicValueEnum::FloatValue(v) => {
                    Ok(self.builder.build_float_neg(v, "fneg").map_err(llvm_err)?.into())
                }
                BasicValueEnum::IntValue(v) => {
                    Ok(self.builder.build_int_neg(v, "neg").map_err(llvm_err)?.into())
                }
                other => Ok(other),
            },
            UnOp::Not => {
                // The reference always does an `icmp eq` here regardless
                // of operand kind, which is invalid IR for a float
                // operand — this branches on the operand's own kind
                // instead, a forced correctness fix (see DESIGN.md).
                let cmp = match value {
                    BasicValueEnum::FloatValue(v) => {
                        let zero = v.get_type().const_float(0.0);
                        self.builder
                            .build_float_compare(FloatPredicate::OEQ, v, zero, "fnot")
                            .map_err(llvm_err)?
                    }
                    BasicValueEnum::IntValue(v) => {
                        let zero = v.get_type().const_int(0, false);
                        self.builder
                            .build_int_compare(IntPredicate::EQ, v, zero, "inot")
                            .map_err(llvm_err)?
                    }
                    _ => {
                        return Err(CodeGenError::MissingValue(
                            "`!` applied to a non-numeric value".to_string(),
                        ))
                    }
                };
                Ok(self
                    .builder
                    .build_int_z_extend(cmp, self.context.i64_type(), "not")
                    .map_err(llvm_err)?
                    .into())
            }
        }
    }

    fn codegen_ternary(&mut self, cond: &Expr, then_e: &Expr, else_e: &Expr) -> Result<BasicValueEnum<'ctx>> {
        let cond_val = self.codegen_expr(cond)?;
        let cond_bool = self.truthiness(cond_val)?;
        // Both arms are lowered and evaluated unconditionally; `select`
        // is used instead of a branch since this language's arms are
        // always plain value expressions (print is a statement, never
        // a ternary arm in practice).
        let then_val = self.codegen_expr(then_e)?;
        let else_val = self.codegen_expr(else_e)?;
        self.builder.build_select(cond_bool, then_val, else_val, "ternary").map_err(llvm_err)
    }

    fn codegen_builtin(&mut self, name: Symbol, args: &[Expr]) -> Result<Option<BasicValueEnum<'ctx>>> {
        if name.as_str() != "print" {
            return Ok(None);
        }
        let Some(first) = args.first() else {
            return Ok(None);
        };

        let printf = self.printf_decl();
        let mut value = self.codegen_expr(first)?;

        let format = match value {
            BasicValueEnum::FloatValue(v) if v.get_type() == self.context.f32_type() => {
                value = self
                    .builder
                    .build_float_ext(v, self.context.f64_type(), "ftod")
                    .map_err(llvm_err)?
                    .into();
                "%f\n"
            }
            BasicValueEnum::FloatValue(_) => "%f\n",
            BasicValueEnum::PointerValue(_) => "%s\n",
            BasicValueEnum::IntValue(v) => {
                if v.get_type().get_bit_width() < 64 {
                    value = self
                        .builder
                        .build_int_s_extend(v, self.context.i64_type(), "ext")
                        .map_err(llvm_err)?
                        .into();
                }
                "%lld\n"
            }
            _ => "%lld\n",
        };

        let format_ptr = self
            .builder
            .build_global_string_ptr(format, "fmt")
            .map_err(llvm_err)?
            .as_pointer_value();

        let call = self
            .builder
            .build_call(printf, &[format_ptr.into(), value.into()], "printf_call")
            .map_err(llvm_err)?;
        Ok(call.try_as_basic_value().left())
    }

    fn printf_decl(&self) -> FunctionValue<'ctx> {
        if let Some(existing) = self.module.get_function("printf") {
            return existing;
        }
        let ptr_type = self.context.ptr_type(AddressSpace::default());
        let i32_type = self.context.i32_type();
        let fn_type = i32_type.fn_type(&[ptr_type.into()], true);
        self.module.add_function("printf", fn_type, None)
    }

    fn truthiness(&self, value: BasicValueEnum<'ctx>) -> Result<IntValue<'ctx>> {
        match value {
            BasicValueEnum::FloatValue(v) => {
                let zero = v.get_type().const_float(0.0);
                self.builder
                    .build_float_compare(FloatPredicate::ONE, v, zero, "ftruthy")
                    .map_err(llvm_err)
            }
            BasicValueEnum::IntValue(v) => {
                let zero = v.get_type().const_int(0, false);
                self.builder
                    .build_int_compare(IntPredicate::NE, v, zero, "ituthy")
                    .map_err(llvm_err)
            }
            _ => Ok(self.context.bool_type().const_int(1, false)),
        }
    }

    fn to_float(&self, value: BasicValueEnum<'ctx>) -> Result<BasicValueEnum<'ctx>> {
        match value {
            BasicValueEnum::FloatValue(_) => Ok(value),
            BasicValueEnum::IntValue(v) => Ok(self
                .builder
                .build_signed_int_to_float(v, self.context.f64_type(), "int_to_float")
                .map_err(llvm_err)?
                .into()),
            other => Ok(other),
        }
    }

    /// The full numeric-coercion matrix used by `Let` and `For`'s loop
    /// bounds: float↔int via signed conversion, float↔float via an
    /// `fpcast`, int↔int via truncate/sign-extend.
    fn coerce(
        &self,
        value: BasicValueEnum<'ctx>,
        target: inkwell::types::BasicTypeEnum<'ctx>,
    ) -> Result<BasicValueEnum<'ctx>> {
        use inkwell::types::BasicTypeEnum as T;
        match (value, target) {
            (BasicValueEnum::FloatValue(v), T::IntType(t)) => {
                Ok(self.builder.build_float_to_signed_int(v, t, "ftoi").map_err(llvm_err)?.into())
            }
            (BasicValueEnum::IntValue(v), T::FloatType(t)) => {
                Ok(self.builder.build_signed_int_to_float(v, t, "itof").map_err(llvm_err)?.into())
            }
            (BasicValueEnum::FloatValue(v), T::FloatType(t)) => {
                if v.get_type() == t {
                    Ok(v.into())
                } else {
                    Ok(self.builder.build_float_cast(v, t, "fcast").map_err(llvm_err)?.into())
                }
            }
            (BasicValueEnum::IntValue(v), T::IntType(t)) => {
                let src_bits = v.get_type().get_bit_width();
                let dst_bits = t.get_bit_width();
                if src_bits > dst_bits {
                    Ok(self.builder.build_int_truncate(v, t, "trunc").map_err(llvm_err)?.into())
                } else if src_bits < dst_bits {
                    Ok(self.builder.build_int_s_extend(v, t, "sext").map_err(llvm_err)?.into())
                } else {
                    Ok(v.into())
                }
            }
            (other, _) => Ok(other),
        }
    }
}

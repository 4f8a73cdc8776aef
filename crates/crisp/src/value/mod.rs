//! Value representation for runtime values

mod callable;
mod display;
mod impls;

pub use callable::{BuiltinFn, BuiltinFnPtr, LambdaValue};

use std::sync::Arc;

/// Runtime value representation for the Crisp interpreter.
///
/// Parsed source and evaluated results share this one type: a program
/// is a `List` of `Symbol`s and literals until it is evaluated.
///
/// Values are organized into three tiers:
/// - Tier 1: Inline primitives (no allocation)
/// - Tier 2: Heap-allocated data (Arc-wrapped, cheap to clone)
/// - Tier 3: Callables (lambdas and builtins)
#[derive(Clone)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Tier 1: Inline Primitives
    // ═══════════════════════════════════════════════════════════════════
    /// No value. Produced by `define`, `set!` and the printing builtins.
    Void,

    /// 64-bit signed integer
    Integer(i64),

    /// 64-bit floating point
    Float(f64),

    /// Boolean: `true` or `false`
    Bool(bool),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 2: Heap-Allocated Data
    // ═══════════════════════════════════════════════════════════════════
    /// String literal
    String(Arc<String>),

    /// Identifier; evaluates to its binding
    Symbol(Arc<str>),

    /// List: both code and data
    List(Arc<Vec<Value>>),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 3: Callables
    // ═══════════════════════════════════════════════════════════════════
    /// User-defined function created by `lambda`
    Lambda(Arc<LambdaValue>),

    /// Built-in native function
    Builtin(BuiltinFn),
}

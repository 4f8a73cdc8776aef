//! Runtime environment managing symbol bindings

mod frame;
mod prelude;

pub use frame::ScopeGuard;

use crate::context::DEFAULT_MAX_CALL_DEPTH;
use crate::error::EnvironmentError;
use crate::value::{BuiltinFn, Value};

/// A single symbol binding.
#[derive(Debug, Clone)]
pub struct Binding {
    /// The binding's name
    pub name: String,

    /// The bound value
    pub value: Value,

    /// Whether this binding can be reassigned or redefined in place
    pub mutable: bool,
}

/// Binding mode for definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingMode {
    /// Fixed binding; prelude builtins use this
    Immutable,

    /// Reassignable binding; `define`, `let` and parameters use this
    Mutable,
}

/// The runtime environment managing symbol bindings.
///
/// Uses a flat scope design with frame boundaries for efficient
/// scope entry/exit and cache-friendly lookups.
///
/// # Example
///
/// ```
/// use crisp::{Environment, Value};
///
/// let mut env = Environment::new();
///
/// // Global scope
/// env.define("x", Value::Integer(1));
///
/// // Enter a new scope
/// env.push_frame();
/// env.define("y", Value::Integer(2));
/// env.define("x", Value::Integer(10)); // Shadows outer x
///
/// assert_eq!(env.get("x"), Some(&Value::Integer(10)));
/// assert_eq!(env.get("y"), Some(&Value::Integer(2)));
///
/// // Exit scope
/// env.pop_frame();
///
/// assert_eq!(env.get("x"), Some(&Value::Integer(1)));
/// assert_eq!(env.get("y"), None);
/// ```
#[derive(Debug, Clone)]
pub struct Environment {
    /// All bindings in a flat array (most recent at end)
    bindings: Vec<Binding>,

    /// Frame boundaries (indices into bindings)
    /// Each entry marks where a scope begins
    frames: Vec<usize>,

    /// Current call depth (for recursion limiting)
    call_depth: usize,

    /// Maximum allowed call depth
    max_call_depth: usize,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Create a new empty environment.
    pub fn new() -> Self {
        Self::with_max_call_depth(DEFAULT_MAX_CALL_DEPTH)
    }

    /// Create an environment with a custom call depth limit.
    pub fn with_max_call_depth(max_depth: usize) -> Self {
        Self {
            bindings: Vec::new(),
            frames: vec![0], // Start with one frame (global scope)
            call_depth: 0,
            max_call_depth: max_depth,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Frame Management (Scope Entry/Exit)
    // ═══════════════════════════════════════════════════════════════════

    /// Enter a new scope (push a frame).
    ///
    /// All bindings defined after this call will be removed when
    /// `pop_frame()` is called.
    pub fn push_frame(&mut self) {
        self.frames.push(self.bindings.len());
    }

    /// Exit the current scope (pop a frame).
    ///
    /// Removes all bindings defined since the matching `push_frame()`.
    /// Does nothing if at the global scope (won't pop the last frame).
    pub fn pop_frame(&mut self) {
        // Never pop the global frame
        if self.frames.len() > 1 {
            if let Some(boundary) = self.frames.pop() {
                self.bindings.truncate(boundary);
            }
        }
    }

    /// Get the current scope depth (number of frames).
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Check if we're at global scope.
    pub fn is_global_scope(&self) -> bool {
        self.frames.len() == 1
    }

    fn current_frame_start(&self) -> usize {
        *self.frames.last().unwrap_or(&0)
    }

    /// Index where the first non-global binding lives.
    fn locals_start(&self) -> usize {
        self.frames.get(1).copied().unwrap_or(self.bindings.len())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Call Depth Tracking (Stack Overflow Protection)
    // ═══════════════════════════════════════════════════════════════════

    /// Enter a function call. Returns error if max depth exceeded.
    pub fn enter_call(&mut self) -> Result<(), EnvironmentError> {
        if self.call_depth >= self.max_call_depth {
            return Err(EnvironmentError::StackOverflow {
                depth: self.call_depth,
                max: self.max_call_depth,
            });
        }
        self.call_depth += 1;
        Ok(())
    }

    /// Exit a function call.
    pub fn exit_call(&mut self) {
        self.call_depth = self.call_depth.saturating_sub(1);
    }

    /// Get current call depth.
    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    /// Get the configured call depth limit.
    pub fn max_call_depth(&self) -> usize {
        self.max_call_depth
    }

    /// Change the call depth limit.
    pub fn set_max_call_depth(&mut self, max_depth: usize) {
        self.max_call_depth = max_depth;
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Definition
    // ═══════════════════════════════════════════════════════════════════

    /// Define a mutable binding in the current scope.
    ///
    /// A mutable binding of the same name in the current scope is
    /// overwritten in place; otherwise the new binding shadows any
    /// outer one.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.define_with_mode(name, value, BindingMode::Mutable);
    }

    /// Define a binding with explicit mutability.
    pub fn define_with_mode(&mut self, name: impl Into<String>, value: Value, mode: BindingMode) {
        let name = name.into();
        let start = self.current_frame_start();
        let mutable = mode == BindingMode::Mutable;

        if let Some(existing) = self.bindings[start..]
            .iter_mut()
            .rev()
            .find(|b| b.name == name)
        {
            if existing.mutable {
                existing.value = value;
                existing.mutable = mutable;
                return;
            }
        }

        self.bindings.push(Binding {
            name,
            value,
            mutable,
        });
    }

    /// Register a built-in function as an immutable binding.
    pub fn define_builtin(&mut self, builtin: BuiltinFn) {
        let name = builtin.name.clone();
        self.define_with_mode(name, Value::Builtin(builtin), BindingMode::Immutable);
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Lookup
    // ═══════════════════════════════════════════════════════════════════

    /// Look up a binding by name.
    ///
    /// Returns the most recent binding with the given name (shadowing),
    /// or `None` if not found.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.get_binding(name).map(|b| &b.value)
    }

    /// Look up a binding and return the full Binding struct.
    pub fn get_binding(&self, name: &str) -> Option<&Binding> {
        // Search backwards to find most recent binding
        self.bindings.iter().rev().find(|b| b.name == name)
    }

    /// Look up a name among non-global bindings only.
    pub fn get_local(&self, name: &str) -> Option<&Value> {
        let start = self.locals_start();
        self.bindings[start..]
            .iter()
            .rev()
            .find(|b| b.name == name)
            .map(|b| &b.value)
    }

    /// Check if a binding exists.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.iter().any(|b| b.name == name)
    }

    /// Check if a binding exists in the current (innermost) scope only.
    pub fn contains_in_current_scope(&self, name: &str) -> bool {
        let frame_start = self.current_frame_start();
        self.bindings[frame_start..].iter().any(|b| b.name == name)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Assignment (Mutation)
    // ═══════════════════════════════════════════════════════════════════

    /// Assign a new value to an existing mutable binding.
    ///
    /// # Errors
    ///
    /// - `UndefinedVariable` if the binding doesn't exist
    /// - `ImmutableBinding` if the binding is not mutable
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), EnvironmentError> {
        match self.bindings.iter_mut().rev().find(|b| b.name == name) {
            Some(binding) if !binding.mutable => Err(EnvironmentError::ImmutableBinding {
                name: name.to_string(),
            }),
            Some(binding) => {
                binding.value = value;
                Ok(())
            }
            None => Err(EnvironmentError::UndefinedVariable {
                name: name.to_string(),
            }),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Iteration and Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// Iterate over all bindings (for debugging/REPL).
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    /// Get all binding names in the current scope.
    pub fn names_in_current_scope(&self) -> Vec<&str> {
        let frame_start = self.current_frame_start();
        self.bindings[frame_start..]
            .iter()
            .map(|b| b.name.as_str())
            .collect()
    }

    /// Get all binding names (for completion).
    pub fn all_names(&self) -> Vec<&str> {
        self.bindings.iter().map(|b| b.name.as_str()).collect()
    }

    /// Get the number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if the environment is empty.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Remove every binding, including builtins, and reset to global scope.
    pub fn clear(&mut self) {
        self.bindings.clear();
        self.frames = vec![0];
        self.call_depth = 0;
    }
}

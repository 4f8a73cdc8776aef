//! RAII scope guard for automatic frame cleanup

use super::Environment;

/// Pops the frame it pushed when dropped, so early returns through `?`
/// cannot leak bindings into the enclosing scope.
///
/// # Example
///
/// ```
/// use crisp::{Environment, Value};
///
/// let mut env = Environment::new();
/// env.define("x", Value::Integer(1));
///
/// {
///     let mut scope = env.scope_guard();
///     scope.define("y", Value::Integer(2));
/// }
/// assert!(!env.contains("y"));
/// assert!(env.contains("x"));
/// ```
pub struct ScopeGuard<'a> {
    env: &'a mut Environment,
}

impl Environment {
    /// Push a frame now and pop it when the returned guard drops.
    pub fn scope_guard(&mut self) -> ScopeGuard<'_> {
        self.push_frame();
        ScopeGuard { env: self }
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.env.pop_frame();
    }
}

impl std::ops::Deref for ScopeGuard<'_> {
    type Target = Environment;

    fn deref(&self) -> &Self::Target {
        self.env
    }
}

impl std::ops::DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.env
    }
}

// File: src/interpreter/environment.rs
//
// Frame-stack scope store for the Hiss interpreter.
//
// Hiss has function scoping only: a frame is pushed when a function call
// begins and popped when it returns, and nothing else pushes frames.
// `if`/`elif`/`else` and `for` bodies run in the enclosing frame, which
// is why a loop variable or a variable assigned inside a conditional
// stays visible after the block ends.

use super::value::Value;
use std::collections::HashMap;

/// Variable storage as a genuine stack of frames, innermost last.
/// Lookups search from the innermost frame outward.
#[derive(Clone, Debug)]
pub struct Environment {
    frames: Vec<HashMap<String, Value>>,
}

impl Environment {
    /// Creates an environment with a single global frame.
    pub fn new() -> Self {
        Environment { frames: vec![HashMap::new()] }
    }

    /// Pushes a fresh frame (function-call entry).
    pub fn push_frame(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Pops the innermost frame (function-call exit). The global frame
    /// is never popped.
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Binds a name in the innermost frame, shadowing any outer binding
    /// of the same name.
    pub fn define(&mut self, name: String, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name, value);
        }
    }

    /// Updates an existing binding, searching innermost to outermost;
    /// defines in the innermost frame when the name is unbound anywhere.
    pub fn set(&mut self, name: String, value: Value) {
        for frame in self.frames.iter_mut().rev() {
            if frame.contains_key(&name) {
                frame.insert(name, value);
                return;
            }
        }
        self.define(name, value);
    }

    /// Looks a name up, innermost frame first.
    pub fn get(&self, name: &str) -> Option<Value> {
        for frame in self.frames.iter().rev() {
            if let Some(value) = frame.get(name) {
                return Some(value.clone());
            }
        }
        None
    }

    pub fn has(&self, name: &str) -> bool {
        self.frames.iter().any(|frame| frame.contains_key(name))
    }

    /// Removes the innermost binding of a name. Returns whether a
    /// binding was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        for frame in self.frames.iter_mut().rev() {
            if frame.remove(name).is_some() {
                return true;
            }
        }
        false
    }

    /// The names bound in the global frame, sorted. Used by the REPL's
    /// `:vars` command.
    pub fn global_names(&self) -> Vec<String> {
        let mut names: Vec<String> =
            self.frames.first().map(|f| f.keys().cloned().collect()).unwrap_or_default();
        names.sort();
        names
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

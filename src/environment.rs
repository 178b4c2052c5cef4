//! Variable storage: one flat global namespace plus an explicit stack of
//! call frames.
//!
//! A frame holds the parameter bindings of one pending function call.  Name
//! lookup walks the frames from the innermost call outwards and falls back to
//! the globals, so a recursive call shadows its caller's parameters and the
//! caller sees its own values again once the frame is popped.

use std::collections::HashMap;

use log::debug;

use crate::error::{Result, SbmlError};
use crate::value::Value;

#[derive(Debug, Clone)]
struct Frame {
    function: String,
    bindings: HashMap<String, Value>,
}

#[derive(Debug, Clone, Default)]
pub struct Environment {
    globals: HashMap<String, Value>,
    frames: Vec<Frame>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks `name` up in the pending call frames (innermost first), then in
    /// the globals.
    pub fn get(&self, name: &str, line: usize) -> Result<&Value> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.bindings.get(name))
            .or_else(|| self.globals.get(name))
            .ok_or_else(|| {
                SbmlError::semantic(format!("Undefined variable '{}'. [line {}]", name, line))
            })
    }

    /// Binds `name`, overwriting any prior binding.  A name that is a
    /// parameter of a pending call is updated in that call's frame;
    /// everything else lands in the globals.
    pub fn assign(&mut self, name: &str, value: Value) {
        if let Some(frame) = self
            .frames
            .iter_mut()
            .rev()
            .find(|frame| frame.bindings.contains_key(name))
        {
            debug!("Assigning '{}' in frame of '{}'", name, frame.function);
            frame.bindings.insert(name.to_string(), value);
            return;
        }

        self.globals.insert(name.to_string(), value);
    }

    /// Pushes a frame for a call to `function` with the given parameter
    /// bindings.
    pub fn push_frame<I>(&mut self, function: &str, bindings: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        self.frames.push(Frame {
            function: function.to_string(),
            bindings: bindings.into_iter().collect(),
        });

        debug!("Pushed frame for '{}', depth {}", function, self.frames.len());
    }

    /// Discards the innermost frame, restoring the caller's view.
    pub fn pop_frame(&mut self) {
        if let Some(frame) = self.frames.pop() {
            debug!("Popped frame for '{}', depth {}", frame.function, self.frames.len());
        }
    }

    /// Number of pending calls.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Global binding only, ignoring pending frames.
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn globals_round_trip() {
        let mut env = Environment::new();
        env.assign("x", Value::int(5));

        assert_eq!(env.get("x", 1).unwrap(), &Value::int(5));
        assert!(env.get("y", 1).unwrap_err().is_semantic());
    }

    #[test]
    fn frames_shadow_and_restore() {
        let mut env = Environment::new();
        env.assign("n", Value::int(0));

        env.push_frame("f", vec![("n".to_string(), Value::int(3))]);
        env.push_frame("f", vec![("n".to_string(), Value::int(2))]);
        assert_eq!(env.get("n", 1).unwrap(), &Value::int(2));

        env.pop_frame();
        assert_eq!(env.get("n", 1).unwrap(), &Value::int(3));

        env.pop_frame();
        assert_eq!(env.get("n", 1).unwrap(), &Value::int(0));
        assert_eq!(env.depth(), 0);
    }

    #[test]
    fn outer_parameters_stay_visible() {
        let mut env = Environment::new();

        env.push_frame("f", vec![("a".to_string(), Value::int(1))]);
        env.push_frame("g", vec![("b".to_string(), Value::int(2))]);

        assert_eq!(env.get("a", 1).unwrap(), &Value::int(1));
    }

    #[test]
    fn assignment_targets_the_binding_frame() {
        let mut env = Environment::new();

        env.push_frame("f", vec![("n".to_string(), Value::int(1))]);
        env.assign("n", Value::int(10));
        env.assign("r", Value::int(7));
        env.pop_frame();

        assert!(env.get("n", 1).is_err());
        assert_eq!(env.global("r"), Some(&Value::int(7)));
    }

    #[test]
    fn frame_bindings_alias_lists() {
        let mut env = Environment::new();
        let list = Value::list(vec![Value::int(0)]);

        env.assign("l", list.clone());
        env.push_frame("f", vec![("p".to_string(), list)]);

        if let Value::List(items) = env.get("p", 1).unwrap() {
            items.borrow_mut().push(Value::int(9));
        }
        env.pop_frame();

        assert_eq!(
            env.global("l"),
            Some(&Value::list(vec![Value::int(0), Value::int(9)]))
        );
    }
}

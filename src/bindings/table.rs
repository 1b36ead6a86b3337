//! Name-indexed function table shared by both binding variants.
//!
//! Every entry carries its minimum arity and the message raised when a call
//! comes up short. The check happens here, once, before the handler (and so
//! before the native layer) runs.

use std::collections::HashMap;

use crate::core::{BindingError, BindingResult};
use crate::scripting::{ArgShape, CallArgs, ScriptValue, WriteBack};

/// Arity contract of a registered function, plus the layout each positional
/// argument is read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub min_args: usize,
    pub arity_message: &'static str,
    /// Positions past the end are `ArgShape::Scalar`.
    pub shapes: &'static [ArgShape],
}

impl Signature {
    /// No required arguments.
    pub const fn variadic() -> Self {
        Self {
            min_args: 0,
            arity_message: "",
            shapes: &[],
        }
    }

    pub const fn at_least(min_args: usize, arity_message: &'static str) -> Self {
        Self {
            min_args,
            arity_message,
            shapes: &[],
        }
    }

    pub const fn with_shapes(mut self, shapes: &'static [ArgShape]) -> Self {
        self.shapes = shapes;
        self
    }

    pub fn shape(&self, index: usize) -> ArgShape {
        self.shapes.get(index).copied().unwrap_or_default()
    }
}

/// Result of a successful dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct CallOutcome {
    pub value: ScriptValue,
    /// Fields to assign on the caller's argument objects.
    pub write_backs: Vec<WriteBack>,
}

type Handler<T> = Box<dyn Fn(&mut T, &mut CallArgs) -> BindingResult<ScriptValue> + Send + Sync>;

struct Entry<T> {
    signature: Signature,
    handler: Handler<T>,
}

/// Functions callable by name against a target of type `T`.
pub struct BindingTable<T> {
    entries: HashMap<&'static str, Entry<T>>,
    order: Vec<&'static str>,
}

impl<T> Default for BindingTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BindingTable<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Registers `handler` under `name`, replacing any earlier entry.
    pub fn register_function<F>(&mut self, name: &'static str, signature: Signature, handler: F)
    where
        F: Fn(&mut T, &mut CallArgs) -> BindingResult<ScriptValue> + Send + Sync + 'static,
    {
        let entry = Entry {
            signature,
            handler: Box::new(handler),
        };
        if self.entries.insert(name, entry).is_none() {
            self.order.push(name);
        }
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> &[&'static str] {
        &self.order
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn signature(&self, name: &str) -> Option<Signature> {
        self.entries.get(name).map(|entry| entry.signature)
    }

    /// Dispatches `name` with `values`.
    pub fn call(
        &self,
        target: &mut T,
        name: &str,
        values: Vec<ScriptValue>,
    ) -> BindingResult<CallOutcome> {
        let (&function, entry) = self
            .entries
            .get_key_value(name)
            .ok_or_else(|| BindingError::UnknownFunction(name.to_string()))?;

        if values.len() < entry.signature.min_args {
            tracing::debug!(
                target: "raylib_addon::bridge",
                function,
                expected = entry.signature.min_args,
                received = values.len(),
                "rejected call: too few arguments"
            );
            return Err(BindingError::Arity {
                function,
                expected: entry.signature.min_args,
                received: values.len(),
                message: entry.signature.arity_message,
            });
        }

        tracing::trace!(target: "raylib_addon::bridge", function, argc = values.len(), "dispatch");

        let mut args = CallArgs::new(function, values);
        let value = (entry.handler)(target, &mut args).map_err(|err| {
            tracing::debug!(target: "raylib_addon::bridge", function, error = %err, "rejected call");
            err
        })?;

        Ok(CallOutcome {
            value,
            write_backs: args.into_write_backs(),
        })
    }
}

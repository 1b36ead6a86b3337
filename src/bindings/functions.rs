//! Stateless function-table binding.
//!
//! A flat set of named functions over the process-wide native window. The
//! window's open/closed state lives entirely in the native layer; closing
//! asks it whether there is anything to close.

use crate::config::DefaultColors;
use crate::core::BindingResult;
use crate::native::{NativeLayer, SharedNative};
use crate::scripting::{CallArgs, ScriptValue};

use super::ops::{self, BindingTarget, EXPECTED_3_ARGUMENTS};
use super::table::{BindingTable, CallOutcome, Signature};

/// Target of the stateless table: the native layer plus default colors.
pub struct FunctionTarget {
    native: SharedNative,
    defaults: DefaultColors,
}

impl BindingTarget for FunctionTarget {
    fn native(&self) -> &NativeLayer {
        &self.native
    }

    fn defaults(&self) -> &DefaultColors {
        &self.defaults
    }
}

/// Builds the stateless table: window lifecycle plus the shared operations.
pub fn function_table() -> BindingTable<FunctionTarget> {
    let mut table = BindingTable::new();

    table.register_function(
        "initWindow",
        Signature::at_least(3, EXPECTED_3_ARGUMENTS),
        |t: &mut FunctionTarget, args| init_window(t, args),
    );
    table.register_function("closeWindow", Signature::variadic(), |t: &mut FunctionTarget, _| {
        close_window(t);
        Ok(ScriptValue::Undefined)
    });
    table.register_function("isWindowReady", Signature::variadic(), |t: &mut FunctionTarget, _| {
        Ok(ScriptValue::Bool(t.native.with(|api| api.is_window_ready())))
    });

    ops::register_shared(&mut table);
    table
}

fn init_window(target: &FunctionTarget, args: &CallArgs) -> BindingResult<ScriptValue> {
    let width = args.int32(0)?;
    let height = args.int32(1)?;
    let title = args.string(2)?;
    target
        .native
        .with(|api| api.init_window(width, height, title));
    tracing::info!(target: "raylib_addon::bridge", width, height, title, "window initialized");
    Ok(ScriptValue::Undefined)
}

fn close_window(target: &FunctionTarget) {
    let closed = target.native.with(|api| {
        if api.is_window_ready() {
            api.close_window();
            true
        } else {
            false
        }
    });
    if closed {
        tracing::info!(target: "raylib_addon::bridge", "window closed");
    }
}

/// The stateless binding: a function table bound to one native layer.
pub struct RaylibFunctions {
    target: FunctionTarget,
    table: BindingTable<FunctionTarget>,
}

impl RaylibFunctions {
    pub fn new(native: SharedNative, defaults: DefaultColors) -> Self {
        Self {
            target: FunctionTarget { native, defaults },
            table: function_table(),
        }
    }

    /// Calls the function registered as `name`.
    pub fn call(&mut self, name: &str, values: Vec<ScriptValue>) -> BindingResult<CallOutcome> {
        self.table.call(&mut self.target, name, values)
    }

    pub fn names(&self) -> &[&'static str] {
        self.table.names()
    }

    pub fn signature(&self, name: &str) -> Option<Signature> {
        self.table.signature(name)
    }

    pub fn native(&self) -> &SharedNative {
        &self.target.native
    }
}

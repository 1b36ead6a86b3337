//! Stateful window controller.
//!
//! `RaylibWindow` remembers whether it opened the window and closes it when
//! dropped. Only one controller can be live per native layer at a time, since
//! raylib has a single window.

use crate::config::DefaultColors;
use crate::core::{BindingError, BindingResult};
use crate::native::{NativeLayer, SharedNative};
use crate::scripting::ScriptValue;

use super::ops::{self, BindingTarget, EXPECTED_3_ARGUMENTS};
use super::table::{BindingTable, Signature};

pub struct RaylibWindow {
    native: SharedNative,
    defaults: DefaultColors,
    initialized: bool,
}

impl RaylibWindow {
    /// Claims the window controller slot of `native`.
    pub fn acquire(native: SharedNative, defaults: DefaultColors) -> BindingResult<Self> {
        if !native.try_claim_controller() {
            tracing::warn!(target: "raylib_addon::bridge", "RaylibWindow refused: another controller is live");
            return Err(BindingError::ControllerBusy);
        }
        tracing::debug!(target: "raylib_addon::bridge", "RaylibWindow acquired");
        Ok(Self {
            native,
            defaults,
            initialized: false,
        })
    }

    pub fn init_window(&mut self, width: i32, height: i32, title: &str) {
        self.native
            .with(|api| api.init_window(width, height, title));
        self.initialized = true;
        tracing::info!(target: "raylib_addon::bridge", width, height, title, "controller window initialized");
    }

    /// Closes the window if this controller opened it and it is still open.
    pub fn close_window(&mut self) {
        if !self.initialized {
            return;
        }
        self.initialized = false;

        let closed = self.native.with(|api| {
            if api.is_window_ready() {
                api.close_window();
                true
            } else {
                false
            }
        });
        if closed {
            tracing::info!(target: "raylib_addon::bridge", "controller window closed");
        }
    }

    pub fn is_window_ready(&self) -> bool {
        self.native.with(|api| api.is_window_ready())
    }

    /// Whether `init_window` ran without a matching close.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl BindingTarget for RaylibWindow {
    fn native(&self) -> &NativeLayer {
        &self.native
    }

    fn defaults(&self) -> &DefaultColors {
        &self.defaults
    }
}

impl Drop for RaylibWindow {
    fn drop(&mut self) {
        self.close_window();
        self.native.release_controller();
        tracing::debug!(target: "raylib_addon::bridge", "RaylibWindow released");
    }
}

/// Methods of a `RaylibWindow`, callable by name.
pub fn window_table() -> BindingTable<RaylibWindow> {
    let mut table = BindingTable::new();

    table.register_function(
        "initWindow",
        Signature::at_least(3, EXPECTED_3_ARGUMENTS),
        |w: &mut RaylibWindow, args| {
            let width = args.int32(0)?;
            let height = args.int32(1)?;
            let title = args.string(2)?;
            w.init_window(width, height, title);
            Ok(ScriptValue::Undefined)
        },
    );
    table.register_function("closeWindow", Signature::variadic(), |w: &mut RaylibWindow, _| {
        w.close_window();
        Ok(ScriptValue::Undefined)
    });
    table.register_function("isWindowReady", Signature::variadic(), |w: &mut RaylibWindow, _| {
        Ok(ScriptValue::Bool(w.is_window_ready()))
    });

    ops::register_shared(&mut table);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{HeadlessNative, HeadlessProbe, NativeCall};

    fn setup() -> (SharedNative, HeadlessProbe) {
        let headless = HeadlessNative::new();
        let probe = headless.probe();
        (NativeLayer::new(headless), probe)
    }

    fn closes(probe: &HeadlessProbe) -> usize {
        probe.count(|c| *c == NativeCall::CloseWindow)
    }

    #[test]
    fn test_drop_closes_open_window() {
        let (native, probe) = setup();
        {
            let mut window = RaylibWindow::acquire(native.clone(), DefaultColors::default()).unwrap();
            window.init_window(640, 480, "scoped");
            assert!(window.is_window_ready());
            assert!(native.controller_live());
        }
        assert_eq!(closes(&probe), 1);
        assert!(probe.window().is_none());
        assert!(!native.controller_live());
    }

    #[test]
    fn test_close_then_drop_closes_once() {
        let (native, probe) = setup();
        let mut window = RaylibWindow::acquire(native, DefaultColors::default()).unwrap();
        window.init_window(640, 480, "once");
        window.close_window();
        window.close_window();
        drop(window);
        assert_eq!(closes(&probe), 1);
    }

    #[test]
    fn test_uninitialized_controller_leaves_window_alone() {
        let (native, probe) = setup();
        native.with(|api| api.init_window(320, 240, "opened elsewhere"));

        let mut window = RaylibWindow::acquire(native.clone(), DefaultColors::default()).unwrap();
        assert!(window.is_window_ready());
        assert!(!window.is_initialized());
        window.close_window();
        drop(window);

        assert_eq!(closes(&probe), 0);
        assert!(probe.window().is_some());
    }

    #[test]
    fn test_second_controller_refused() {
        let (native, _) = setup();
        let first = RaylibWindow::acquire(native.clone(), DefaultColors::default()).unwrap();
        let second = RaylibWindow::acquire(native.clone(), DefaultColors::default());
        assert!(matches!(second, Err(BindingError::ControllerBusy)));

        drop(first);
        assert!(RaylibWindow::acquire(native, DefaultColors::default()).is_ok());
    }

    #[test]
    fn test_table_dispatch() {
        let (native, probe) = setup();
        let table = window_table();
        let mut window = RaylibWindow::acquire(native, DefaultColors::default()).unwrap();

        let err = table.call(&mut window, "initWindow", vec![1.into()]).unwrap_err();
        assert_eq!(err.to_string(), "Expected 3 arguments");
        assert_eq!(probe.call_count(), 0);

        table
            .call(&mut window, "initWindow", vec![800.into(), 450.into(), "t".into()])
            .unwrap();
        assert!(window.is_initialized());
        let width = table
            .call(&mut window, "measureText", vec!["Hi".into(), 10.into()])
            .unwrap();
        assert!(matches!(width.value, ScriptValue::Int(w) if w > 0));
        assert_eq!(table.names().len(), 16);
    }
}

//! # raylib_addon
//!
//! raylib exposed to embedded JavaScript (QuickJS).
//!
//! ## Features
//!
//! - **Function table**: `raylib.initWindow(...)`, `raylib.drawText(...)`, ... over the
//!   process-wide window
//! - **Window controller**: `new RaylibWindow()` tracks whether it opened the window and
//!   closes it when released
//! - **Boundary checks**: arity and shape violations become `TypeError`s before any
//!   native call
//! - **Backends**: raylib loaded at runtime, or an in-process headless stand-in
//!
//! ### Example
//!
//! ```no_run
//! use raylib_addon::config::AddonConfig;
//! use raylib_addon::native::NativeLayer;
//! use raylib_addon::JsHost;
//!
//! let config = AddonConfig::load_or_default();
//! let native = NativeLayer::from_config(&config)?;
//! let host = JsHost::new(native, &config)?;
//! host.eval(r#"
//!     raylib.initWindow(800, 450, "hello");
//!     while (!raylib.windowShouldClose()) {
//!         raylib.beginDrawing();
//!         raylib.clearBackground(raylib.RAYWHITE);
//!         raylib.drawText("hello", 190, 200, 20, raylib.LIGHTGRAY);
//!         raylib.endDrawing();
//!     }
//!     raylib.closeWindow();
//! "#)?;
//! # Ok::<(), raylib_addon::core::AddonError>(())
//! ```
//!
//! ## Modules
//!
//! - [`core`]: errors, logging
//! - [`config`]: configuration files and env overrides
//! - [`native`]: native call surface, raylib loader, headless backend
//! - [`scripting`]: script values and argument conversion
//! - [`bindings`]: function table, window controller, JS host

/// Errors, logging and shared macros
pub mod core;
/// Configuration system
pub mod config;
/// Native call surface and its backends
pub mod native;
/// Script values and structured argument conversion
pub mod scripting;
/// Language bindings for scripting
pub mod bindings;

pub use bindings::{JsHost, RaylibFunctions, RaylibWindow};
pub use config::AddonConfig;
pub use core::{AddonError, AddonResult, BindingError};
pub use native::{Camera3D, Color, NativeApi, NativeLayer, SharedNative, Vector3};
pub use scripting::ScriptValue;

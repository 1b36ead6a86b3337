//! Language Binding Layer
//!
//! Two bindings over the same native surface, sharing one dispatch table
//! design and one set of operations.
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     JavaScript (QuickJS)                    │
//! │   raylib.drawText(...)            win.drawText(...)         │
//! │          │                               │                  │
//! │          v                               v                  │
//! │  ┌───────────────────┐       ┌────────────────────────┐    │
//! │  │  RaylibFunctions  │       │  RaylibWindow (flag,   │    │
//! │  │  (stateless)      │       │  closes on Drop)       │    │
//! │  └─────────┬─────────┘       └───────────┬────────────┘    │
//! │            └───────────┬─────────────────┘                 │
//! │                        v                                   │
//! │  ┌─────────────────────────────────────────────────────┐   │
//! │  │  BindingTable: arity check → CallArgs → ops::*      │   │
//! │  └───────────────────────┬─────────────────────────────┘   │
//! │                          v                                  │
//! │  ┌─────────────────────────────────────────────────────┐   │
//! │  │  NativeLayer (raylib via libloading, or headless)   │   │
//! │  └─────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod functions;
pub mod js;
pub mod ops;
pub mod table;
pub mod window;

pub use functions::{function_table, FunctionTarget, RaylibFunctions};
pub use js::{ConsoleLevel, ConsoleLine, JsHost};
pub use ops::BindingTarget;
pub use table::{BindingTable, CallOutcome, Signature};
pub use window::{window_table, RaylibWindow};

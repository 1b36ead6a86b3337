//! JavaScript host using rquickjs
//!
//! Owns a QuickJS runtime with both binding variants installed: the function
//! table as the global `raylib` object and the `RaylibWindow` class (backed
//! by a hidden native object, finished off by `prelude.js`).

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rquickjs::function::Rest;
use rquickjs::{Array, Context, Ctx, Exception, Function, Object, Runtime, Value};

use crate::config::{AddonConfig, DefaultColors};
use crate::core::{BindingError, HostError, HostResult};
use crate::native::{Color, SharedNative};
use crate::scripting::{color_to_value, ArgShape, ScriptObject, ScriptValue};

use super::functions::RaylibFunctions;
use super::table::{BindingTable, CallOutcome, Signature};
use super::window::{window_table, RaylibWindow};

const PRELUDE: &str = include_str!("prelude.js");

/// Nesting beyond this is converted to `undefined` in script results.
const MAX_DEPTH: usize = 32;

/// Severity of a `console.*` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl ConsoleLevel {
    fn parse(level: &str) -> Self {
        match level {
            "debug" => ConsoleLevel::Debug,
            "warn" => ConsoleLevel::Warn,
            "error" => ConsoleLevel::Error,
            _ => ConsoleLevel::Info,
        }
    }
}

/// One line written through `console`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub level: ConsoleLevel,
    pub text: String,
}

struct HostState {
    functions: RaylibFunctions,
    window_table: BindingTable<RaylibWindow>,
    windows: HashMap<u32, RaylibWindow>,
    next_handle: u32,
    native: SharedNative,
    defaults: DefaultColors,
}

type SharedState = Arc<Mutex<HostState>>;
type ConsoleLog = Arc<Mutex<Vec<ConsoleLine>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct JsHost {
    state: SharedState,
    console: ConsoleLog,
    context: Context,
    runtime: Runtime,
}

impl JsHost {
    pub fn new(native: SharedNative, config: &AddonConfig) -> HostResult<Self> {
        let runtime = Runtime::new().map_err(|e| HostError::Runtime(e.to_string()))?;
        let context = Context::full(&runtime).map_err(|e| HostError::Runtime(e.to_string()))?;

        let state = Arc::new(Mutex::new(HostState {
            functions: RaylibFunctions::new(native.clone(), config.defaults),
            window_table: window_table(),
            windows: HashMap::new(),
            next_handle: 1,
            native: native.clone(),
            defaults: config.defaults,
        }));
        let console: ConsoleLog = Arc::default();

        context.with(|ctx| {
            install(&ctx, &state, &console, config.window.target_fps)
                .and_then(|()| ctx.eval::<(), _>(PRELUDE))
                .map_err(|e| HostError::Runtime(describe_error(&ctx, e)))
        })?;

        tracing::info!(target: "raylib_addon::host", backend = native.backend_name(), "JS host ready");

        Ok(Self {
            state,
            console,
            context,
            runtime,
        })
    }

    /// Evaluates `source` as a global script, then runs queued jobs until
    /// none are left so `async` code finishes.
    pub fn eval(&self, source: &str) -> HostResult<ScriptValue> {
        let value = self.context.with(|ctx| {
            let value = ctx
                .eval::<Value, _>(source)
                .map_err(|e| HostError::Evaluation(describe_error(&ctx, e)))?;
            js_to_script(&value, 0).map_err(|e| HostError::Evaluation(describe_error(&ctx, e)))
        })?;

        let jobs = self.run_pending_jobs()?;
        tracing::trace!(target: "raylib_addon::host", jobs, "script settled");
        Ok(value)
    }

    pub fn eval_file(&self, path: impl AsRef<Path>) -> HostResult<ScriptValue> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        tracing::info!(target: "raylib_addon::host", "running {}", path.display());
        self.eval(&source)
    }

    /// Runs queued promise jobs; returns how many ran.
    pub fn run_pending_jobs(&self) -> HostResult<usize> {
        let mut executed = 0;
        while self.runtime.is_job_pending() {
            match self.runtime.execute_pending_job() {
                Ok(true) => executed += 1,
                Ok(false) => break,
                Err(_) => {
                    let message = self.context.with(|ctx| describe_thrown(&ctx));
                    return Err(HostError::Job(message));
                }
            }
        }
        Ok(executed)
    }

    /// `RaylibWindow` objects not yet disposed.
    pub fn live_controllers(&self) -> usize {
        lock(&self.state).windows.len()
    }

    pub fn console_output(&self) -> Vec<ConsoleLine> {
        lock(&self.console).clone()
    }

    pub fn native(&self) -> SharedNative {
        lock(&self.state).native.clone()
    }
}

impl Drop for JsHost {
    fn drop(&mut self) {
        let windows: Vec<RaylibWindow> = lock(&self.state).windows.drain().map(|(_, w)| w).collect();
        if !windows.is_empty() {
            tracing::debug!(target: "raylib_addon::host", count = windows.len(), "releasing live controllers");
        }
        drop(windows);
    }
}

fn throw(ctx: &Ctx<'_>, err: BindingError) -> rquickjs::Error {
    let message = err.to_string();
    if err.is_type_error() {
        Exception::throw_type(ctx, &message)
    } else {
        Exception::throw_message(ctx, &message)
    }
}

fn install<'js>(
    ctx: &Ctx<'js>,
    state: &SharedState,
    console: &ConsoleLog,
    target_fps: u32,
) -> rquickjs::Result<()> {
    let globals = ctx.globals();

    // raylib.<name>(...args)
    let raylib = Object::new(ctx.clone())?;
    let names: Vec<&'static str> = lock(state).functions.names().to_vec();
    for name in names {
        let signature = lock(state).functions.signature(name);
        let state = Arc::clone(state);
        let function = Function::new(
            ctx.clone(),
            move |ctx: Ctx<'js>, args: Rest<Value<'js>>| -> rquickjs::Result<Value<'js>> {
                let values = marshal_args(&args.0, signature)?;
                let outcome = lock(&state)
                    .functions
                    .call(name, values)
                    .map_err(|e| throw(&ctx, e))?;
                apply_outcome(&ctx, &args.0, outcome)
            },
        )?;
        raylib.set(name, function)?;
    }

    let color_names = Array::new(ctx.clone())?;
    for (i, (name, color)) in Color::NAMED.iter().enumerate() {
        raylib.set(*name, script_to_js(ctx, &color_to_value(*color))?)?;
        color_names.set(i, *name)?;
    }
    globals.set("raylib", raylib)?;

    // __raylib_native: backing object for the RaylibWindow class
    let native = Object::new(ctx.clone())?;

    let create_state = Arc::clone(state);
    native.set(
        "create",
        Function::new(ctx.clone(), move |ctx: Ctx<'js>| -> rquickjs::Result<u32> {
            let mut guard = lock(&create_state);
            let st = &mut *guard;
            let window = RaylibWindow::acquire(st.native.clone(), st.defaults)
                .map_err(|e| throw(&ctx, e))?;
            let handle = st.next_handle;
            st.next_handle = st.next_handle.wrapping_add(1);
            st.windows.insert(handle, window);
            Ok(handle)
        })?,
    )?;

    let call_state = Arc::clone(state);
    native.set(
        "call",
        Function::new(
            ctx.clone(),
            move |ctx: Ctx<'js>,
                  handle: u32,
                  name: String,
                  args: Rest<Value<'js>>|
                  -> rquickjs::Result<Value<'js>> {
                let signature = lock(&call_state).window_table.signature(&name);
                let values = marshal_args(&args.0, signature)?;
                let result = {
                    let mut guard = lock(&call_state);
                    let st = &mut *guard;
                    match st.windows.get_mut(&handle) {
                        Some(window) => st.window_table.call(window, &name, values),
                        None => Err(BindingError::StaleController(handle)),
                    }
                };
                let outcome = result.map_err(|e| throw(&ctx, e))?;
                apply_outcome(&ctx, &args.0, outcome)
            },
        )?,
    )?;

    let dispose_state = Arc::clone(state);
    native.set(
        "dispose",
        Function::new(ctx.clone(), move |handle: u32| {
            let removed = lock(&dispose_state).windows.remove(&handle);
            drop(removed);
        })?,
    )?;

    let methods = Array::new(ctx.clone())?;
    for (i, name) in lock(state).window_table.names().iter().enumerate() {
        methods.set(i, *name)?;
    }
    native.set("methods", methods)?;
    native.set("colorNames", color_names)?;
    native.set("targetFps", target_fps)?;
    globals.set("__raylib_native", native)?;

    let console = Arc::clone(console);
    globals.set(
        "__raylib_console",
        Function::new(ctx.clone(), move |level: String, text: String| {
            let level = ConsoleLevel::parse(&level);
            match level {
                ConsoleLevel::Debug => tracing::debug!(target: "script.console", "{}", text),
                ConsoleLevel::Info => tracing::info!(target: "script.console", "{}", text),
                ConsoleLevel::Warn => tracing::warn!(target: "script.console", "{}", text),
                ConsoleLevel::Error => tracing::error!(target: "script.console", "{}", text),
            }
            lock(&console).push(ConsoleLine { level, text });
        })?,
    )?;

    Ok(())
}

/// Reads call arguments. Object arguments are only looked into as far as
/// `signature` describes them. Must run without the state lock held: field
/// reads may run script getters.
fn marshal_args(
    args: &[Value<'_>],
    signature: Option<Signature>,
) -> rquickjs::Result<Vec<ScriptValue>> {
    args.iter()
        .enumerate()
        .map(|(index, value)| {
            let shape = signature.map_or(ArgShape::Scalar, |s| s.shape(index));
            marshal_value(value, shape)
        })
        .collect()
}

/// Converts one argument according to `shape`. Named fields are read with
/// `[[Get]]`, so inherited fields and accessors are seen; a field that reads
/// as `undefined` is left out. Arrays and objects at scalar positions keep
/// only their kind.
fn marshal_value(value: &Value<'_>, shape: ArgShape) -> rquickjs::Result<ScriptValue> {
    if let Some(primitive) = primitive_to_script(value)? {
        return Ok(primitive);
    }
    if value.as_array().is_some() {
        return Ok(ScriptValue::Array(Vec::new()));
    }
    if value.is_function() {
        return Ok(ScriptValue::Undefined);
    }
    let Some(object) = value.as_object() else {
        return Ok(ScriptValue::Undefined);
    };

    let mut fields = ScriptObject::new();
    for &(field, inner) in shape.fields() {
        let item: Value = object.get(field)?;
        if !item.is_undefined() {
            fields.insert(field.to_string(), marshal_value(&item, inner)?);
        }
    }
    Ok(ScriptValue::Object(fields))
}

fn primitive_to_script(value: &Value<'_>) -> rquickjs::Result<Option<ScriptValue>> {
    Ok(if let Some(b) = value.as_bool() {
        Some(ScriptValue::Bool(b))
    } else if let Some(i) = value.as_int() {
        Some(ScriptValue::Int(i64::from(i)))
    } else if let Some(f) = value.as_float() {
        Some(ScriptValue::Float(f))
    } else if let Some(s) = value.as_string() {
        Some(ScriptValue::String(s.to_string()?))
    } else if value.is_null() {
        Some(ScriptValue::Null)
    } else {
        None
    })
}

fn apply_outcome<'js>(
    ctx: &Ctx<'js>,
    args: &[Value<'js>],
    outcome: CallOutcome,
) -> rquickjs::Result<Value<'js>> {
    for write_back in &outcome.write_backs {
        if let Some(object) = args.get(write_back.index).and_then(Value::as_object) {
            object.set(write_back.field, script_to_js(ctx, &write_back.value)?)?;
        }
    }
    script_to_js(ctx, &outcome.value)
}

/// Converts a script result into a `ScriptValue`, copying own enumerable
/// properties. Functions, symbols and anything nested deeper than
/// `MAX_DEPTH` become `undefined`.
pub fn js_to_script(value: &Value<'_>, depth: usize) -> rquickjs::Result<ScriptValue> {
    if depth > MAX_DEPTH {
        return Ok(ScriptValue::Undefined);
    }

    if let Some(primitive) = primitive_to_script(value)? {
        Ok(primitive)
    } else if let Some(array) = value.as_array() {
        let items = array
            .iter::<Value>()
            .map(|item| item.and_then(|item| js_to_script(&item, depth + 1)))
            .collect::<rquickjs::Result<Vec<_>>>()?;
        Ok(ScriptValue::Array(items))
    } else if value.is_function() {
        Ok(ScriptValue::Undefined)
    } else if let Some(object) = value.as_object() {
        let mut map = ScriptObject::new();
        for prop in object.props::<String, Value>() {
            let (key, item) = prop?;
            map.insert(key, js_to_script(&item, depth + 1)?);
        }
        Ok(ScriptValue::Object(map))
    } else {
        Ok(ScriptValue::Undefined)
    }
}

pub fn script_to_js<'js>(ctx: &Ctx<'js>, value: &ScriptValue) -> rquickjs::Result<Value<'js>> {
    Ok(match value {
        ScriptValue::Undefined => Value::new_undefined(ctx.clone()),
        ScriptValue::Null => Value::new_null(ctx.clone()),
        ScriptValue::Bool(b) => Value::new_bool(ctx.clone(), *b),
        ScriptValue::Int(i) => match i32::try_from(*i) {
            Ok(i) => Value::new_int(ctx.clone(), i),
            Err(_) => Value::new_float(ctx.clone(), *i as f64),
        },
        ScriptValue::Float(f) => Value::new_float(ctx.clone(), *f),
        ScriptValue::String(s) => rquickjs::String::from_str(ctx.clone(), s)?.into_value(),
        ScriptValue::Array(items) => {
            let array = Array::new(ctx.clone())?;
            for (i, item) in items.iter().enumerate() {
                array.set(i, script_to_js(ctx, item)?)?;
            }
            array.into_value()
        }
        ScriptValue::Object(map) => {
            let object = Object::new(ctx.clone())?;
            for (key, item) in map {
                object.set(key.as_str(), script_to_js(ctx, item)?)?;
            }
            object.into_value()
        }
    })
}

fn describe_error(ctx: &Ctx<'_>, err: rquickjs::Error) -> String {
    if err.is_exception() {
        describe_thrown(ctx)
    } else {
        err.to_string()
    }
}

/// Takes the pending exception off `ctx` and renders it.
fn describe_thrown(ctx: &Ctx<'_>) -> String {
    let thrown = ctx.catch();
    if let Some(exception) = thrown.as_exception() {
        let message = exception.message().unwrap_or_default();
        return match exception.stack() {
            Some(stack) if !stack.trim().is_empty() => format!("{}\n{}", message, stack.trim_end()),
            _ => message,
        };
    }
    js_to_script(&thrown, 0)
        .map(|value| value.to_string())
        .unwrap_or_else(|_| "uncaught exception".to_string())
}

//! Host globals and caller-supplied overrides.
//!
//! The realm already carries the ECMAScript built-ins. On top of those, a Node
//! host provides `console` and timers; they are copied into the sandbox only when
//! the sandbox does not define the name itself, so a custom surface always wins.

use boa_engine::{
    js_string, object::ObjectInitializer, Context, JsResult, JsString, JsValue, NativeFunction,
};
use indexmap::IndexMap;

const CONSOLE_TARGET: &str = "mtools::console";

/// Map of additional globals applied on top of the browser surface.
pub type GlobalOverrides = IndexMap<String, serde_json::Value>;

fn console_message(args: &[JsValue]) -> String {
    args.iter()
        .map(|arg| match arg.as_string() {
            Some(text) => text.to_std_string_escaped(),
            None => arg.display().to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn console_debug(_: &JsValue, args: &[JsValue], _: &mut Context) -> JsResult<JsValue> {
    tracing::debug!(target: CONSOLE_TARGET, "{}", console_message(args));
    Ok(JsValue::undefined())
}

fn console_info(_: &JsValue, args: &[JsValue], _: &mut Context) -> JsResult<JsValue> {
    tracing::info!(target: CONSOLE_TARGET, "{}", console_message(args));
    Ok(JsValue::undefined())
}

fn console_warn(_: &JsValue, args: &[JsValue], _: &mut Context) -> JsResult<JsValue> {
    tracing::warn!(target: CONSOLE_TARGET, "{}", console_message(args));
    Ok(JsValue::undefined())
}

fn console_error(_: &JsValue, args: &[JsValue], _: &mut Context) -> JsResult<JsValue> {
    tracing::error!(target: CONSOLE_TARGET, "{}", console_message(args));
    Ok(JsValue::undefined())
}

/// Timers never fire: realm execution is synchronous and has no event loop.
fn schedule(_: &JsValue, _: &[JsValue], _: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::from(0))
}

fn cancel(_: &JsValue, _: &[JsValue], _: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::undefined())
}

/// Installs host globals that the sandbox does not already define.
///
/// Returns the number of names that were added.
pub(crate) fn install_missing(context: &mut Context) -> JsResult<usize> {
    let global = context.global_object();
    let mut added = 0;

    if !global.has_own_property(js_string!("console"), context)? {
        let console = ObjectInitializer::new(context)
            .function(NativeFunction::from_fn_ptr(console_info), js_string!("log"), 0)
            .function(NativeFunction::from_fn_ptr(console_info), js_string!("info"), 0)
            .function(NativeFunction::from_fn_ptr(console_debug), js_string!("debug"), 0)
            .function(NativeFunction::from_fn_ptr(console_debug), js_string!("trace"), 0)
            .function(NativeFunction::from_fn_ptr(console_warn), js_string!("warn"), 0)
            .function(NativeFunction::from_fn_ptr(console_error), js_string!("error"), 0)
            .build();
        global.set(js_string!("console"), console, false, context)?;
        added += 1;
    }

    let timers: [(JsString, fn(&JsValue, &[JsValue], &mut Context) -> JsResult<JsValue>); 4] = [
        (js_string!("setTimeout"), schedule),
        (js_string!("setInterval"), schedule),
        (js_string!("clearTimeout"), cancel),
        (js_string!("clearInterval"), cancel),
    ];
    for (name, function) in timers {
        if global.has_own_property(name.clone(), context)? {
            continue;
        }
        context.register_global_callable(name, 2, NativeFunction::from_fn_ptr(function))?;
        added += 1;
    }

    Ok(added)
}

/// Writes each override onto the global object, replacing existing names.
pub(crate) fn apply_overrides(overrides: &GlobalOverrides, context: &mut Context) -> JsResult<()> {
    let global = context.global_object();
    for (name, value) in overrides {
        let value = JsValue::from_json(value, context)?;
        global.set(JsString::from(name.as_str()), value, false, context)?;
    }
    Ok(())
}

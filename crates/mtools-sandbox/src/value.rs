//! Conversions between engine values and Rust data.

use boa_engine::{
    js_string, object::builtins::JsArray, Context, JsNativeError, JsObject, JsResult, JsString,
    JsValue,
};

/// Reads a JS string value. Non-strings yield `None`.
pub fn as_string(value: &JsValue) -> Option<String> {
    value.as_string().map(JsString::to_std_string_escaped)
}

/// Reads an array of strings, skipping non-string entries.
///
/// Returns `None` when the value is not an array at all, which is how the
/// getter form of a module registration (`angular.module(name)`) is told apart
/// from a declaration.
pub fn string_list(value: &JsValue, context: &mut Context) -> JsResult<Option<Vec<String>>> {
    let Some(object) = value.as_object() else {
        return Ok(None);
    };
    if !object.is_array() {
        return Ok(None);
    }

    let array = JsArray::from_object(object.clone())?;
    let length = array.length(context)?;
    let mut items = Vec::with_capacity(length as usize);
    for index in 0..length as usize {
        if let Some(item) = as_string(&array.get(index, context)?) {
            items.push(item);
        }
    }
    Ok(Some(items))
}

/// The `name` property of a function object, or an empty string.
pub fn function_name(function: &JsObject, context: &mut Context) -> JsResult<String> {
    let name = function.get(js_string!("name"), context)?;
    Ok(as_string(&name).unwrap_or_default())
}

/// Looks up `object[method]` and calls it with `object` as receiver.
pub fn invoke(
    object: &JsObject,
    method: &str,
    args: &[JsValue],
    context: &mut Context,
) -> JsResult<JsValue> {
    let function = object.get(JsString::from(method), context)?;
    let Some(callable) = function.as_callable() else {
        return Err(JsNativeError::typ()
            .with_message(format!("'{method}' is not a function"))
            .into());
    };
    callable.call(&JsValue::from(object.clone()), args, context)
}

/// Requires the receiver of a native method to be an object.
pub(crate) fn this_object(this: &JsValue) -> JsResult<&JsObject> {
    this.as_object().ok_or_else(|| {
        JsNativeError::typ()
            .with_message("receiver is not an object")
            .into()
    })
}

pub(crate) fn first_arg(args: &[JsValue]) -> JsValue {
    args.first().cloned().unwrap_or_else(JsValue::undefined)
}

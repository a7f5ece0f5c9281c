//! Minimal browser surface installed on the realm's global object.
//!
//! Library initialization code only touches a handful of DOM entry points:
//! event registration, `document.head` for style injection, element factories and
//! attribute accessors. Everything here is inert data; nothing renders.

use boa_engine::{
    js_string,
    object::{builtins::JsArray, ObjectInitializer},
    property::Attribute,
    Context, JsObject, JsResult, JsString, JsValue, NativeFunction,
};

use crate::value::{first_arg, this_object};

const ELEMENT_NODE: i32 = 1;
const TEXT_NODE: i32 = 3;
const DOCUMENT_NODE: i32 = 9;

fn noop(_: &JsValue, _: &[JsValue], _: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::undefined())
}

fn null(_: &JsValue, _: &[JsValue], _: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::null())
}

fn falsy(_: &JsValue, _: &[JsValue], _: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::from(false))
}

fn empty_list(_: &JsValue, _: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    Ok(JsArray::new(context).into())
}

fn empty_object(_: &JsValue, _: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    Ok(ObjectInitializer::new(context).build().into())
}

/// `appendChild` and `insertBefore` both append so that harvesting the children
/// yields insertion order.
fn append_child(this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let node = this_object(this)?;
    let child = first_arg(args);
    let children = node.get(js_string!("children"), context)?;
    if let Some(children) = children.as_object() {
        JsArray::from_object(children.clone())?.push(child.clone(), context)?;
    }
    Ok(child)
}

fn set_attribute(this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let node = this_object(this)?;
    let name = first_arg(args).to_string(context)?;
    let value = args
        .get(1)
        .cloned()
        .unwrap_or_else(JsValue::undefined)
        .to_string(context)?;
    let attributes = node.get(js_string!("attributes"), context)?;
    if let Some(attributes) = attributes.as_object() {
        attributes.set(name, value, false, context)?;
    }
    Ok(JsValue::undefined())
}

fn get_attribute(this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let node = this_object(this)?;
    let name = first_arg(args).to_string(context)?;
    let attributes = node.get(js_string!("attributes"), context)?;
    let value = match attributes.as_object() {
        Some(attributes) => attributes.get(name, context)?,
        None => JsValue::undefined(),
    };
    if value.is_undefined() {
        return Ok(js_string!().into());
    }
    Ok(value)
}

fn create_element(_: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let tag = first_arg(args).to_string(context)?;
    Ok(element(context, tag)?.into())
}

fn create_text_node(_: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let data = first_arg(args).to_string(context)?;
    Ok(text_node(context, data).into())
}

/// Builds an element stub with its own `children` and `attributes` storage.
pub(crate) fn element(context: &mut Context, tag: JsString) -> JsResult<JsObject> {
    let children = JsArray::new(context);
    let attributes = ObjectInitializer::new(context).build();
    let style = ObjectInitializer::new(context).build();
    // Style injection bails out when an element has no first child.
    let first_child = ObjectInitializer::new(context).build();
    let tag_name = JsString::from(tag.to_std_string_escaped().to_uppercase());

    Ok(ObjectInitializer::new(context)
        .property(js_string!("nodeType"), ELEMENT_NODE, Attribute::all())
        .property(js_string!("tagName"), tag_name.clone(), Attribute::all())
        .property(js_string!("nodeName"), tag_name, Attribute::all())
        .property(js_string!("pathname"), js_string!(), Attribute::all())
        .property(js_string!("children"), children.clone(), Attribute::all())
        .property(js_string!("childNodes"), children, Attribute::all())
        .property(js_string!("attributes"), attributes, Attribute::all())
        .property(js_string!("style"), style, Attribute::all())
        .property(js_string!("firstElementChild"), first_child, Attribute::all())
        .function(NativeFunction::from_fn_ptr(append_child), js_string!("appendChild"), 1)
        .function(NativeFunction::from_fn_ptr(append_child), js_string!("insertBefore"), 2)
        .function(NativeFunction::from_fn_ptr(noop), js_string!("removeChild"), 1)
        .function(NativeFunction::from_fn_ptr(set_attribute), js_string!("setAttribute"), 2)
        .function(NativeFunction::from_fn_ptr(get_attribute), js_string!("getAttribute"), 1)
        .function(NativeFunction::from_fn_ptr(noop), js_string!("addEventListener"), 2)
        .function(NativeFunction::from_fn_ptr(noop), js_string!("removeEventListener"), 2)
        .function(NativeFunction::from_fn_ptr(null), js_string!("querySelector"), 1)
        .function(NativeFunction::from_fn_ptr(empty_list), js_string!("querySelectorAll"), 1)
        .function(NativeFunction::from_fn_ptr(empty_list), js_string!("getElementsByTagName"), 1)
        .build())
}

fn text_node(context: &mut Context, data: JsString) -> JsObject {
    ObjectInitializer::new(context)
        .property(js_string!("nodeType"), TEXT_NODE, Attribute::all())
        .property(js_string!("data"), data.clone(), Attribute::all())
        .property(js_string!("textContent"), data, Attribute::all())
        .build()
}

/// Handles to the parts of the mocked DOM the host reads back.
#[derive(Debug, Clone)]
pub struct BrowserDocument {
    document: JsObject,
    head: JsObject,
}

impl BrowserDocument {
    /// Installs `window`, `document`, `location`, `navigator` and `Node` on the
    /// global object. `window`, `self` and `global` alias the global itself.
    pub fn install(context: &mut Context) -> JsResult<Self> {
        let head = element(context, js_string!("head"))?;
        let body = element(context, js_string!("body"))?;
        let root = element(context, js_string!("html"))?;

        let document = ObjectInitializer::new(context)
            .property(js_string!("nodeType"), DOCUMENT_NODE, Attribute::all())
            .property(js_string!("readyState"), js_string!("loading"), Attribute::all())
            .property(js_string!("head"), head.clone(), Attribute::all())
            .property(js_string!("body"), body, Attribute::all())
            .property(js_string!("documentElement"), root, Attribute::all())
            .property(js_string!("currentScript"), JsValue::null(), Attribute::all())
            .function(NativeFunction::from_fn_ptr(noop), js_string!("addEventListener"), 2)
            .function(NativeFunction::from_fn_ptr(noop), js_string!("removeEventListener"), 2)
            .function(NativeFunction::from_fn_ptr(falsy), js_string!("contains"), 1)
            .function(NativeFunction::from_fn_ptr(null), js_string!("querySelector"), 1)
            .function(NativeFunction::from_fn_ptr(empty_list), js_string!("querySelectorAll"), 1)
            .function(NativeFunction::from_fn_ptr(empty_list), js_string!("getElementsByTagName"), 1)
            .function(NativeFunction::from_fn_ptr(create_element), js_string!("createElement"), 1)
            .function(NativeFunction::from_fn_ptr(create_text_node), js_string!("createTextNode"), 1)
            .function(NativeFunction::from_fn_ptr(create_text_node), js_string!("createComment"), 1)
            .build();

        let location = ObjectInitializer::new(context)
            .property(js_string!("href"), js_string!(), Attribute::all())
            .property(js_string!("protocol"), js_string!(), Attribute::all())
            .property(js_string!("host"), js_string!(), Attribute::all())
            .property(js_string!("pathname"), js_string!(), Attribute::all())
            .property(js_string!("search"), js_string!(), Attribute::all())
            .property(js_string!("hash"), js_string!(), Attribute::all())
            .build();

        let navigator = ObjectInitializer::new(context)
            .property(js_string!("userAgent"), js_string!(), Attribute::all())
            .property(js_string!("platform"), js_string!(), Attribute::all())
            .property(js_string!("vendor"), js_string!(), Attribute::all())
            .build();

        let node_prototype = ObjectInitializer::new(context)
            .function(NativeFunction::from_fn_ptr(falsy), js_string!("contains"), 1)
            .build();
        let node = ObjectInitializer::new(context)
            .property(js_string!("prototype"), node_prototype, Attribute::all())
            .property(js_string!("ELEMENT_NODE"), ELEMENT_NODE, Attribute::all())
            .property(js_string!("TEXT_NODE"), TEXT_NODE, Attribute::all())
            .build();

        let global = context.global_object();
        let window = JsValue::from(global.clone());
        let entries: [(JsString, JsValue); 8] = [
            (js_string!("window"), window.clone()),
            (js_string!("self"), window.clone()),
            (js_string!("global"), window),
            (js_string!("document"), document.clone().into()),
            (js_string!("location"), location.into()),
            (js_string!("navigator"), navigator.into()),
            (js_string!("Node"), node.into()),
            (js_string!("HTMLElement"), empty_object(&JsValue::undefined(), &[], context)?),
        ];
        for (name, value) in entries {
            global.set(name, value, false, context)?;
        }

        let listeners: [(JsString, NativeFunction); 3] = [
            (js_string!("addEventListener"), NativeFunction::from_fn_ptr(noop)),
            (js_string!("removeEventListener"), NativeFunction::from_fn_ptr(noop)),
            (js_string!("getComputedStyle"), NativeFunction::from_fn_ptr(empty_object)),
        ];
        for (name, function) in listeners {
            context.register_global_callable(name, 1, function)?;
        }

        Ok(Self { document, head })
    }

    pub fn document(&self) -> &JsObject {
        &self.document
    }

    pub fn head(&self) -> &JsObject {
        &self.head
    }

    /// Number of nodes appended under `document.head` so far.
    pub fn head_len(&self, context: &mut Context) -> JsResult<usize> {
        let children = self.head.get(js_string!("children"), context)?;
        match children.as_object() {
            Some(children) => Ok(JsArray::from_object(children.clone())?.length(context)? as usize),
            None => Ok(0),
        }
    }

    /// Text content of every node under `document.head`, in insertion order.
    ///
    /// A style element contributes the concatenated `data` of its text children.
    pub fn head_texts(&self, context: &mut Context) -> JsResult<Vec<String>> {
        let children = self.head.get(js_string!("children"), context)?;
        let Some(children) = children.as_object() else {
            return Ok(Vec::new());
        };
        let children = JsArray::from_object(children.clone())?;
        let length = children.length(context)? as usize;

        let mut texts = Vec::with_capacity(length);
        for index in 0..length {
            let child = children.get(index, context)?;
            texts.push(node_text(&child, context)?);
        }
        Ok(texts)
    }
}

fn node_text(node: &JsValue, context: &mut Context) -> JsResult<String> {
    let Some(node) = node.as_object() else {
        return Ok(String::new());
    };
    let data = node.get(js_string!("data"), context)?;
    if let Some(data) = data.as_string() {
        return Ok(data.to_std_string_escaped());
    }

    let children = node.get(js_string!("children"), context)?;
    let Some(children) = children.as_object() else {
        return Ok(String::new());
    };
    let children = JsArray::from_object(children.clone())?;
    let length = children.length(context)? as usize;
    let mut text = String::new();
    for index in 0..length {
        let child = children.get(index, context)?;
        text.push_str(&node_text(&child, context)?);
    }
    Ok(text)
}

//! Static theme generation with the library's own theming service.
//!
//! The library is booted in a sandbox with its `generateAllThemes` run block
//! captured instead of executed. The theming provider it registers is then
//! configured with the requested palettes and themes, and every call to
//! [`ThemeBuilder::build`] runs the captured generator against a fake injector
//! and reads back every style element under the mocked `document.head`.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use boa_engine::{
    js_string, object::ObjectInitializer, Context, JsObject, JsResult, JsString, JsValue, NativeFunction,
};
use boa_gc::{Finalize, Trace};
use indexmap::IndexMap;
use mtools_sandbox::value::{as_string, function_name, invoke};
use mtools_sandbox::{InterceptedCall, Interceptor, LibraryConventions, LibraryHost, ModuleMethod};
use serde_json::{Map, Value};

use crate::error::{Result, ThemeError};
use crate::palette::PaletteSet;
use crate::theme::{PaletteRole, ThemeSpec};

/// Run block that generates the stylesheet of every registered theme.
const GENERATOR: &str = "generateAllThemes";
/// Constant holding the library's built-in palettes.
const COLOR_PALETTE: &str = "$mdColorPalette";
/// Provider function of the theming service.
const THEMING: &str = "$mdTheming";
/// Constant holding the theme stylesheet template.
const THEME_CSS: &str = "$MD_THEME_CSS";

/// Keeps the generator run block instead of letting it run.
struct GeneratorCapture {
    slot: Rc<RefCell<Option<JsObject>>>,
}

impl Interceptor for GeneratorCapture {
    fn intercept(&mut self, call: &InterceptedCall<'_>, context: &mut Context) -> JsResult<()> {
        let InterceptedCall::Phase {
            method: ModuleMethod::Run,
            callback,
        } = call
        else {
            return Ok(());
        };
        let Some(function) = callback.as_object() else {
            return Ok(());
        };
        if function_name(function, context)? == GENERATOR {
            *self.slot.borrow_mut() = Some(function.clone());
        }
        Ok(())
    }
}

#[derive(Trace, Finalize)]
struct InjectedCss {
    #[unsafe_ignore_trace]
    text: String,
}

fn always_true(_: &JsValue, _: &[JsValue], _: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::from(true))
}

/// An injector that answers every lookup with `css`.
fn fake_injector(css: String, context: &mut Context) -> JsObject {
    let get = NativeFunction::from_copy_closure_with_captures(
        |_, _, css: &InjectedCss, _| Ok(JsString::from(css.text.as_str()).into()),
        InjectedCss { text: css },
    );
    ObjectInitializer::new(context)
        .function(get, js_string!("get"), 1)
        .function(NativeFunction::from_fn_ptr(always_true), js_string!("has"), 1)
        .build()
}

/// Generates static theme stylesheets for a fixed set of themes.
#[derive(Debug)]
pub struct ThemeBuilder {
    host: LibraryHost,
    generator: JsObject,
    service: JsValue,
    default_css: String,
}

impl ThemeBuilder {
    /// Boots the library at `entry` and registers `palettes` and `themes` with
    /// its theming service. No themes means the default theme.
    pub fn new(entry: &Path, themes: &[ThemeSpec], palettes: &PaletteSet) -> Result<Self> {
        Self::with_conventions(entry, themes, palettes, &LibraryConventions::default())
    }

    pub fn with_conventions(
        entry: &Path,
        themes: &[ThemeSpec],
        palettes: &PaletteSet,
        conventions: &LibraryConventions,
    ) -> Result<Self> {
        if !entry.is_file() {
            return Err(ThemeError::EntryNotFound(entry.to_path_buf()));
        }

        let fallback = [ThemeSpec::default()];
        let themes = if themes.is_empty() { &fallback[..] } else { themes };
        for theme in themes {
            theme.validate()?;
        }

        let slot = Rc::new(RefCell::new(None));
        let mut host = LibraryHost::boot(
            entry,
            conventions,
            GeneratorCapture {
                slot: Rc::clone(&slot),
            },
        )?;

        let generator = slot
            .borrow_mut()
            .take()
            .ok_or(ThemeError::GeneratorNotFound(GENERATOR))?;
        let catalog = host
            .injectable(COLOR_PALETTE)
            .ok_or(ThemeError::MissingInjectable(COLOR_PALETTE))?;
        let provider_fn = host
            .injectable(THEMING)
            .ok_or(ThemeError::MissingInjectable(THEMING))?;
        let default_css = host
            .injectable(THEME_CSS)
            .as_ref()
            .and_then(as_string)
            .ok_or(ThemeError::MissingInjectable(THEME_CSS))?;

        let context = host.realm().context();
        let Some(provider_fn) = provider_fn.as_callable() else {
            return Err(ThemeError::MissingInjectable(THEMING));
        };
        let provider = provider_fn.call(&JsValue::undefined(), &[catalog.clone()], context)?;
        let Some(provider) = provider.as_object().cloned() else {
            return Err(ThemeError::Script("theming provider is not an object".to_string()));
        };

        define_palettes(&provider, &catalog, palettes, context)?;
        for theme in themes {
            register_theme(&provider, theme, context)?;
        }
        let service = invoke(&provider, "$get", &[], context)?;

        tracing::debug!(
            "theming service configured with {} themes and {} custom palettes",
            themes.len(),
            palettes.len()
        );

        Ok(Self {
            host,
            generator,
            service,
            default_css,
        })
    }

    /// The stylesheet template registered by the library.
    pub fn default_css(&self) -> &str {
        &self.default_css
    }

    /// Generates the stylesheet of every registered theme.
    ///
    /// `override_css` replaces the library's template, e.g. with theme SCSS
    /// compiled for an older version. An empty override keeps the library's
    /// template. The template is trimmed before use since the generator cannot
    /// handle a trailing newline.
    ///
    /// The generator only injects a theme once per realm, so the result is the
    /// whole content of `document.head` and repeated builds return the same
    /// stylesheet.
    pub fn build(&mut self, override_css: Option<&str>) -> Result<String> {
        let css = override_css
            .filter(|css| !css.trim().is_empty())
            .unwrap_or(&self.default_css)
            .trim()
            .to_string();

        let realm = self.host.realm();
        let injector = fake_injector(css, realm.context());
        self.generator.call(
            &JsValue::undefined(),
            &[injector.into(), self.service.clone()],
            realm.context(),
        )?;

        let stylesheet: String = realm.head_texts()?.concat();
        if stylesheet.is_empty() {
            tracing::warn!("theme generation produced no styles");
        }
        Ok(stylesheet)
    }
}

/// Defines custom palettes in order, so a palette may extend an earlier one.
fn define_palettes(
    provider: &JsObject,
    catalog: &JsValue,
    palettes: &PaletteSet,
    context: &mut Context,
) -> Result<()> {
    let mut defined: IndexMap<&str, Map<String, Value>> = IndexMap::new();

    for (name, definition) in palettes {
        let base = match &definition.extends {
            Some(base) => match defined.get(base.as_str()) {
                Some(palette) => Some(palette.clone()),
                None => Some(catalog_palette(catalog, base, context)?.ok_or_else(|| {
                    ThemeError::UnknownPalette {
                        palette: name.clone(),
                        base: base.clone(),
                    }
                })?),
            },
            None => None,
        };

        let palette = definition.to_palette(name, base.as_ref())?;
        let value = JsValue::from_json(&Value::Object(palette.clone()), context)?;
        invoke(
            provider,
            "definePalette",
            &[JsString::from(name.as_str()).into(), value],
            context,
        )?;
        tracing::debug!("defined palette {name}");
        defined.insert(name, palette);
    }
    Ok(())
}

/// A palette shipped with the library, as JSON.
fn catalog_palette(catalog: &JsValue, name: &str, context: &mut Context) -> Result<Option<Map<String, Value>>> {
    let Some(catalog) = catalog.as_object() else {
        return Ok(None);
    };
    let palette = catalog.get(JsString::from(name), context)?;
    if !palette.is_object() {
        return Ok(None);
    }
    match palette.to_json(context)? {
        Value::Object(palette) => Ok(Some(palette)),
        _ => Ok(None),
    }
}

/// `theme(name).primaryPalette(..)...backgroundPalette(..)[.dark(true)]`
fn register_theme(provider: &JsObject, theme: &ThemeSpec, context: &mut Context) -> Result<()> {
    let builder = invoke(
        provider,
        "theme",
        &[JsString::from(theme.name.as_str()).into()],
        context,
    )?;
    let Some(builder) = builder.as_object().cloned() else {
        return Err(ThemeError::Script(format!(
            "theme('{}') did not return a theme",
            theme.name
        )));
    };

    for role in PaletteRole::ALL {
        let assignment = theme.palette(role);
        let mut args = vec![JsValue::from(JsString::from(assignment.name()))];
        if let Some(hues) = assignment.hues() {
            let hues: Map<String, Value> = hues
                .iter()
                .map(|(hue, value)| (hue.clone(), Value::String(value.clone())))
                .collect();
            args.push(JsValue::from_json(&Value::Object(hues), context)?);
        }
        invoke(&builder, role.method(), &args, context)?;
    }

    if theme.dark {
        invoke(&builder, "dark", &[JsValue::from(true)], context)?;
    }
    Ok(())
}

//! Sandboxed CommonJS loader.
//!
//! Every file is wrapped in a closure receiving `global`, `__filename`,
//! `__dirname`, `module`, `exports` and a freshly bound `require`, then
//! evaluated inside the realm. The nested `require` shares the realm, the
//! exports cache and the run options of the file that created it, so the whole
//! module tree stays inside the sandbox.
//!
//! The cache is an explicit arena of canonical path → exports owned by the
//! loader. It is not shared with any other realm.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use boa_engine::{
    js_string,
    object::{FunctionObjectBuilder, ObjectInitializer},
    property::Attribute,
    Context, JsError, JsNativeError, JsResult, JsString, JsValue, NativeFunction, Source,
};
use boa_gc::{Finalize, Trace};
use oxc_resolver::{ResolveOptions, Resolver};
use rustc_hash::FxHashMap;

use crate::error::{Result, SandboxError};
use crate::globals;
use crate::value::{as_string, first_arg};

/// Options for a single [`ModuleLoader::run`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Prefix the module body with a `"use strict"` directive.
    pub strict_mode: bool,
    /// Reuse previously computed exports for the same absolute path.
    pub caching: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            strict_mode: false,
            caching: true,
        }
    }
}

impl RunOptions {
    pub fn strict() -> Self {
        Self {
            strict_mode: true,
            ..Self::default()
        }
    }

    pub fn with_caching(mut self, caching: bool) -> Self {
        self.caching = caching;
        self
    }
}

/// Failure while loading one module, before it is mapped onto the public
/// error type. Engine errors are kept intact so a nested `require` can rethrow
/// the original exception to its caller.
enum LoadFailure {
    Js(JsError),
    Sandbox(SandboxError),
}

impl From<SandboxError> for LoadFailure {
    fn from(error: SandboxError) -> Self {
        Self::Sandbox(error)
    }
}

struct LoaderShared {
    resolver: Resolver,
    base_dir: PathBuf,
    cache: RefCell<FxHashMap<PathBuf, JsValue>>,
}

/// Module loader bound to one realm.
#[derive(Clone)]
pub struct ModuleLoader {
    shared: Rc<LoaderShared>,
}

impl std::fmt::Debug for ModuleLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleLoader")
            .field("base_dir", &self.shared.base_dir)
            .field("cached", &self.cache_len())
            .finish()
    }
}

/// Captured state of a `require` function handed to a module.
#[derive(Trace, Finalize)]
struct RequireScope {
    #[unsafe_ignore_trace]
    loader: ModuleLoader,
    #[unsafe_ignore_trace]
    dir: PathBuf,
    #[unsafe_ignore_trace]
    options: RunOptions,
}

impl ModuleLoader {
    /// Creates a loader resolving top-level specifiers relative to `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let resolver = Resolver::new(ResolveOptions {
            condition_names: vec!["require".into(), "node".into(), "default".into()],
            extensions: vec![".js".into(), ".json".into()],
            ..Default::default()
        });

        Self {
            shared: Rc::new(LoaderShared {
                resolver,
                base_dir: base_dir.into(),
                cache: RefCell::new(FxHashMap::default()),
            }),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.shared.base_dir
    }

    /// Resolves `specifier` with node rules, relative to `from_dir`.
    pub fn resolve(&self, specifier: &str, from_dir: &Path) -> Result<PathBuf> {
        self.shared
            .resolver
            .resolve(from_dir, specifier)
            .map(|resolution| resolution.path().to_path_buf())
            .map_err(|err| SandboxError::Resolution {
                specifier: specifier.to_string(),
                from: from_dir.to_path_buf(),
                reason: err.to_string(),
            })
    }

    /// Loads `specifier` (relative to the loader's base directory) and returns
    /// its `module.exports`.
    pub fn run(&self, specifier: &str, options: RunOptions, context: &mut Context) -> Result<JsValue> {
        let base_dir = self.shared.base_dir.clone();
        let path = self.resolve(specifier, &base_dir)?;
        self.load(&path, options, context).map_err(|failure| match failure {
            LoadFailure::Js(error) => SandboxError::evaluation(&path, &error),
            LoadFailure::Sandbox(error) => error,
        })
    }

    /// Cached exports for an absolute path, if any.
    pub fn cached(&self, path: &Path) -> Option<JsValue> {
        self.shared.cache.borrow().get(path).cloned()
    }

    pub fn cache_len(&self) -> usize {
        self.shared.cache.borrow().len()
    }

    /// Drops every cached exports value.
    pub fn clear_cache(&self) {
        self.shared.cache.borrow_mut().clear();
    }

    fn require(
        &self,
        specifier: &str,
        from_dir: &Path,
        options: RunOptions,
        context: &mut Context,
    ) -> std::result::Result<JsValue, LoadFailure> {
        let path = self.resolve(specifier, from_dir)?;
        self.load(&path, options, context)
    }

    fn load(
        &self,
        path: &Path,
        options: RunOptions,
        context: &mut Context,
    ) -> std::result::Result<JsValue, LoadFailure> {
        if options.caching {
            if let Some(exports) = self.cached(path) {
                tracing::trace!("sandbox cache hit: {}", path.display());
                return Ok(exports);
            }
        }

        let source = fs::read_to_string(path).map_err(|source| SandboxError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            let value: serde_json::Value =
                serde_json::from_str(&source).map_err(|source| SandboxError::Json {
                    path: path.to_path_buf(),
                    source,
                })?;
            let exports = JsValue::from_json(&value, context).map_err(LoadFailure::Js)?;
            if options.caching {
                self.store(path, exports.clone());
            }
            return Ok(exports);
        }

        tracing::trace!("sandbox evaluating {}", path.display());
        match self.evaluate(path, &source, options, context) {
            Ok(exports) => Ok(exports),
            Err(error) => {
                if options.caching {
                    self.shared.cache.borrow_mut().remove(path);
                }
                Err(LoadFailure::Js(error))
            }
        }
    }

    fn store(&self, path: &Path, exports: JsValue) {
        self.shared
            .cache
            .borrow_mut()
            .insert(path.to_path_buf(), exports);
    }

    fn evaluate(
        &self,
        path: &Path,
        source: &str,
        options: RunOptions,
        context: &mut Context,
    ) -> JsResult<JsValue> {
        let dir = path.parent().unwrap_or(Path::new("/")).to_path_buf();

        let exports = ObjectInitializer::new(context).build();
        let module = ObjectInitializer::new(context)
            .property(js_string!("id"), path_string(path), Attribute::all())
            .property(js_string!("filename"), path_string(path), Attribute::all())
            .property(js_string!("loaded"), false, Attribute::all())
            .property(js_string!("exports"), exports.clone(), Attribute::all())
            .build();

        // Registered before evaluation so that require cycles observe the
        // partially initialized exports instead of recursing forever.
        if options.caching {
            self.store(path, exports.clone().into());
        }

        let require = self.require_function(dir.clone(), options, context)?;

        globals::install_missing(context)?;

        let wrapped = wrap_source(source, options.strict_mode);
        let wrapper = context.eval(Source::from_bytes(&wrapped))?;
        let Some(wrapper) = wrapper.as_callable() else {
            return Err(JsNativeError::typ()
                .with_message("module wrapper did not evaluate to a function")
                .into());
        };

        let global = JsValue::from(context.global_object());
        let locals = [
            global,
            path_string(path).into(),
            path_string(&dir).into(),
            module.clone().into(),
            exports.clone().into(),
            require,
        ];
        wrapper.call(&exports.into(), &locals, context)?;

        module.set(js_string!("loaded"), true, false, context)?;
        let exports = module.get(js_string!("exports"), context)?;
        if options.caching {
            self.store(path, exports.clone());
        }
        Ok(exports)
    }

    /// Builds the `require` handed to a module living in `dir`.
    fn require_function(
        &self,
        dir: PathBuf,
        options: RunOptions,
        context: &mut Context,
    ) -> JsResult<JsValue> {
        let require = NativeFunction::from_copy_closure_with_captures(
            |_, args, scope: &RequireScope, context| {
                let specifier = specifier_arg(args)?;
                scope
                    .loader
                    .require(&specifier, &scope.dir, scope.options, context)
                    .map_err(|failure| match failure {
                        LoadFailure::Js(error) => error,
                        LoadFailure::Sandbox(error) => {
                            JsNativeError::error().with_message(error.to_string()).into()
                        }
                    })
            },
            RequireScope {
                loader: self.clone(),
                dir: dir.clone(),
                options,
            },
        );

        let resolve = NativeFunction::from_copy_closure_with_captures(
            |_, args, scope: &RequireScope, _| {
                let specifier = specifier_arg(args)?;
                let path = scope
                    .loader
                    .resolve(&specifier, &scope.dir)
                    .map_err(|error| JsNativeError::error().with_message(error.to_string()))?;
                Ok(path_string(&path).into())
            },
            RequireScope {
                loader: self.clone(),
                dir,
                options,
            },
        );

        let resolve = FunctionObjectBuilder::new(context.realm(), resolve)
            .name(js_string!("resolve"))
            .length(1)
            .build();
        let require = FunctionObjectBuilder::new(context.realm(), require)
            .name(js_string!("require"))
            .length(1)
            .build();
        require.set(js_string!("resolve"), resolve, false, context)?;

        Ok(require.into())
    }
}

fn specifier_arg(args: &[JsValue]) -> JsResult<String> {
    as_string(&first_arg(args)).ok_or_else(|| {
        JsNativeError::typ()
            .with_message("require() expects a string specifier")
            .into()
    })
}

fn path_string(path: &Path) -> JsString {
    JsString::from(path.to_string_lossy().as_ref())
}

/// Wraps a module body into a function expression taking the module locals.
fn wrap_source(source: &str, strict_mode: bool) -> String {
    // A shebang line is only valid at the very start of a script.
    let body = match source.strip_prefix("#!") {
        Some(rest) => rest.split_once('\n').map_or("", |(_, body)| body),
        None => source,
    };
    let directive = if strict_mode { "\"use strict\";" } else { "" };
    format!(
        "(function (global, __filename, __dirname, module, exports, require) {{{directive}\n{body}\n}})"
    )
}

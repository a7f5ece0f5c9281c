//! Interception of the framework's module registration API.
//!
//! The library declares its components through `angular.module(name, requires)`
//! and then chains configuration calls on the returned module object. The shim
//! replaces that entry point with a native function and returns a stand-in
//! module whose methods are all chainable no-ops. Every interceptable call is
//! described by [`InterceptedCall`] and dispatched to a single [`Interceptor`].

use std::cell::RefCell;
use std::rc::Rc;

use boa_engine::{
    js_string,
    object::{FunctionObjectBuilder, ObjectInitializer},
    Context, JsNativeError, JsObject, JsResult, JsString, JsValue, NativeFunction,
};
use boa_gc::{Finalize, Trace};
use indexmap::IndexMap;

use crate::value::{as_string, first_arg, string_list};

/// Methods exposed by a registered framework module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleMethod {
    Config,
    Run,
    Directive,
    Service,
    Filter,
    Factory,
    Provider,
    Constant,
    Controller,
    Animation,
    Component,
    Value,
    Decorator,
}

/// Which family of hook a [`ModuleMethod`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    /// `config` / `run` blocks: a callback executed during a framework phase.
    Phase,
    /// Named injectable registration: `(key, value)`.
    Injectable,
}

impl ModuleMethod {
    pub const ALL: [ModuleMethod; 13] = [
        Self::Config,
        Self::Run,
        Self::Directive,
        Self::Service,
        Self::Filter,
        Self::Factory,
        Self::Provider,
        Self::Constant,
        Self::Controller,
        Self::Animation,
        Self::Component,
        Self::Value,
        Self::Decorator,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Run => "run",
            Self::Directive => "directive",
            Self::Service => "service",
            Self::Filter => "filter",
            Self::Factory => "factory",
            Self::Provider => "provider",
            Self::Constant => "constant",
            Self::Controller => "controller",
            Self::Animation => "animation",
            Self::Component => "component",
            Self::Value => "value",
            Self::Decorator => "decorator",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.name() == name)
    }

    pub fn kind(self) -> HookKind {
        match self {
            Self::Config | Self::Run => HookKind::Phase,
            _ => HookKind::Injectable,
        }
    }
}

/// One call made by the library against the intercepted framework API.
#[derive(Debug)]
pub enum InterceptedCall<'a> {
    /// `angular.module(name, requires)`. `requires` is `None` for the getter form.
    Register {
        name: &'a str,
        requires: Option<&'a [String]>,
    },
    Phase {
        method: ModuleMethod,
        callback: &'a JsValue,
    },
    Injectable {
        method: ModuleMethod,
        key: &'a str,
        value: &'a JsValue,
    },
}

/// Receiver of intercepted framework calls.
pub trait Interceptor {
    fn intercept(&mut self, call: &InterceptedCall<'_>, context: &mut Context) -> JsResult<()>;
}

/// Interceptor that ignores every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopInterceptor;

impl Interceptor for NoopInterceptor {
    fn intercept(&mut self, _: &InterceptedCall<'_>, _: &mut Context) -> JsResult<()> {
        Ok(())
    }
}

struct ShimState {
    interceptor: RefCell<Box<dyn Interceptor>>,
    injectables: RefCell<IndexMap<String, JsValue>>,
}

/// Installs the interception table on a framework object and keeps the
/// injectables the library registered.
#[derive(Clone)]
pub struct FrameworkShim {
    state: Rc<ShimState>,
}

impl std::fmt::Debug for FrameworkShim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameworkShim")
            .field("injectables", &self.state.injectables.borrow().len())
            .finish()
    }
}

#[derive(Trace, Finalize)]
struct ShimScope {
    #[unsafe_ignore_trace]
    shim: FrameworkShim,
}

#[derive(Trace, Finalize)]
struct MethodScope {
    #[unsafe_ignore_trace]
    shim: FrameworkShim,
    #[unsafe_ignore_trace]
    method: ModuleMethod,
}

fn noop(_: &JsValue, _: &[JsValue], _: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::undefined())
}

impl FrameworkShim {
    pub fn new(interceptor: impl Interceptor + 'static) -> Self {
        Self {
            state: Rc::new(ShimState {
                interceptor: RefCell::new(Box::new(interceptor)),
                injectables: RefCell::new(IndexMap::new()),
            }),
        }
    }

    /// Replaces `framework.module` with the interceptor and `framework.element`
    /// with a no-op, since the DOM wrapper cannot work without a real DOM.
    pub fn install(&self, framework: &JsObject, context: &mut Context) -> JsResult<()> {
        let module = NativeFunction::from_copy_closure_with_captures(
            |_, args, scope: &ShimScope, context| scope.shim.register(args, context),
            ShimScope { shim: self.clone() },
        );
        let module = FunctionObjectBuilder::new(context.realm(), module)
            .name(js_string!("module"))
            .length(2)
            .build();
        framework.set(js_string!("module"), module, false, context)?;

        let element = FunctionObjectBuilder::new(context.realm(), NativeFunction::from_fn_ptr(noop))
            .name(js_string!("element"))
            .length(1)
            .build();
        framework.set(js_string!("element"), element, false, context)?;
        Ok(())
    }

    /// Value registered under `key` through any injectable method.
    pub fn injectable(&self, key: &str) -> Option<JsValue> {
        self.state.injectables.borrow().get(key).cloned()
    }

    pub fn injectable_keys(&self) -> Vec<String> {
        self.state.injectables.borrow().keys().cloned().collect()
    }

    /// The single boundary every intercepted call passes through.
    fn dispatch(&self, call: &InterceptedCall<'_>, context: &mut Context) -> JsResult<()> {
        let mut interceptor = self.state.interceptor.try_borrow_mut().map_err(|_| {
            JsNativeError::error().with_message("re-entrant framework call during interception")
        })?;
        interceptor.intercept(call, context)
    }

    fn register(&self, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
        let name = first_arg(args).to_string(context)?.to_std_string_escaped();
        let requires = match args.get(1) {
            Some(requires) => string_list(requires, context)?,
            None => None,
        };

        self.dispatch(
            &InterceptedCall::Register {
                name: &name,
                requires: requires.as_deref(),
            },
            context,
        )?;

        Ok(self.module_stub(context).into())
    }

    /// A stand-in module object whose methods record and return `this`.
    fn module_stub(&self, context: &mut Context) -> JsObject {
        let mut stub = ObjectInitializer::new(context);
        for method in ModuleMethod::ALL {
            let function = NativeFunction::from_copy_closure_with_captures(
                |this, args, scope: &MethodScope, context| {
                    scope.shim.call_method(scope.method, args, context)?;
                    Ok(this.clone())
                },
                MethodScope {
                    shim: self.clone(),
                    method,
                },
            );
            stub.function(function, JsString::from(method.name()), 2);
        }
        stub.build()
    }

    fn call_method(&self, method: ModuleMethod, args: &[JsValue], context: &mut Context) -> JsResult<()> {
        match method.kind() {
            HookKind::Phase => {
                let callback = first_arg(args);
                self.dispatch(&InterceptedCall::Phase { method, callback: &callback }, context)
            }
            HookKind::Injectable => {
                // The object form, e.g. `.directive({ a: fn, b: fn })`, registers nothing by key.
                let Some(key) = as_string(&first_arg(args)) else {
                    return Ok(());
                };
                let value = args.get(1).cloned().unwrap_or_else(JsValue::undefined);
                self.state
                    .injectables
                    .borrow_mut()
                    .insert(key.clone(), value.clone());
                self.dispatch(
                    &InterceptedCall::Injectable {
                        method,
                        key: &key,
                        value: &value,
                    },
                    context,
                )
            }
        }
    }
}

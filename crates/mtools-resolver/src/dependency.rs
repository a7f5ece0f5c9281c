//! Dependency extraction by running the library inside a sandbox.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use mtools_sandbox::{Context, InterceptedCall, Interceptor, JsResult, LibraryConventions, LibraryHost};

use crate::component::{Component, MainModule};
use crate::error::{ResolveError, Result};
use crate::graph::{DependencyGraph, ResolvedDependencies};

/// Records module declarations into a shared graph.
struct RegistrationCollector {
    graph: Rc<RefCell<DependencyGraph>>,
    conventions: LibraryConventions,
}

impl Interceptor for RegistrationCollector {
    fn intercept(&mut self, call: &InterceptedCall<'_>, _: &mut Context) -> JsResult<()> {
        // Only declarations carry a dependency array; getters and hooks are ignored.
        let InterceptedCall::Register {
            name,
            requires: Some(requires),
        } = call
        else {
            return Ok(());
        };

        let mut graph = self.graph.borrow_mut();
        if self.conventions.is_library_module(name) {
            graph.insert(Component::from_registration(name, requires, &self.conventions));
        } else if *name == graph.main_module().raw_name {
            graph.main_module_mut().set_external(requires, &self.conventions);
        }
        Ok(())
    }
}

/// Computes component dependency graphs from the library's own source.
#[derive(Debug, Clone, Default)]
pub struct DependencyResolver {
    conventions: LibraryConventions,
}

impl DependencyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conventions(conventions: LibraryConventions) -> Self {
        Self { conventions }
    }

    pub fn conventions(&self) -> &LibraryConventions {
        &self.conventions
    }

    /// Runs `entry` in a fresh realm and returns every registration it made.
    ///
    /// `main_module` overrides the raw name of the aggregate module.
    pub fn capture(&self, entry: &Path, main_module: Option<&str>) -> Result<DependencyGraph> {
        if !entry.is_file() {
            return Err(ResolveError::EntryNotFound(entry.to_path_buf()));
        }

        let main = MainModule::new(main_module.unwrap_or(&self.conventions.main_module));
        let graph = Rc::new(RefCell::new(DependencyGraph::new(main)));
        let collector = RegistrationCollector {
            graph: Rc::clone(&graph),
            conventions: self.conventions.clone(),
        };

        let host = LibraryHost::boot(entry, &self.conventions, collector)?;
        drop(host);

        let captured = graph.borrow().clone();
        tracing::debug!(
            "captured {} components from {}",
            captured.len(),
            entry.display()
        );
        Ok(captured)
    }

    /// Resolves the transitive closure of `requested` within the library at
    /// `entry`. An empty request selects every component.
    pub fn resolve<S: AsRef<str>>(
        &self,
        entry: &Path,
        requested: &[S],
        main_module: Option<&str>,
    ) -> Result<ResolvedDependencies> {
        let graph = self.capture(entry, main_module)?;
        Ok(graph.resolve(requested))
    }
}

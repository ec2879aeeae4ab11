//! Onion-style middleware.
//!
//! A middleware wraps everything deeper in the chain: it receives the
//! request and a [`Next`] continuation. Invoking the continuation runs the
//! next layer (ultimately the route's target); returning without invoking it
//! short-circuits the chain with the middleware's own response. A response
//! produced deeper in the chain passes back out through every layer above
//! it, which may inspect or replace it on the way.

use crate::error::{Error, Result};
use crate::request::Request;
use crate::response::{Reply, Response};
use crate::target::{Controller, HandlerFn};
use crate::types::RouteParams;
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};

/// A single layer of the dispatch chain.
///
/// Implementations must be constructible by their registered factory with no
/// per-request state; a fresh instance is created for every dispatch.
pub trait Middleware: Send + Sync {
    fn handle(&self, req: &Request, next: Next<'_>) -> Result<Response>;
}

/// The continuation handed to a middleware: the layers below it plus the
/// route's terminal target.
pub struct Next<'a> {
    pub(crate) chain: &'a [Box<dyn Middleware>],
    pub(crate) terminal: &'a Terminal<'a>,
    pub(crate) params: &'a RouteParams,
}

impl<'a> Next<'a> {
    /// Runs the rest of the chain. The outermost remaining middleware is
    /// invoked first; once no middleware remains the terminal target runs
    /// and its return value is normalized into a [`Response`].
    pub fn run(self, req: &Request) -> Result<Response> {
        match self.chain.split_first() {
            Some((layer, rest)) => layer.handle(
                req,
                Next {
                    chain: rest,
                    terminal: self.terminal,
                    params: self.params,
                },
            ),
            None => self.terminal.invoke(req, self.params).map(Reply::into_response),
        }
    }
}

/// The innermost element of the chain: the matched route's resolved target.
pub(crate) enum Terminal<'a> {
    Handler(&'a HandlerFn),
    Controller {
        instance: Box<dyn Controller>,
        method: String,
        reference: String,
    },
}

impl Terminal<'_> {
    fn invoke(&self, req: &Request, params: &RouteParams) -> Result<Reply> {
        match self {
            Terminal::Handler(handler) => handler(req, params),
            Terminal::Controller {
                instance,
                method,
                reference,
            } => instance.invoke(method, req, params).unwrap_or_else(|| {
                Err(Error::TargetResolution {
                    reference: reference.clone(),
                    reason: format!("controller does not expose a {:?} method", method),
                })
            }),
        }
    }
}

/// A boxed middleware constructor, as stored in the registry.
pub type MiddlewareFactory = Box<dyn Fn() -> Box<dyn Middleware> + Send + Sync>;

/// Boxes a plain constructor closure into a [`MiddlewareFactory`], mainly
/// useful with [`MiddlewareRegistry::register_many`].
pub fn factory<F, M>(constructor: F) -> MiddlewareFactory
where
    F: Fn() -> M + Send + Sync + 'static,
    M: Middleware + 'static,
{
    Box::new(move || Box::new(constructor()) as Box<dyn Middleware>)
}

/// The alias table mapping middleware names to their constructors.
///
/// An alias can be bound exactly once; routes reference middleware by alias
/// and every referenced alias must be registered before dispatch.
#[derive(Default)]
pub struct MiddlewareRegistry {
    factories: HashMap<String, MiddlewareFactory>,
}

impl MiddlewareRegistry {
    pub fn new() -> MiddlewareRegistry {
        MiddlewareRegistry::default()
    }

    /// Binds `alias` to a middleware constructor. Fails with
    /// [`Error::DuplicateAlias`] if the alias is already bound.
    pub fn register<A, F, M>(&mut self, alias: A, constructor: F) -> Result<()>
    where
        A: Into<String>,
        F: Fn() -> M + Send + Sync + 'static,
        M: Middleware + 'static,
    {
        self.insert(alias.into(), factory(constructor))
    }

    /// Binds several aliases at once.
    pub fn register_many<I, A>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (A, MiddlewareFactory)>,
        A: Into<String>,
    {
        for (alias, factory) in entries {
            self.insert(alias.into(), factory)?;
        }
        Ok(())
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.factories.contains_key(alias)
    }

    /// Creates a fresh instance of the middleware bound to `alias`.
    pub(crate) fn instantiate(&self, alias: &str) -> Result<Box<dyn Middleware>> {
        let factory = self.factories.get(alias).ok_or_else(|| Error::UnknownAlias {
            alias: alias.to_owned(),
        })?;
        Ok(factory())
    }

    fn insert(&mut self, alias: String, factory: MiddlewareFactory) -> Result<()> {
        if self.factories.contains_key(&alias) {
            return Err(Error::DuplicateAlias { alias });
        }
        self.factories.insert(alias, factory);
        Ok(())
    }
}

impl Debug for MiddlewareRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareRegistry")
            .field("aliases", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

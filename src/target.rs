use crate::error::{Error, Result};
use crate::request::Request;
use crate::response::Reply;
use crate::types::RouteParams;
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};

/// The signature of an inline route handler.
pub type HandlerFn = dyn Fn(&Request, &RouteParams) -> Result<Reply> + Send + Sync;

/// What a route invokes once it has matched: either an inline handler
/// closure, or a `"Controller@method"` reference resolved through a
/// [`ControllerRegistry`] when the route is actually dispatched.
pub enum Target {
    Handler(Box<HandlerFn>),
    Controller(String),
}

impl Target {
    /// Wraps a handler closure. The closure may return anything convertible
    /// into a [`Reply`]: a [`Response`](crate::Response), a string, or a
    /// JSON value.
    pub fn handler<H, R>(handler: H) -> Target
    where
        H: Fn(&Request, &RouteParams) -> Result<R> + Send + Sync + 'static,
        R: Into<Reply>,
    {
        let handler: Box<HandlerFn> =
            Box::new(move |req: &Request, params: &RouteParams| handler(req, params).map(Into::into));
        Target::Handler(handler)
    }

    /// References a controller method by name, e.g. `"UserController@show"`.
    /// The reference is looked up lazily: an unregistered controller only
    /// fails when the route is dispatched.
    pub fn controller<R: Into<String>>(reference: R) -> Target {
        Target::Controller(reference.into())
    }
}

impl Debug for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Target::Handler(_) => f.write_str("Target::Handler"),
            Target::Controller(reference) => write!(f, "Target::Controller({:?})", reference),
        }
    }
}

/// A named group of route endpoints, instantiated per dispatch.
///
/// `invoke` returns `None` when the controller does not expose `method`,
/// which surfaces as a target-resolution failure.
pub trait Controller: Send + Sync {
    fn invoke(&self, method: &str, req: &Request, params: &RouteParams) -> Option<Result<Reply>>;
}

type ControllerFactory = Box<dyn Fn() -> Box<dyn Controller> + Send + Sync>;

/// Resolves `"Controller@method"` references to controller instances.
///
/// Registration binds a name to a factory; resolution instantiates a fresh
/// controller for the dispatch at hand.
#[derive(Default)]
pub struct ControllerRegistry {
    factories: HashMap<String, ControllerFactory>,
}

impl ControllerRegistry {
    pub fn new() -> ControllerRegistry {
        ControllerRegistry::default()
    }

    pub fn register<N, F, C>(&mut self, name: N, factory: F)
    where
        N: Into<String>,
        F: Fn() -> C + Send + Sync + 'static,
        C: Controller + 'static,
    {
        self.factories
            .insert(name.into(), Box::new(move || Box::new(factory()) as Box<dyn Controller>));
    }

    /// Splits a `"Controller@method"` reference, instantiates the controller
    /// and returns it with the method name. All failures are
    /// [`Error::TargetResolution`].
    pub(crate) fn resolve(&self, reference: &str) -> Result<(Box<dyn Controller>, String)> {
        let at = reference.find('@').ok_or_else(|| Error::TargetResolution {
            reference: reference.to_owned(),
            reason: "expected a \"Controller@method\" reference".to_owned(),
        })?;
        let (name, method) = (&reference[..at], &reference[at + 1..]);

        let factory = self.factories.get(name).ok_or_else(|| Error::TargetResolution {
            reference: reference.to_owned(),
            reason: format!("no controller registered under {:?}", name),
        })?;

        Ok((factory(), method.to_owned()))
    }
}

impl Debug for ControllerRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("names", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

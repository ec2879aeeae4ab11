//! Request dispatch.
//!
//! A dispatch moves through three states: *matching* (select a route or
//! synthesize a 404), *executing* (instantiate the route's middleware,
//! resolve its target, run the onion chain), and *responded*. Failures in
//! any state are converted into error responses at this boundary:
//! [`Dispatcher::dispatch`] always returns a response, never an error.

use crate::error::{Error, Result};
use crate::middleware::{Middleware, Next, Terminal};
use crate::request::Request;
use crate::response::{Body, Response};
use crate::router::Router;
use crate::target::{ControllerRegistry, Target};
use serde::Serialize;
use tracing::{debug, error};

/// The body shape of every synthesized error response.
#[derive(Debug, Serialize)]
struct ErrorPayload {
    status: &'static str,
    code: u16,
    message: String,
}

/// Matches requests against a router and runs the matched route's
/// middleware chain around its target.
///
/// A dispatcher is built once, after all registration is done, and then
/// only read from; it can be shared across threads, with each call to
/// [`dispatch`](Dispatcher::dispatch) keeping its chain state on its own
/// stack.
///
/// ```
/// use switchboard::{Dispatcher, Request, Router};
///
/// let mut router = Router::new();
/// router.get("/ping", |_req, _params| Ok("pong"))?;
///
/// let dispatcher = Dispatcher::new(router);
/// let res = dispatcher.dispatch(&Request::new("GET", "/ping")?);
/// assert_eq!(200, res.status_code());
/// # Ok::<(), switchboard::Error>(())
/// ```
#[derive(Debug)]
pub struct Dispatcher {
    router: Router,
    controllers: ControllerRegistry,
}

impl Dispatcher {
    /// Creates a dispatcher over `router` with no named controllers.
    pub fn new(router: Router) -> Dispatcher {
        Dispatcher {
            router,
            controllers: ControllerRegistry::new(),
        }
    }

    /// Creates a dispatcher that resolves `"Controller@method"` targets
    /// against `controllers`.
    pub fn with_controllers(router: Router, controllers: ControllerRegistry) -> Dispatcher {
        Dispatcher { router, controllers }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Routes a request and produces its response.
    ///
    /// Every failure along the way (no matching route, an unresolvable
    /// target, a middleware or handler error) is converted into a
    /// well-formed error response here; this method never fails.
    pub fn dispatch(&self, req: &Request) -> Response {
        match self.run(req) {
            Ok(res) => {
                debug!(method = %req.method(), path = %req.path(), status = res.status_code(), "dispatched");
                res
            }
            Err(e) => {
                let res = error_response(&e);
                match e {
                    Error::RouteNotFound => {
                        debug!(method = %req.method(), path = %req.path(), "route not found")
                    }
                    _ => error!(method = %req.method(), path = %req.path(), error = %e, "dispatch failed"),
                }
                res
            }
        }
    }

    fn run(&self, req: &Request) -> Result<Response> {
        let (route, params) = self.router.match_route(req).ok_or(Error::RouteNotFound)?;

        let registry = self.router.middleware_registry();
        let chain = route
            .middleware_aliases()
            .iter()
            .map(|alias| registry.instantiate(alias))
            .collect::<Result<Vec<Box<dyn Middleware>>>>()?;

        let terminal = match route.target() {
            Target::Handler(handler) => Terminal::Handler(handler.as_ref()),
            Target::Controller(reference) => {
                let (instance, method) = self.controllers.resolve(reference)?;
                Terminal::Controller {
                    instance,
                    method,
                    reference: reference.clone(),
                }
            }
        };

        Next {
            chain: &chain,
            terminal: &terminal,
            params: &params,
        }
        .run(req)
    }
}

/// Converts a dispatch failure into a response: the failure's recognized
/// status code, or 500, with a structured `{status, code, message}` body.
fn error_response(err: &Error) -> Response {
    let code = err.response_code();
    let payload = ErrorPayload {
        status: "ERROR",
        code,
        message: err.to_string(),
    };
    let body = serde_json::to_value(&payload).expect("an error payload always serializes");

    Response {
        code,
        headers: http::HeaderMap::new(),
        body: Body::Json(body),
    }
}

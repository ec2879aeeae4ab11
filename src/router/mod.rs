use crate::error::{Error, Result};
use crate::middleware::{Middleware, MiddlewareFactory, MiddlewareRegistry};
use crate::request::Request;
use crate::response::Reply;
use crate::route::Route;
use crate::target::Target;
use crate::types::RouteParams;
use http::Method;
use std::fmt::{self, Debug, Formatter};
use tracing::debug;

/// The route registry.
///
/// Routes are kept in registration order and matched first-to-last:
/// **the first route that matches wins**, so an earlier registration shadows
/// any later one with an overlapping pattern. Registration order is part of
/// the routing contract.
///
/// All registration happens through `&mut self` and all matching through
/// `&self`, so the borrow checker guarantees the setup phase is over before
/// dispatch begins; once built, a router can be shared freely across
/// threads.
///
/// ```
/// use switchboard::Router;
///
/// let mut router = Router::new();
/// router.get("/users", |_req, _params| Ok("User list"))?;
/// router.get(r"/users/{id}<\d+>", |_req, params| {
///     Ok(format!("User {}", params.get("id").unwrap_or("?")))
/// })?;
/// # Ok::<(), switchboard::Error>(())
/// ```
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
    middleware: MiddlewareRegistry,
}

impl Router {
    pub fn new() -> Router {
        Router::default()
    }

    /// Registers a route for the given pattern, method names, and target.
    ///
    /// Method names are case-insensitive and validated against the HTTP
    /// method vocabulary. Returns a handle to the new route for attaching
    /// middleware.
    pub fn register(&mut self, pattern: &str, methods: &[&str], target: Target) -> Result<RouteHandle<'_>> {
        let route = Route::with_method_names(pattern, methods, target)?;
        debug!(pattern = %route.pattern(), methods = ?route.methods(), "route registered");
        self.routes.push(route);
        Ok(RouteHandle {
            index: self.routes.len() - 1,
            router: self,
        })
    }

    /// Registers a `GET` route with an inline handler.
    pub fn get<H, R>(&mut self, pattern: &str, handler: H) -> Result<RouteHandle<'_>>
    where
        H: Fn(&Request, &RouteParams) -> Result<R> + Send + Sync + 'static,
        R: Into<Reply>,
    {
        self.method_route(Method::GET, pattern, handler)
    }

    /// Registers a `POST` route with an inline handler.
    pub fn post<H, R>(&mut self, pattern: &str, handler: H) -> Result<RouteHandle<'_>>
    where
        H: Fn(&Request, &RouteParams) -> Result<R> + Send + Sync + 'static,
        R: Into<Reply>,
    {
        self.method_route(Method::POST, pattern, handler)
    }

    /// Registers a `PUT` route with an inline handler.
    pub fn put<H, R>(&mut self, pattern: &str, handler: H) -> Result<RouteHandle<'_>>
    where
        H: Fn(&Request, &RouteParams) -> Result<R> + Send + Sync + 'static,
        R: Into<Reply>,
    {
        self.method_route(Method::PUT, pattern, handler)
    }

    /// Registers a `PATCH` route with an inline handler.
    pub fn patch<H, R>(&mut self, pattern: &str, handler: H) -> Result<RouteHandle<'_>>
    where
        H: Fn(&Request, &RouteParams) -> Result<R> + Send + Sync + 'static,
        R: Into<Reply>,
    {
        self.method_route(Method::PATCH, pattern, handler)
    }

    /// Registers a `DELETE` route with an inline handler.
    pub fn delete<H, R>(&mut self, pattern: &str, handler: H) -> Result<RouteHandle<'_>>
    where
        H: Fn(&Request, &RouteParams) -> Result<R> + Send + Sync + 'static,
        R: Into<Reply>,
    {
        self.method_route(Method::DELETE, pattern, handler)
    }

    fn method_route<H, R>(&mut self, method: Method, pattern: &str, handler: H) -> Result<RouteHandle<'_>>
    where
        H: Fn(&Request, &RouteParams) -> Result<R> + Send + Sync + 'static,
        R: Into<Reply>,
    {
        let route = Route::new(pattern, vec![method], Target::handler(handler))?;
        debug!(pattern = %route.pattern(), methods = ?route.methods(), "route registered");
        self.routes.push(route);
        Ok(RouteHandle {
            index: self.routes.len() - 1,
            router: self,
        })
    }

    /// Scans the routes in registration order and returns the first one
    /// matching the request, together with its captured path variables.
    pub fn match_route(&self, req: &Request) -> Option<(&Route, RouteParams)> {
        for route in &self.routes {
            if let Some(params) = route.check_for_match(req) {
                debug!(method = %req.method(), path = %req.path(), pattern = %route.pattern(), "route matched");
                return Some((route, params));
            }
        }
        debug!(method = %req.method(), path = %req.path(), "no route matched");
        None
    }

    /// Binds a middleware alias. Fails with [`Error::DuplicateAlias`] if the
    /// alias is already bound.
    pub fn register_middleware<A, F, M>(&mut self, alias: A, constructor: F) -> Result<()>
    where
        A: Into<String>,
        F: Fn() -> M + Send + Sync + 'static,
        M: Middleware + 'static,
    {
        self.middleware.register(alias, constructor)
    }

    /// Binds several middleware aliases at once; see
    /// [`middleware::factory`](crate::middleware::factory) for building the
    /// entries.
    pub fn register_middleware_many<I, A>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (A, MiddlewareFactory)>,
        A: Into<String>,
    {
        self.middleware.register_many(entries)
    }

    /// Appends a middleware alias to the most recently registered route.
    ///
    /// Fails with [`Error::NoRouteToAttach`] when nothing has been
    /// registered yet and [`Error::UnknownAlias`] when the alias is not
    /// bound. Prefer [`RouteHandle::middleware`] where the handle is still
    /// around.
    pub fn attach_middleware(&mut self, alias: &str) -> Result<()> {
        if !self.middleware.contains(alias) {
            return Err(Error::UnknownAlias {
                alias: alias.to_owned(),
            });
        }
        let route = self.routes.last_mut().ok_or(Error::NoRouteToAttach)?;
        route.middleware_aliases.push(alias.to_owned());
        Ok(())
    }

    /// All registered routes, in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub(crate) fn middleware_registry(&self) -> &MiddlewareRegistry {
        &self.middleware
    }
}

impl Debug for Router {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("middleware", &self.middleware)
            .finish()
    }
}

/// A handle to a just-registered route, returned by the registration
/// methods so middleware can be attached to exactly that route.
///
/// ```
/// use switchboard::{Middleware, Next, Request, Response, Router};
///
/// struct RequireToken;
///
/// impl Middleware for RequireToken {
///     fn handle(&self, req: &Request, next: Next<'_>) -> switchboard::Result<Response> {
///         if req.query().contains_key("token") {
///             next.run(req)
///         } else {
///             Response::new().status(401)
///         }
///     }
/// }
///
/// let mut router = Router::new();
/// router.register_middleware("auth", || RequireToken)?;
/// router.get("/private", |_req, _params| Ok("secret"))?.middleware("auth")?;
/// # Ok::<(), switchboard::Error>(())
/// ```
#[derive(Debug)]
pub struct RouteHandle<'r> {
    router: &'r mut Router,
    index: usize,
}

impl<'r> RouteHandle<'r> {
    /// Appends a middleware alias to this route. Aliases run in attachment
    /// order, outermost first. Fails with [`Error::UnknownAlias`] when the
    /// alias has not been registered with the router.
    pub fn middleware(self, alias: &str) -> Result<RouteHandle<'r>> {
        if !self.router.middleware.contains(alias) {
            return Err(Error::UnknownAlias {
                alias: alias.to_owned(),
            });
        }
        self.router.routes[self.index].middleware_aliases.push(alias.to_owned());
        Ok(self)
    }

    /// The route this handle points at.
    pub fn route(&self) -> &Route {
        &self.router.routes[self.index]
    }
}

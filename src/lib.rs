//! `Switchboard` is a lightweight, composable HTTP request router: it
//! matches a request to a registered route by method and path pattern,
//! extracts typed path variables, runs an onion-style middleware chain
//! around the route's target, and normalizes whatever the target returns
//! into an HTTP-shaped response.
//!
//! Switchboard's core pieces:
//!
//! - 🧭 A pattern compiler turning declarative strings like
//!   `/users/{id}<\d+>` into per-segment matchers
//!
//! - 🧅 Onion middleware: each layer wraps the rest of the chain and
//!   decides whether deeper layers run at all
//!
//! - 🎛 Polymorphic targets: inline closures or `"Controller@method"`
//!   references resolved lazily through a registry
//!
//! - ❗ A single error-to-response boundary: dispatch always produces a
//!   well-formed response, never a raised failure
//!
//! It is a purely in-process library. It owns no sockets, spawns nothing,
//! and has no opinion about the transport that feeds it requests.
//!
//! ## Basic Example
//!
//! ```
//! use switchboard::{Dispatcher, Request, Router};
//!
//! let mut router = Router::new();
//!
//! router.get("/users", |_req, _params| Ok("User list"))?;
//! router.get(r"/users/{id}<\d+>", |_req, params| {
//!     Ok(format!("User {}", params.get("id").unwrap_or("?")))
//! })?;
//!
//! let dispatcher = Dispatcher::new(router);
//!
//! let res = dispatcher.dispatch(&Request::new("GET", "/users/42")?);
//! assert_eq!(200, res.status_code());
//!
//! // No route matches: dispatch synthesizes a 404 instead of failing.
//! let res = dispatcher.dispatch(&Request::new("GET", "/nonexistent")?);
//! assert_eq!(404, res.status_code());
//! # Ok::<(), switchboard::Error>(())
//! ```
//!
//! ## Route Patterns
//!
//! A pattern is a `/`-separated list of segments. A literal segment matches
//! itself exactly. `{name}` captures any single non-empty segment under
//! `name`, and `{name}<constraint>` restricts the capture with a regular
//! expression that must cover the whole segment; a constraint never spans
//! a `/`. Constraints are limited to a safe character subset: a pattern
//! like `/users/{id}<[0-9]+>` is rejected at registration time because of
//! the brackets, while `/users/{id}<\d+>` compiles fine.
//!
//! Matching compares segment counts first, so `/users` and `/users/{id}`
//! never collide. There is no glob or greedy-tail support: a pattern with
//! K segments matches exactly the paths with K segments.
//!
//! Routes are tried in registration order and the first match wins.
//! Earlier registrations shadow later, overlapping ones. Ordering is part
//! of the routing contract, so register the specific pattern before the
//! general one when they overlap.
//!
//! ## Middleware
//!
//! A middleware is a type implementing [`Middleware`]: it receives the
//! request and a [`Next`] continuation. Calling `next.run(req)` executes
//! the rest of the chain and hands back the inner response; skipping the
//! call short-circuits the chain with the middleware's own response.
//!
//! Middleware types are registered under string aliases and attached to
//! routes by alias; each dispatch instantiates a fresh stack. Aliases run
//! in attachment order, outermost first.
//!
//! ```
//! use switchboard::{Dispatcher, Middleware, Next, Request, Response, Router};
//!
//! /// Rejects requests that don't carry a token query parameter.
//! struct RequireToken;
//!
//! impl Middleware for RequireToken {
//!     fn handle(&self, req: &Request, next: Next<'_>) -> switchboard::Result<Response> {
//!         if req.query().contains_key("token") {
//!             next.run(req)
//!         } else {
//!             Response::new().status(401)
//!         }
//!     }
//! }
//!
//! /// Stamps every outgoing response.
//! struct ServerHeader;
//!
//! impl Middleware for ServerHeader {
//!     fn handle(&self, req: &Request, next: Next<'_>) -> switchboard::Result<Response> {
//!         next.run(req)?.header("server", "switchboard")
//!     }
//! }
//!
//! let mut router = Router::new();
//! router.register_middleware("auth", || RequireToken)?;
//! router.register_middleware("server-header", || ServerHeader)?;
//!
//! router
//!     .get("/private", |_req, _params| Ok("the goods"))?
//!     .middleware("server-header")?
//!     .middleware("auth")?;
//!
//! let dispatcher = Dispatcher::new(router);
//! assert_eq!(401, dispatcher.dispatch(&Request::new("GET", "/private")?).status_code());
//! assert_eq!(200, dispatcher.dispatch(&Request::new("GET", "/private?token=t")?).status_code());
//! # Ok::<(), switchboard::Error>(())
//! ```
//!
//! ## Controllers
//!
//! A route target may also be a `"Controller@method"` reference. The name
//! is resolved through a [`ControllerRegistry`] when the route is actually
//! dispatched, so an unregistered controller only surfaces when something
//! routes to it, and then as an error response rather than a panic.
//!
//! ```
//! use switchboard::{
//!     Controller, ControllerRegistry, Dispatcher, Reply, Request, Result, RouteParams, Router,
//!     Target,
//! };
//!
//! struct UserController;
//!
//! impl Controller for UserController {
//!     fn invoke(&self, method: &str, _req: &Request, params: &RouteParams) -> Option<Result<Reply>> {
//!         match method {
//!             "index" => Some(Ok("User list".into())),
//!             "show" => Some(Ok(format!("User {}", params.get("id").unwrap_or("?")).into())),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut router = Router::new();
//! router.register("/users", &["GET"], Target::controller("UserController@index"))?;
//! router.register(r"/users/{id}<\d+>", &["GET"], Target::controller("UserController@show"))?;
//!
//! let mut controllers = ControllerRegistry::new();
//! controllers.register("UserController", || UserController);
//!
//! let dispatcher = Dispatcher::with_controllers(router, controllers);
//! assert_eq!(200, dispatcher.dispatch(&Request::new("GET", "/users/7")?).status_code());
//! # Ok::<(), switchboard::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Registration-time misuse (a malformed pattern, an unknown HTTP method,
//! a duplicate middleware alias) fails loudly with an [`Error`] so setup
//! aborts. Dispatch-time failures never escape: they are mapped to a
//! response with the failure's status code when it carries a recognized
//! one (see [`Error::with_status`]) and 500 otherwise, with a structured
//! `{"status":"ERROR","code":...,"message":...}` body. A missing route is
//! always a 404 with the fixed message `"Route not found"`.
//!
//! ```
//! use switchboard::{Dispatcher, Error, Request, Router};
//!
//! let mut router = Router::new();
//! router.get("/teapot", |_req, _params| {
//!     Err::<&str, _>(Error::with_status(501, "short and stout"))
//! })?;
//!
//! let dispatcher = Dispatcher::new(router);
//! assert_eq!(501, dispatcher.dispatch(&Request::new("GET", "/teapot")?).status_code());
//! # Ok::<(), switchboard::Error>(())
//! ```

pub use self::dispatch::Dispatcher;
pub use self::error::{Error, Result};
pub use self::middleware::{Middleware, MiddlewareFactory, MiddlewareRegistry, Next};
pub use self::pattern::{Segment, SegmentMatcher};
pub use self::request::Request;
pub use self::response::{Body, Reply, Response};
pub use self::route::Route;
pub use self::router::{RouteHandle, Router};
pub use self::target::{Controller, ControllerRegistry, HandlerFn, Target};
pub use self::types::RouteParams;

mod constants;
mod dispatch;
mod error;
pub mod middleware;
pub mod pattern;
mod request;
mod response;
mod route;
mod router;
mod target;
mod types;

use crate::error::{Error, Result};
use crate::pattern::{self, Segment};
use crate::request::{parse_method, Request};
use crate::target::Target;
use crate::types::RouteParams;
use http::Method;
use std::fmt::{self, Debug, Formatter};

/// Represents a single registered endpoint.
///
/// A route consists of a compiled path pattern, one or more HTTP methods, a
/// target, and the aliases of the middleware that wrap the target. It
/// shouldn't be created directly; use [`Router`](crate::Router) registration
/// methods to create one.
///
/// Routes are immutable after registration, except that middleware aliases
/// may be appended until dispatch begins.
pub struct Route {
    pub(crate) pattern: String,
    pub(crate) segments: Vec<Segment>,
    pub(crate) methods: Vec<Method>,
    pub(crate) target: Target,
    pub(crate) middleware_aliases: Vec<String>,
}

impl Route {
    pub(crate) fn new<P: Into<String>>(pattern: P, methods: Vec<Method>, target: Target) -> Result<Route> {
        if methods.is_empty() {
            return Err(Error::EmptyMethods);
        }

        let pattern = pattern.into();
        let segments = pattern::compile(&pattern)?;

        Ok(Route {
            pattern,
            segments,
            methods,
            target,
            middleware_aliases: Vec::new(),
        })
    }

    /// Parses and validates method names, then builds the route. Input is
    /// case-insensitive; methods are stored uppercase.
    pub(crate) fn with_method_names<P: Into<String>>(pattern: P, methods: &[&str], target: Target) -> Result<Route> {
        let methods = methods
            .iter()
            .map(|name| parse_method(name))
            .collect::<Result<Vec<_>>>()?;
        Route::new(pattern, methods, target)
    }

    /// Matches a request against this route.
    ///
    /// Returns the captured path variables on a match (possibly empty for a
    /// pattern without captures, which is still a match), or `None` when the
    /// method is not allowed, the segment counts differ, or any segment
    /// fails its matcher.
    pub fn check_for_match(&self, req: &Request) -> Option<RouteParams> {
        if !self.is_match_method(req.method()) {
            return None;
        }

        let parts = pattern::split_path(req.path());
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = RouteParams::with_capacity(
            self.segments.iter().filter(|s| s.is_capture()).count(),
        );

        for (segment, part) in self.segments.iter().zip(&parts) {
            if !segment.matches(part) {
                return None;
            }
            if segment.is_capture() {
                params.set(segment.key(), *part);
            }
        }

        Some(params)
    }

    pub(crate) fn is_match_method(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    /// The original pattern string this route was registered with.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The compiled pattern segments, in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Middleware aliases in attachment order, which is execution order,
    /// outermost first.
    pub fn middleware_aliases(&self) -> &[String] {
        &self.middleware_aliases
    }

    pub(crate) fn target(&self) -> &Target {
        &self.target
    }
}

impl Debug for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ pattern: {:?}, methods: {:?}, middleware: {:?} }}",
            self.pattern, self.methods, self.middleware_aliases
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: &str, path: &str) -> Request {
        Request::new(method, path).unwrap()
    }

    fn users_route() -> Route {
        Route::with_method_names("/users", &["GET", "POST"], Target::handler(|_, _| Ok("Users"))).unwrap()
    }

    fn specific_user_route() -> Route {
        Route::with_method_names(
            r"/users/{id}<\d+>",
            &["GET", "PUT", "DELETE"],
            Target::handler(|_, _| Ok("User!")),
        )
        .unwrap()
    }

    #[test]
    fn matches_registered_methods_and_shapes() {
        assert!(users_route().check_for_match(&request("GET", "/users")).is_some());
        assert!(users_route().check_for_match(&request("POST", "/users")).is_some());
        assert!(specific_user_route()
            .check_for_match(&request("GET", "/users/1"))
            .is_some());
        assert!(specific_user_route()
            .check_for_match(&request("PUT", "/users/1"))
            .is_some());
        assert!(specific_user_route()
            .check_for_match(&request("DELETE", "/users/123456"))
            .is_some());
    }

    #[test]
    fn rejects_wrong_method_count_or_constraint() {
        assert!(users_route().check_for_match(&request("GET", "/users/extra")).is_none());
        assert!(users_route().check_for_match(&request("DELETE", "/users")).is_none());
        assert!(specific_user_route().check_for_match(&request("GET", "/users")).is_none());
        assert!(specific_user_route()
            .check_for_match(&request("POST", "/users/123"))
            .is_none());
        assert!(specific_user_route()
            .check_for_match(&request("GET", "/users/a-string"))
            .is_none());
    }

    #[test]
    fn captures_are_recorded_under_their_keys() {
        let params = specific_user_route()
            .check_for_match(&request("GET", "/users/42"))
            .unwrap();
        assert_eq!(Some("42"), params.get("id"));
        assert_eq!(1, params.len());
    }

    #[test]
    fn a_match_without_captures_is_still_a_match() {
        let params = users_route().check_for_match(&request("GET", "/users")).unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn method_input_is_case_insensitive() {
        let route =
            Route::with_method_names("/users", &["get", "Post"], Target::handler(|_, _| Ok("Users"))).unwrap();
        assert_eq!(&[Method::GET, Method::POST], route.methods());
    }

    #[test]
    fn unknown_method_fails_construction() {
        let err = Route::with_method_names("/users", &["YEET"], Target::handler(|_, _| Ok(""))).unwrap_err();
        assert!(matches!(err, Error::InvalidMethod { .. }));
    }

    #[test]
    fn empty_method_set_fails_construction() {
        let err = Route::with_method_names("/users", &[], Target::handler(|_, _| Ok(""))).unwrap_err();
        assert!(matches!(err, Error::EmptyMethods));
    }

    #[test]
    fn empty_pattern_matches_only_the_empty_path() {
        let route = Route::with_method_names("/", &["GET"], Target::handler(|_, _| Ok("home"))).unwrap();
        assert!(route.check_for_match(&request("GET", "/")).is_some());
        assert!(route.check_for_match(&request("GET", "")).is_some());
        assert!(route.check_for_match(&request("GET", "/users")).is_none());
    }
}

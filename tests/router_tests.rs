use http::Method;
use switchboard::middleware::{self, Middleware};
use switchboard::{Error, Next, Request, Response, Router, Target};

mod support;
use support::req;

struct Noop;

impl Middleware for Noop {
    fn handle(&self, req: &Request, next: Next<'_>) -> switchboard::Result<Response> {
        next.run(req)
    }
}

#[test]
fn register_stores_pattern_and_methods() {
    let mut router = Router::new();
    let handle = router
        .register("/test-route", &["GET"], Target::handler(|_, _| Ok("Test route")))
        .unwrap();
    assert_eq!("/test-route", handle.route().pattern());

    let route = router.routes().last().unwrap();
    assert_eq!("/test-route", route.pattern());
    assert_eq!(&[Method::GET], route.methods());
}

#[test]
fn convenience_constructors_set_their_method() {
    let mut router = Router::new();
    router.get("/test-route-2", |_, _| Ok("Test route")).unwrap();
    assert_eq!(&[Method::GET], router.routes().last().unwrap().methods());

    router.post("/test-route-post", |_, _| Ok("Post route")).unwrap();
    assert_eq!(&[Method::POST], router.routes().last().unwrap().methods());

    router.put("/test-route-put", |_, _| Ok("Put route")).unwrap();
    assert_eq!(&[Method::PUT], router.routes().last().unwrap().methods());

    router.patch("/test-route-patch", |_, _| Ok("Patch route")).unwrap();
    assert_eq!(&[Method::PATCH], router.routes().last().unwrap().methods());

    router
        .delete(r"/test-route/{id}<\d+>", |_, _| Ok("Delete route"))
        .unwrap();
    let route = router.routes().last().unwrap();
    assert_eq!(r"/test-route/{id}<\d+>", route.pattern());
    assert_eq!(&[Method::DELETE], route.methods());
}

#[test]
fn routes_are_kept_in_registration_order() {
    let mut router = Router::new();
    router.get("/a", |_, _| Ok("a")).unwrap();
    router.get("/b", |_, _| Ok("b")).unwrap();
    router.get("/c", |_, _| Ok("c")).unwrap();

    let patterns: Vec<&str> = router.routes().iter().map(|r| r.pattern()).collect();
    assert_eq!(vec!["/a", "/b", "/c"], patterns);
}

#[test]
fn first_registered_route_shadows_overlapping_later_one() {
    let mut router = Router::new();
    router.get("/users/{id}", |_, _| Ok("general")).unwrap();
    router.get("/users/42", |_, _| Ok("specific")).unwrap();

    let (route, params) = router.match_route(&req("GET", "/users/42")).unwrap();
    assert_eq!("/users/{id}", route.pattern());
    assert_eq!(Some("42"), params.get("id"));
}

#[test]
fn registration_order_decides_between_overlapping_patterns() {
    let mut router = Router::new();
    router.get("/users/42", |_, _| Ok("specific")).unwrap();
    router.get("/users/{id}", |_, _| Ok("general")).unwrap();

    let (route, _) = router.match_route(&req("GET", "/users/42")).unwrap();
    assert_eq!("/users/42", route.pattern());

    let (route, _) = router.match_route(&req("GET", "/users/7")).unwrap();
    assert_eq!("/users/{id}", route.pattern());
}

#[test]
fn match_route_returns_none_when_nothing_fits() {
    let mut router = Router::new();
    router.get("/users", |_, _| Ok("Users")).unwrap();

    assert!(router.match_route(&req("GET", "/invalid-route")).is_none());
    assert!(router.match_route(&req("POST", "/users")).is_none());
}

#[test]
fn literal_routes_match_exactly_component_wise() {
    let mut router = Router::new();
    router.get("/part-one/part-two", |_, _| Ok("deep")).unwrap();

    assert!(router.match_route(&req("GET", "/part-one/part-two")).is_some());
    // Trailing slashes are boundary noise, interior structure is not.
    assert!(router.match_route(&req("GET", "part-one/part-two/")).is_some());
    assert!(router.match_route(&req("GET", "/part-one")).is_none());
    assert!(router.match_route(&req("GET", "/part-one/part-two/three")).is_none());
    assert!(router.match_route(&req("GET", "/part-one/other")).is_none());
}

#[test]
fn invalid_method_fails_registration() {
    let mut router = Router::new();
    let err = router
        .register("/x", &["SOMETHING"], Target::handler(|_, _| Ok("x")))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidMethod { .. }));
}

#[test]
fn registering_an_alias_twice_is_an_error() {
    let mut router = Router::new();
    router.register_middleware("noop", || Noop).unwrap();
    let err = router.register_middleware("noop", || Noop).unwrap_err();
    assert!(matches!(err, Error::DuplicateAlias { .. }));
}

#[test]
fn batch_registration_rejects_duplicates_too() {
    let mut router = Router::new();
    let err = router
        .register_middleware_many(vec![
            ("noop", middleware::factory(|| Noop)),
            ("noop", middleware::factory(|| Noop)),
        ])
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateAlias { .. }));
}

#[test]
fn attaching_an_unknown_alias_is_an_error() {
    let mut router = Router::new();
    let err = router
        .get("/users", |_, _| Ok("Users"))
        .unwrap()
        .middleware("ghost")
        .unwrap_err();
    assert!(matches!(err, Error::UnknownAlias { .. }));
}

#[test]
fn attaching_with_no_registered_route_is_an_error() {
    let mut router = Router::new();
    router.register_middleware("noop", || Noop).unwrap();
    let err = router.attach_middleware("noop").unwrap_err();
    assert!(matches!(err, Error::NoRouteToAttach));
}

#[test]
fn attach_middleware_targets_the_most_recent_route() {
    let mut router = Router::new();
    router.register_middleware("noop", || Noop).unwrap();
    router.get("/first", |_, _| Ok("first")).unwrap();
    router.get("/second", |_, _| Ok("second")).unwrap();
    router.attach_middleware("noop").unwrap();

    assert!(router.routes()[0].middleware_aliases().is_empty());
    assert_eq!(&["noop".to_owned()], router.routes()[1].middleware_aliases());
}

#[test]
fn handle_attachment_preserves_alias_order() {
    let mut router = Router::new();
    router.register_middleware("outer", || Noop).unwrap();
    router.register_middleware("inner", || Noop).unwrap();

    router
        .get("/users", |_, _| Ok("Users"))
        .unwrap()
        .middleware("outer")
        .unwrap()
        .middleware("inner")
        .unwrap();

    assert_eq!(
        &["outer".to_owned(), "inner".to_owned()],
        router.routes()[0].middleware_aliases()
    );
}

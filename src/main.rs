use switchboard::{
    Controller, ControllerRegistry, Dispatcher, Middleware, Next, Reply, Request, Response,
    RouteParams, Router, Target,
};

// A middleware which logs every request passing through it.
struct Logger;

impl Middleware for Logger {
    fn handle(&self, req: &Request, next: Next<'_>) -> switchboard::Result<Response> {
        println!("-> {} {}", req.method(), req.path());
        let res = next.run(req)?;
        println!("<- {}", res.status_code());
        Ok(res)
    }
}

// A controller grouping the user endpoints.
struct UserController;

impl Controller for UserController {
    fn invoke(
        &self,
        method: &str,
        _req: &Request,
        params: &RouteParams,
    ) -> Option<switchboard::Result<Reply>> {
        match method {
            "index" => Some(Ok("User list".into())),
            "show" => Some(Ok(format!("Hello user {}", params.get("id").unwrap_or("?")).into())),
            _ => None,
        }
    }
}

fn build_dispatcher() -> switchboard::Result<Dispatcher> {
    let mut router = Router::new();
    router.register_middleware("logger", || Logger)?;

    router.get("/", |_req, _params| Ok("Home page"))?.middleware("logger")?;
    router
        .register("/users", &["GET"], Target::controller("UserController@index"))?
        .middleware("logger")?;
    router
        .register(r"/users/{id}<\d+>", &["GET"], Target::controller("UserController@show"))?
        .middleware("logger")?;

    let mut controllers = ControllerRegistry::new();
    controllers.register("UserController", || UserController);

    Ok(Dispatcher::with_controllers(router, controllers))
}

fn main() -> switchboard::Result<()> {
    let dispatcher = build_dispatcher()?;

    for (method, uri) in &[
        ("GET", "/"),
        ("GET", "/users"),
        ("GET", "/users/42"),
        ("GET", "/users/not-a-number"),
        ("POST", "/users/42"),
    ] {
        let res = dispatcher.dispatch(&Request::new(method, uri)?);
        println!("{}", String::from_utf8_lossy(&res.to_bytes()));
    }

    Ok(())
}

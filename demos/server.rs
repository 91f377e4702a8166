//! A small widget store served by hyper, routed through a [Tree].
//!
//! ```text
//! curl -X POST 'localhost:8080/widgets/1?name=sprocket'
//! curl localhost:8080/widgets?limit=10
//! curl localhost:8080/widgets/1
//! curl -X DELETE -H 'x-token: hunter2' localhost:8080/admin/widgets/1
//! ```
use hyper::{
    service::{make_service_fn, service_fn},
    Body, Request, Response, Server, StatusCode,
};
use routetrie::{SharedTree, Tree};
use std::{
    collections::BTreeMap,
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex},
};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const TOKEN: &str = "hunter2";

type Db = Arc<Mutex<BTreeMap<u64, String>>>;

type Step = fn(&mut Cx) -> Result<(), Reject>;

struct Cx {
    params: Vec<String>,
    name: Option<String>,
    limit: Option<usize>,
    token: Option<String>,
    db: Db,
    status: StatusCode,
    body: String,
}

#[derive(Debug, Error)]
enum Reject {
    #[error("missing or invalid x-token")]
    Unauthorized,

    #[error("invalid widget id {:?}", .0)]
    BadId(String),

    #[error("missing ?name=")]
    NoName,

    #[error("no such widget")]
    Missing,

    #[error("widget store poisoned")]
    Poisoned,
}

impl Reject {
    fn status(&self) -> StatusCode {
        match self {
            Reject::Unauthorized => StatusCode::UNAUTHORIZED,
            Reject::BadId(_) | Reject::NoName => StatusCode::BAD_REQUEST,
            Reject::Missing => StatusCode::NOT_FOUND,
            Reject::Poisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn id(cx: &Cx) -> Result<u64, Reject> {
    let raw = cx.params.first().map(String::as_str).unwrap_or_default();
    raw.parse().map_err(|_| Reject::BadId(raw.into()))
}

fn trace_request(cx: &mut Cx) -> Result<(), Reject> {
    info!(params = ?cx.params, "dispatching");
    Ok(())
}

fn require_token(cx: &mut Cx) -> Result<(), Reject> {
    match cx.token.as_deref() {
        Some(TOKEN) => Ok(()),
        _ => Err(Reject::Unauthorized),
    }
}

fn index(cx: &mut Cx) -> Result<(), Reject> {
    cx.body = "widget store\n".into();
    Ok(())
}

fn list(cx: &mut Cx) -> Result<(), Reject> {
    let db = cx.db.lock().map_err(|_| Reject::Poisoned)?;
    let limit = cx.limit.unwrap_or(usize::MAX);

    for (id, name) in db.iter().take(limit) {
        cx.body.push_str(&format!("{} {}\n", id, name));
    }
    Ok(())
}

fn show(cx: &mut Cx) -> Result<(), Reject> {
    let id = id(cx)?;
    let db = cx.db.lock().map_err(|_| Reject::Poisoned)?;

    cx.body = format!("{}\n", db.get(&id).ok_or(Reject::Missing)?);
    Ok(())
}

fn create(cx: &mut Cx) -> Result<(), Reject> {
    let id = id(cx)?;
    let name = cx.name.take().ok_or(Reject::NoName)?;

    let mut db = cx.db.lock().map_err(|_| Reject::Poisoned)?;
    db.insert(id, name);

    cx.status = StatusCode::CREATED;
    Ok(())
}

fn delete(cx: &mut Cx) -> Result<(), Reject> {
    let id = id(cx)?;
    let mut db = cx.db.lock().map_err(|_| Reject::Poisoned)?;

    db.remove(&id).ok_or(Reject::Missing)?;
    cx.status = StatusCode::NO_CONTENT;
    Ok(())
}

fn routes() -> Tree<Step> {
    let mut tree: Tree<Step> = Tree::new();
    tree.add_middleware("", trace_request).get("/", index);

    tree.add_prefix("widgets")
        .get("", list)
        .get("*", show)
        .post("*", create);

    tree.add_prefix("admin")
        .add_middleware("", require_token)
        .delete("widgets/*", delete);

    tree
}

fn reply(status: StatusCode, body: String) -> Response<Body> {
    let mut resp = Response::new(Body::from(body));
    *resp.status_mut() = status;
    resp
}

fn dispatch(tree: &Tree<Step>, db: &Db, req: &Request<Body>) -> Response<Body> {
    let m = match tree.route(req) {
        Ok(m) => m,
        Err(e) => {
            let status = if tree.allowed_methods(req.uri().path()).is_empty() {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::METHOD_NOT_ALLOWED
            };
            warn!(%status, "{}", e);
            return reply(status, format!("{}\n", e));
        }
    };

    let mut cx = Cx {
        params: (0..m.params().len())
            .filter_map(|i| m.param(i))
            .map(|p| p.into_owned())
            .collect(),
        name: m.query_param("name").map(|n| n.into_owned()),
        limit: m.query_param("limit").and_then(|l| l.parse().ok()),
        token: (req.headers().get("x-token"))
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        db: Arc::clone(db),
        status: StatusCode::OK,
        body: String::new(),
    };

    let outcome: Result<(), Reject> = m.run(&mut cx);

    match outcome {
        Ok(()) => reply(cx.status, cx.body),
        Err(e) => reply(e.status(), format!("{}\n", e)),
    }
}

#[tokio::main]
async fn main() -> hyper::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let tree = Arc::new(SharedTree::new(routes()));
    let db = Db::default();

    for route in tree.load().routes() {
        info!(%route, "registered");
    }

    let make_svc = make_service_fn(move |_| {
        let tree = Arc::clone(&tree);
        let db = Arc::clone(&db);

        async move {
            Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                let resp = dispatch(&tree.load(), &db, &req);
                async move { Ok::<_, Infallible>(resp) }
            }))
        }
    });

    let addr: SocketAddr = ([127, 0, 0, 1], 8080).into();
    info!(%addr, "listening");

    Server::bind(&addr).serve(make_svc).await
}

//! Permissive cross-origin access, so browser dashboards on any origin can use the API.

use rocket::{
    fairing::{Fairing, Info, Kind},
    http::{Header, Status},
    Request, Response, Route,
};

const ALLOWED_METHODS: &str = "DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT";
/// How long a browser may cache a preflight answer, in seconds.
const MAX_AGE: &str = "600";

pub fn routes() -> Vec<Route> {
    routes![preflight]
}

/// Answer every CORS preflight request; the headers are added by [`CorsFairing`].
#[options("/<_..>")]
fn preflight() -> Status {
    Status::NoContent
}

/// A rocket fairing that allows any origin, method and header.
///
/// A request naming an `Origin` gets that origin echoed back along with
/// `Access-Control-Allow-Credentials`, as browsers refuse a wildcard for
/// credentialed requests.
#[derive(Debug, Copy, Clone)]
pub struct CorsFairing;

#[rocket::async_trait]
impl Fairing for CorsFairing {
    fn info(&self) -> Info {
        Info {
            name: "CORS",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        match req.headers().get_one("Origin") {
            Some(origin) => {
                res.set_header(Header::new("Access-Control-Allow-Origin", origin.to_string()));
                res.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
                res.set_header(Header::new("Vary", "Origin"));
            }
            None => {
                res.set_header(Header::new("Access-Control-Allow-Origin", "*"));
            }
        }

        if req.headers().contains("Access-Control-Request-Method") {
            res.set_header(Header::new("Access-Control-Allow-Methods", ALLOWED_METHODS));
            let headers = req
                .headers()
                .get_one("Access-Control-Request-Headers")
                .unwrap_or("*");
            res.set_header(Header::new("Access-Control-Allow-Headers", headers.to_string()));
            res.set_header(Header::new("Access-Control-Max-Age", MAX_AGE));
        }
    }
}

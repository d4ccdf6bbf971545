//! mote router - location-driven component mounting
//!
//! The router maps a location string to a component definition and
//! remounts it into a designated container on every navigation. Matching
//! is exact-first over a flattened route list, with `:name` segments
//! capturing path parameters. Nested routes mount their parent first and
//! place the child into a `<router-outlet>` placeholder.

mod history;
mod matcher;
mod route;
mod router;

pub use history::History;
pub use matcher::match_pattern;
pub use route::{FlatRoute, Route};
pub use router::{ErrorRoute, Gate, Listener, Middleware, Router, RouterConfig};

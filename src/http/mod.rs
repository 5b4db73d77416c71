//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, host, go-get flag)
//!     → vanity.rs (resolve against routing::RouteTable)
//!         ├─ no match  → next handler (fallback)
//!         ├─ go-get=1  → response.rs (metadata page, 200)
//!         └─ otherwise → response.rs (redirect, 307)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod vanity;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::RenderError;
pub use server::HttpServer;
pub use vanity::router;

//! Session layer: credential issuance, verification, and ownership checks.

pub mod cookie;
pub mod middleware;
pub mod ownership;
pub mod session;
pub mod verify;

pub use middleware::{AppState, AuthSession};
pub use ownership::{Identity, Owned};
pub use session::{Claims, SessionIssuer};
pub use verify::AccessGuard;

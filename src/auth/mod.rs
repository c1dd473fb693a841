mod authenticate;
mod session;

pub use authenticate::{Authenticator, TOKEN_PATH};
pub use session::Session;

mod console;
mod context;
mod handlers;

pub use console::{Console, Flow};
pub use context::Session;
pub use handlers::HELP;

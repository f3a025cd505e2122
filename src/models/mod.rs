mod cost;
mod membership;
mod message;
mod project;
mod resource;
mod task;
mod user;

pub use cost::*;
pub use membership::*;
pub use message::*;
pub use project::*;
pub use resource::*;
pub use task::*;
pub use user::*;

mod expense;
mod money;
mod period;
mod user;

pub use expense::*;
pub use money::*;
pub use period::*;
pub use user::*;

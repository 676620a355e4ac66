pub mod application;
pub mod cli;
pub mod domain;
pub mod io;
pub mod remote;

pub use domain::*;
pub use remote::SplitwiseClient;

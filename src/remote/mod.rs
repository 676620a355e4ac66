mod api;
mod client;
mod pagination;

pub use api::*;
pub use client::*;
pub use pagination::*;

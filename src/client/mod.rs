mod client;
mod feed;

pub use client::*;
pub use feed::*;

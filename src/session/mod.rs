mod outbox;
mod sessions;

pub use outbox::*;
pub use sessions::*;

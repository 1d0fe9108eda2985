mod base;
mod connection;
mod job;
mod source;

pub use base::*;
pub use connection::*;
pub use job::*;
pub use source::*;

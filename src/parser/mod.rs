mod common;
mod java;

pub use common::Parser;
pub use java::JavaParser;

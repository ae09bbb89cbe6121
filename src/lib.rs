pub mod core;
pub mod equality;
pub mod error;
pub mod eval;
pub mod reader;
pub mod repl;
pub mod value;

pub use error::LispError;
pub use repl::rep;
pub use value::Value;

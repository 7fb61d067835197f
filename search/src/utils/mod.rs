pub mod env;

pub use env::EnvParam;

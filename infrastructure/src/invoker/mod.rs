//! Model invocation adapters.

mod cli_invoker;

pub use cli_invoker::{CliInvokerConfig, CliModelInvoker};

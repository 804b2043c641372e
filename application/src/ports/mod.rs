//! Ports (interfaces) for external dependencies
//!
//! These traits define how the application layer interacts with
//! external systems. Implementations live in the infrastructure layer.

pub mod debate_logger;
pub mod model_invoker;
pub mod progress;
pub mod response_ranker;

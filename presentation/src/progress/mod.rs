//! Progress reporting during a debate

pub mod reporter;

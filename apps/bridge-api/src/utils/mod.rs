//! 工具模块

pub mod convert;
pub mod response;

pub use convert::*;

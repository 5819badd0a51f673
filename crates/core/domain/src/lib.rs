pub mod node;
pub mod principal;
pub mod value;

pub use node::{AccessMode, NodeDefinition, ScalingSpec};
pub use principal::{Permission, Principal, Role};
pub use value::{ScalarValue, ValueType};

mod free_module;
mod tensor_module;

pub mod homomorphism;

pub use free_module::{BasisKey, FreeModule, FreeModuleElement};
pub use tensor_module::TensorModule;

use std::sync::Arc;

use crate::module::{BasisKey, FreeModule, FreeModuleElement};
use crate::ring::Ring;

mod free_module_homomorphism;

pub use free_module_homomorphism::FreeModuleHomomorphism;

/// A map between free modules over the same ring that is linear over the coefficient ring.
///
/// Implementors only specify the image of a single basis key. The images of general elements are
/// obtained by extending linearly, which is what the provided methods do.
pub trait ModuleHomomorphism: Send + Sync {
    type Source: BasisKey;
    type Target: BasisKey;
    type Ring: Ring;

    fn target(&self) -> Arc<FreeModule<Self::Target, Self::Ring>>;

    /// Add `coeff` times the image of `input` to `result`.
    fn apply_to_basis_element(
        &self,
        result: &mut FreeModuleElement<Self::Target, Self::Ring>,
        coeff: &<Self::Ring as Ring>::Element,
        input: &Self::Source,
    );

    /// Add `coeff` times the image of `input` to `result`.
    fn apply(
        &self,
        result: &mut FreeModuleElement<Self::Target, Self::Ring>,
        coeff: &<Self::Ring as Ring>::Element,
        input: &FreeModuleElement<Self::Source, Self::Ring>,
    ) {
        let target = self.target();
        let ring = target.ring();
        let coeff_is_one = ring.is_one(coeff);
        for (key, c) in input.iter() {
            if coeff_is_one {
                self.apply_to_basis_element(result, c, key);
            } else {
                self.apply_to_basis_element(result, &ring.mul(coeff, c), key);
            }
        }
    }

    /// The image of `input`.
    fn image_of(
        &self,
        input: &FreeModuleElement<Self::Source, Self::Ring>,
    ) -> FreeModuleElement<Self::Target, Self::Ring> {
        let target = self.target();
        let mut result = target.zero();
        self.apply(&mut result, &target.ring().one(), input);
        result
    }
}

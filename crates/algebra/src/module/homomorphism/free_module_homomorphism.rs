use std::{marker::PhantomData, sync::Arc};

use crate::module::homomorphism::ModuleHomomorphism;
use crate::module::{BasisKey, FreeModule, FreeModuleElement};
use crate::ring::Ring;

/// A homomorphism out of a free module, determined by a function giving the image of each basis
/// key. The function is called afresh on every application, so expensive maps should memoize
/// inside the closure.
pub struct FreeModuleHomomorphism<B, C, R: Ring, Func> {
    on_basis: Func,
    target: Arc<FreeModule<C, R>>,
    _source: PhantomData<fn(&B)>,
}

impl<B, C, R, Func> FreeModuleHomomorphism<B, C, R, Func>
where
    B: BasisKey,
    C: BasisKey,
    R: Ring,
    Func: Fn(&B) -> FreeModuleElement<C, R> + Send + Sync,
{
    pub fn new(on_basis: Func, target: Arc<FreeModule<C, R>>) -> Self {
        Self {
            on_basis,
            target,
            _source: PhantomData,
        }
    }
}

impl<B, C, R, Func> ModuleHomomorphism for FreeModuleHomomorphism<B, C, R, Func>
where
    B: BasisKey,
    C: BasisKey,
    R: Ring,
    Func: Fn(&B) -> FreeModuleElement<C, R> + Send + Sync,
{
    type Source = B;
    type Target = C;
    type Ring = R;

    fn target(&self) -> Arc<FreeModule<C, R>> {
        Arc::clone(&self.target)
    }

    fn apply_to_basis_element(
        &self,
        result: &mut FreeModuleElement<C, R>,
        coeff: &R::Element,
        input: &B,
    ) {
        let output = (self.on_basis)(input);
        self.target.add_scaled(result, coeff, &output);
    }
}

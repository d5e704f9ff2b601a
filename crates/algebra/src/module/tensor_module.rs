use std::{fmt, sync::Arc};

use crate::module::{BasisKey, FreeModule, FreeModuleElement};
use crate::ring::Ring;

/// The tensor product over the coefficient ring of two free modules. This is again free, on pairs
/// of basis keys.
pub struct TensorModule<B1, B2, R: Ring> {
    pub left: Arc<FreeModule<B1, R>>,
    pub right: Arc<FreeModule<B2, R>>,
    module: Arc<FreeModule<(B1, B2), R>>,
}

impl<B1, B2, R: Ring> fmt::Display for TensorModule<B1, B2, R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (x) {}", self.left, self.right)
    }
}

impl<B1: BasisKey, B2: BasisKey, R: Ring> TensorModule<B1, B2, R> {
    pub fn new(left: Arc<FreeModule<B1, R>>, right: Arc<FreeModule<B2, R>>) -> Self {
        assert!(
            Arc::ptr_eq(left.ring(), right.ring()),
            "Tensor factors must be modules over the same ring"
        );
        let module = Arc::new(FreeModule::new(
            Arc::clone(left.ring()),
            format!("{left} (x) {right}"),
        ));
        Self {
            left,
            right,
            module,
        }
    }

    /// The underlying free module on pairs of basis keys.
    pub fn module(&self) -> &Arc<FreeModule<(B1, B2), R>> {
        &self.module
    }

    pub fn ring(&self) -> &Arc<R> {
        self.module.ring()
    }

    /// `x (x) y`, expanded bilinearly.
    pub fn tensor(
        &self,
        x: &FreeModuleElement<B1, R>,
        y: &FreeModuleElement<B2, R>,
    ) -> FreeModuleElement<(B1, B2), R> {
        let ring = self.ring();
        let mut result = self.module.zero();
        for (a, c) in x.iter() {
            for (b, d) in y.iter() {
                self.module
                    .add_basis_element(&mut result, (a.clone(), b.clone()), &ring.mul(c, d));
            }
        }
        result
    }
}

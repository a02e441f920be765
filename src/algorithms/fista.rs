use crate::container::DataContainer;
use crate::error::{ReconError, Result};
use crate::functions::Function;

use super::{Algorithm, AlgorithmState};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FistaOptions {
    /// Stop once the relative change between successive iterates falls to
    /// this. `None` runs until `max_iteration`.
    pub tolerance: Option<f32>,
    pub max_iteration: usize,
    pub update_objective_interval: usize,
}

impl Default for FistaOptions {
    fn default() -> Self {
        Self { tolerance: None, max_iteration: 20, update_objective_interval: 1 }
    }
}

/// Fast Iterative Shrinkage-Thresholding Algorithm: minimises `f(x) + g(x)`
/// for smooth `f` and proximable `g`, with step `1/L` where `L` is the
/// Lipschitz constant of `∇f`.
pub struct Fista<X, F, G> {
    x: X,
    x_old: X,
    y: X,
    t: f32,
    step: f32,
    f: F,
    g: G,
    tolerance: Option<f32>,
    state: AlgorithmState,
}

impl<X, F, G> Fista<X, F, G>
where
    X: DataContainer,
    F: Function<X>,
    G: Function<X>,
{
    pub fn new(x_init: &X, f: F, g: G, options: FistaOptions) -> Result<Self> {
        let lipschitz = f.lipschitz().ok_or_else(|| ReconError::InvalidParameter(
            format!("FISTA needs a smooth f, but {} has no Lipschitz constant", f.name())))?;
        if !(lipschitz > 0.0 && lipschitz.is_finite()) {
            return Err(ReconError::InvalidParameter(format!(
                "FISTA needs a positive Lipschitz constant, got {lipschitz}")));
        }
        let FistaOptions { tolerance, max_iteration, update_objective_interval } = options;
        Ok(Self {
            x:     x_init.clone(),
            x_old: x_init.clone(),
            y:     x_init.clone(),
            t: 1.0,
            step: 1.0 / lipschitz,
            f, g,
            tolerance,
            state: AlgorithmState::new(max_iteration, update_objective_interval),
        })
    }

    pub fn step_size(&self) -> f32 { self.step }
}

impl<X, F, G> Algorithm for Fista<X, F, G>
where
    X: DataContainer,
    F: Function<X>,
    G: Function<X>,
{
    type Output = X;

    fn update(&mut self) -> Result<()> {
        // Gradient step from the extrapolated point, then the proximal step
        let mut u = self.f.gradient(&self.y)?;
        u.axpby(-self.step, 1.0, &self.y)?;
        self.x = self.g.proximal(&u, self.step)?;

        // Nesterov momentum
        let t_new = (1.0 + (1.0 + 4.0 * self.t * self.t).sqrt()) / 2.0;
        let momentum = (self.t - 1.0) / t_new;
        self.y = self.x.zip_map(&self.x_old, |x, x_old| x + momentum * (x - x_old))?;

        if let Some(tolerance) = self.tolerance {
            let change = self.x.zip_map(&self.x_old, |x, x_old| x - x_old)?.norm();
            let size = self.x_old.norm();
            if size > 0.0 && change <= tolerance * size {
                self.state.converged = true;
            }
        }

        self.x_old.clone_from(&self.x);
        self.t = t_new;
        Ok(())
    }

    fn objective(&self) -> Result<f32> {
        Ok(self.f.value(&self.x)? + self.g.value(&self.x)?)
    }

    fn output(&self) -> &X { &self.x }

    fn state    (&    self) -> &    AlgorithmState { &    self.state }
    fn state_mut(&mut self) -> &mut AlgorithmState { &mut self.state }

    fn name(&self) -> &'static str { "FISTA" }
}

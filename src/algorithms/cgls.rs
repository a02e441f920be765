use crate::container::DataContainer;
use crate::error::{ReconError, Result};
use crate::projector::LinearOperator;

use super::{Algorithm, AlgorithmState};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CglsOptions {
    /// Converged once `‖Aᵀ r‖` has fallen by this factor
    pub tolerance: f32,
    pub max_iteration: usize,
    pub update_objective_interval: usize,
}

impl Default for CglsOptions {
    fn default() -> Self {
        Self { tolerance: 1e-6, max_iteration: 20, update_objective_interval: 1 }
    }
}

/// Conjugate Gradient Least Squares: minimises `‖A x - b‖²` by conjugate
/// gradients on the normal equations `AᵀA x = Aᵀ b`, without ever forming
/// `AᵀA`.
pub struct Cgls<'a, A: LinearOperator> {
    operator: &'a A,
    x: A::Domain,
    /// Residual `b - A x`
    r: A::Range,
    /// Normal-equations residual `Aᵀ r`
    s: A::Domain,
    /// Search direction
    p: A::Domain,
    gamma: f32,
    norm_s0: f32,
    tolerance: f32,
    state: AlgorithmState,
}

impl<'a, A: LinearOperator> Cgls<'a, A> {

    pub fn new(x_init: &A::Domain, operator: &'a A, data: &A::Range, options: CglsOptions) -> Result<Self> {
        let CglsOptions { tolerance, max_iteration, update_objective_interval } = options;
        if !(tolerance >= 0.0) {
            return Err(ReconError::InvalidParameter(format!("CGLS tolerance must be non-negative, got {tolerance}")));
        }
        let mut r = operator.direct(x_init)?;
        r.axpby(-1.0, 1.0, data)?;
        let s = operator.adjoint(&r)?;
        let gamma = s.squared_norm();
        let mut state = AlgorithmState::new(max_iteration, update_objective_interval);
        // Already at a least-squares solution: nothing to do
        state.converged = gamma == 0.0;
        Ok(Self {
            operator,
            x: x_init.clone(),
            r,
            p: s.clone(),
            s,
            gamma,
            norm_s0: gamma.sqrt(),
            tolerance,
            state,
        })
    }

    /// `‖Aᵀ (b - A x)‖`
    pub fn normal_residual(&self) -> f32 { self.gamma.sqrt() }

}

impl<'a, A: LinearOperator> Algorithm for Cgls<'a, A> {
    type Output = A::Domain;

    fn update(&mut self) -> Result<()> {
        if self.state.converged { return Ok(()) }

        let q = self.operator.direct(&self.p)?;
        let delta = q.squared_norm();
        if delta == 0.0 {
            self.state.converged = true;
            return Ok(());
        }
        let alpha = self.gamma / delta;

        self.x.axpby(1.0,  alpha, &self.p)?;
        self.r.axpby(1.0, -alpha, &q)?;

        self.s = self.operator.adjoint(&self.r)?;
        let gamma_new = self.s.squared_norm();
        let beta = gamma_new / self.gamma;
        self.p.axpby(beta, 1.0, &self.s)?;
        self.gamma = gamma_new;

        if self.gamma.sqrt() <= self.tolerance * self.norm_s0 {
            self.state.converged = true;
        }
        Ok(())
    }

    /// `‖b - A x‖²`
    fn objective(&self) -> Result<f32> { Ok(self.r.squared_norm()) }

    fn output(&self) -> &A::Domain { &self.x }

    fn state    (&    self) -> &    AlgorithmState { &    self.state }
    fn state_mut(&mut self) -> &mut AlgorithmState { &mut self.state }

    fn name(&self) -> &'static str { "CGLS" }
}

#[cfg(test)]
mod test {
    use super::*;
    use float_eq::assert_float_eq;
    use units::mm;
    use crate::image::{Image, ImageGeometry};
    use crate::projector::{Identity, ParallelBeamProjector};
    use crate::sinogram::{AcquisitionGeometry, linspace_angles};
    use crate::phantom;

    fn small_problem() -> (ImageGeometry, ParallelBeamProjector) {
        let ig = ImageGeometry::square(16, mm(1.0)).unwrap();
        let ag = AcquisitionGeometry::parallel_2d(linspace_angles(16), 16, mm(1.0)).unwrap();
        (ig, ParallelBeamProjector::new(ig, ag))
    }

    #[test]
    fn zero_iterations_leave_initial_image() -> Result<()> {
        let (ig, projector) = small_problem();
        let data = projector.direct(&phantom::two_rectangles(ig))?;
        let x_init = Image::filled(ig, 0.25);
        let mut cgls = Cgls::new(&x_init, &projector, &data, CglsOptions::default())?;
        cgls.run(0, false)?;
        assert_eq!(cgls.output().data, x_init.data);
        assert_eq!(cgls.state().objective.len(), 1);
        Ok(())
    }

    #[test]
    fn objective_never_increases() -> Result<()> {
        let (ig, projector) = small_problem();
        let data = projector.direct(&phantom::two_rectangles(ig))?;
        let mut cgls = Cgls::new(&ig.allocate(), &projector, &data, CglsOptions::default())?;
        cgls.run(20, false)?;
        let history: Vec<f32> = cgls.state().objective.iter().map(|&(_, v)| v).collect();
        assert!(history.len() > 1);
        for pair in history.windows(2) {
            assert!(pair[1] <= pair[0] * (1.0 + 1e-5), "{history:?}");
        }
        Ok(())
    }

    #[test]
    fn fits_noise_free_data() -> Result<()> {
        let (ig, projector) = small_problem();
        let truth = phantom::two_rectangles(ig);
        let data = projector.direct(&truth)?;
        let mut cgls = Cgls::new(&ig.allocate(), &projector, &data, CglsOptions::default())?;
        cgls.run(20, false)?;
        let initial = cgls.state().objective[0].1;
        let last = cgls.state().last_objective().unwrap();
        assert!(last < 0.05 * initial, "{last} vs {initial}");
        Ok(())
    }

    #[test]
    fn normal_residual_shrinks_on_noise_free_data() -> Result<()> {
        let (ig, projector) = small_problem();
        let data = projector.direct(&phantom::two_rectangles(ig))?;
        let mut cgls = Cgls::new(&ig.allocate(), &projector, &data, CglsOptions::default())?;
        let initial = cgls.normal_residual();
        assert_float_eq!(initial, projector.adjoint(&data)?.norm(), rel <= 1e-5);
        cgls.run(20, false)?;
        assert!(cgls.normal_residual() < 0.5 * initial, "{} vs {initial}", cgls.normal_residual());
        Ok(())
    }

    #[test]
    fn zero_data_converge_immediately() -> Result<()> {
        let (ig, projector) = small_problem();
        let data = projector.range_zeros();
        let mut cgls = Cgls::new(&ig.allocate(), &projector, &data, CglsOptions::default())?;
        assert!(cgls.state().converged);
        cgls.run(20, false)?;
        assert_eq!(cgls.state().iteration, 0);
        assert!(cgls.output().data.iter().all(|&v| v == 0.0));
        Ok(())
    }

    #[test]
    fn identity_is_solved_in_one_step() -> Result<()> {
        let b = Image::from_vec(ImageGeometry::square(2, mm(1.0))?, vec![1., -2., 3., 4.])?;
        let id = Identity::new(&b);
        let mut cgls = Cgls::new(&b.zeros_like(), &id, &b, CglsOptions::default())?;
        assert_float_eq!(cgls.normal_residual(), 30f32.sqrt(), rel <= 1e-6);
        cgls.run(20, false)?;
        assert_eq!(cgls.state().iteration, 1);
        assert!(cgls.state().converged);
        assert_eq!(cgls.normal_residual(), 0.0);
        assert_eq!(cgls.output().data.clone().into_raw_vec(), vec![1., -2., 3., 4.]);
        Ok(())
    }

    #[test]
    fn wrongly_shaped_data_are_rejected() {
        let (ig, projector) = small_problem();
        let wrong = AcquisitionGeometry::parallel_2d(linspace_angles(3), 16, mm(1.0)).unwrap().allocate();
        assert!(Cgls::new(&ig.allocate(), &projector, &wrong, CglsOptions::default()).is_err());
    }
}

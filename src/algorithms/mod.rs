//! Iterative solvers sharing one driver loop: iteration counting, stopping
//! and objective bookkeeping live in [`Algorithm`], each solver only supplies
//! its update step and objective.

pub mod cgls;
pub mod fista;

pub use cgls::{Cgls, CglsOptions};
pub use fista::{Fista, FistaOptions};

/// Progress of an iterative solver
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlgorithmState {
    /// Number of updates performed so far
    pub iteration: usize,
    pub max_iteration: usize,
    /// Evaluate the objective every this many iterations. Zero disables it.
    pub update_objective_interval: usize,
    /// `(iteration, objective)` pairs, oldest first
    pub objective: Vec<(usize, f32)>,
    pub converged: bool,
}

impl AlgorithmState {
    pub fn new(max_iteration: usize, update_objective_interval: usize) -> Self {
        Self { max_iteration, update_objective_interval, ..Self::default() }
    }

    pub fn last_objective(&self) -> Option<f32> { self.objective.last().map(|&(_, v)| v) }

    fn objective_due(&self) -> bool {
        let interval = self.update_objective_interval;
        interval > 0 && self.iteration % interval == 0
    }
}

pub trait Algorithm {
    type Output: DataContainer;

    /// Perform one iteration, without touching the iteration counter
    fn update(&mut self) -> Result<()>;

    /// Objective value at the current iterate
    fn objective(&self) -> Result<f32>;

    /// The current solution estimate
    fn output(&self) -> &Self::Output;

    fn state    (&    self) -> &    AlgorithmState;
    fn state_mut(&mut self) -> &mut AlgorithmState;

    fn name(&self) -> &'static str;

    fn should_stop(&self) -> bool {
        let state = self.state();
        state.iteration >= state.max_iteration || state.converged
    }

    /// Record the objective of the starting point, unless already done
    fn start(&mut self, verbose: bool) -> Result<()> {
        let state = self.state();
        if state.update_objective_interval > 0 && state.objective.is_empty() {
            self.record_objective(verbose)?;
        }
        Ok(())
    }

    /// Append the current objective to the history
    fn record_objective(&mut self, verbose: bool) -> Result<()> {
        let value = self.objective()?;
        let iteration = self.state().iteration;
        self.state_mut().objective.push((iteration, value));
        if verbose {
            info!(algorithm = self.name(), iteration, objective = value);
        }
        Ok(())
    }

    /// One iteration, if the solver has not stopped yet. Returns whether an
    /// iteration was performed.
    fn step(&mut self, verbose: bool) -> Result<bool> {
        if self.should_stop() { return Ok(false) }
        self.update()?;
        self.state_mut().iteration += 1;
        if self.state().objective_due() {
            self.record_objective(verbose)?;
        }
        Ok(true)
    }

    /// Perform up to `iterations` iterations, stopping early at
    /// `max_iteration` or on convergence
    fn run(&mut self, iterations: usize, verbose: bool) -> Result<()> {
        self.start(verbose)?;
        for _ in 0..iterations {
            if !self.step(verbose)? { break }
        }
        if verbose {
            let state = self.state();
            info!(algorithm = self.name(),
                  iterations = state.iteration,
                  converged = state.converged,
                  "stopped");
        }
        Ok(())
    }

    /// Iterator yielding a snapshot of the solution after each further
    /// iteration, until the solver stops
    fn iterates(&mut self, verbose: bool) -> Iterates<'_, Self>
    where
        Self: Sized,
    {
        Iterates { algorithm: self, verbose, started: false, failed: false }
    }
}

pub struct Iterates<'a, A> {
    algorithm: &'a mut A,
    verbose: bool,
    started: bool,
    failed: bool,
}

impl<'a, A: Algorithm> Iterator for Iterates<'a, A> {
    type Item = Result<A::Output>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed { return None }
        if !self.started {
            self.started = true;
            if let Err(e) = self.algorithm.start(self.verbose) {
                self.failed = true;
                return Some(Err(e));
            }
        }
        match self.algorithm.step(self.verbose) {
            Ok(true)  => Some(Ok(self.algorithm.output().clone())),
            Ok(false) => None,
            Err(e)    => { self.failed = true; Some(Err(e)) }
        }
    }
}

// ----- Imports -----------------------------------------------------------------------------------------
use tracing::info;

use crate::{
    container::DataContainer,
    error::Result,
};

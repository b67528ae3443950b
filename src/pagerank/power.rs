//! Power iteration
//!
//! Repeatedly applies the transition matrix to a uniform seed vector and
//! stops once a step no longer shrinks the vector's magnitude by more than
//! the tolerance. This is a magnitude-decay test, not a check that the
//! vector's direction has settled; it is meaningful because every matrix
//! built from a graph is row-stochastic with dominant eigenvalue 1.

use super::EigenResult;
use crate::matrix::{magnitude, TransitionMatrix};
use crate::types::{DEFAULT_MAGNITUDE_TOLERANCE, DEFAULT_MAX_ITERATIONS};

/// Power-iteration solver
#[derive(Debug, Clone, PartialEq)]
pub struct PowerIteration {
    /// Maximum number of matrix applications
    pub max_iterations: usize,
    /// Stop once one step drops the magnitude by at most this much
    pub magnitude_tolerance: f64,
}

impl Default for PowerIteration {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            magnitude_tolerance: DEFAULT_MAGNITUDE_TOLERANCE,
        }
    }
}

impl PowerIteration {
    /// Create a new PowerIteration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the magnitude-drop tolerance
    pub fn with_tolerance(mut self, magnitude_tolerance: f64) -> Self {
        self.magnitude_tolerance = magnitude_tolerance;
        self
    }

    /// Approximate the principal eigenvector of `matrix`.
    ///
    /// The seed has every entry equal to `sqrt(initial_magnitude / n)`, so its
    /// squared norm is `initial_magnitude`. At least one step always runs.
    /// The returned vector is not rescaled.
    pub fn run(&self, matrix: &TransitionMatrix, initial_magnitude: f64) -> EigenResult {
        let n = matrix.dim();
        if n == 0 {
            return EigenResult::new(vec![], 0, 0.0, true);
        }
        trace_stage!("power_iteration");

        let seed = (initial_magnitude / n as f64).sqrt();
        let mut vector = vec![seed; n];
        let mut scratch = vec![0.0; n];
        let mut iterations = 0;
        let mut decay;

        loop {
            let before = magnitude(&vector);
            matrix.multiply(&vector, &mut scratch);
            std::mem::swap(&mut vector, &mut scratch);
            iterations += 1;

            decay = before - magnitude(&vector);
            if iterations >= self.max_iterations || !(decay > self.magnitude_tolerance) {
                break;
            }
        }

        let converged = decay <= self.magnitude_tolerance;
        if converged {
            trace_event!(debug, iterations, decay, "power iteration settled");
        } else {
            trace_event!(warn, iterations, decay, "power iteration hit its iteration cap");
        }

        EigenResult::new(vector, iterations, decay, converged)
    }
}

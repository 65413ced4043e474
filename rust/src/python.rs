//! Python bindings.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use std::sync::Arc;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::{ConstructionHeuristic, TabuSearchConfig};
use crate::instance::parse_instance;
use crate::moves::Neighborhood;
use crate::search::tabu_search;
use crate::solution::Solution;

fn value_error(e: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Summary of a search run.
#[pyclass(name = "SearchResult")]
#[derive(Clone, Debug)]
pub struct PySearchResult {
    #[pyo3(get)]
    pub cost: f64,
    #[pyo3(get)]
    pub initial_cost: f64,
    #[pyo3(get)]
    pub iterations: usize,
    #[pyo3(get)]
    pub restarts: usize,
    #[pyo3(get)]
    pub termination: String,
    /// Result in the text exchange format.
    #[pyo3(get)]
    pub output: String,
}

#[pymethods]
impl PySearchResult {
    fn __repr__(&self) -> String {
        format!(
            "SearchResult(cost={}, initial_cost={}, iterations={}, termination={:?})",
            self.cost, self.initial_cost, self.iterations, self.termination
        )
    }
}

/// Run a tabu search on an instance given as text.
///
/// # Raises
/// * ValueError if the instance is malformed, an option name is unknown, or
///   the search cannot start
#[pyfunction]
#[pyo3(signature = (text, seed=0, neighborhood="n1", construction="bidirectional", max_iter=1200, verbosity=0))]
fn solve(
    text: &str,
    seed: u64,
    neighborhood: &str,
    construction: &str,
    max_iter: usize,
    verbosity: u8,
) -> PyResult<PySearchResult> {
    let problem = Arc::new(parse_instance(text).map_err(value_error)?);
    let config = TabuSearchConfig::default()
        .with_seed(seed)
        .with_neighborhood(neighborhood.parse::<Neighborhood>().map_err(value_error)?)
        .with_construction(
            construction
                .parse::<ConstructionHeuristic>()
                .map_err(value_error)?,
        )
        .with_max_iter(max_iter)
        .with_verbosity(verbosity);

    let outcome = tabu_search(problem, &config).map_err(value_error)?;
    Ok(PySearchResult {
        cost: outcome.cost,
        initial_cost: outcome.initial_cost,
        iterations: outcome.iterations,
        restarts: outcome.restarts,
        termination: outcome.termination.to_string(),
        output: outcome.best.format_result().map_err(value_error)?,
    })
}

/// Run a tabu search and return only the text result.
#[pyfunction]
#[pyo3(signature = (text, seed=0, neighborhood="n1", construction="bidirectional", max_iter=1200, verbosity=0))]
fn solve_instance(
    text: &str,
    seed: u64,
    neighborhood: &str,
    construction: &str,
    max_iter: usize,
    verbosity: u8,
) -> PyResult<String> {
    Ok(solve(text, seed, neighborhood, construction, max_iter, verbosity)?.output)
}

/// Makespan of the constructed initial schedule.
#[pyfunction]
#[pyo3(signature = (text, construction="bidirectional"))]
fn initial_cost(text: &str, construction: &str) -> PyResult<f64> {
    let problem = Arc::new(parse_instance(text).map_err(value_error)?);
    let heuristic = construction
        .parse::<ConstructionHeuristic>()
        .map_err(value_error)?;
    let solution = Solution::construct(problem, heuristic).map_err(value_error)?;
    solution.cost().map_err(value_error)
}

/// The jobshop_tabu Python module.
#[pymodule]
fn jobshop_tabu(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySearchResult>()?;

    m.add_function(wrap_pyfunction!(solve, m)?)?;
    m.add_function(wrap_pyfunction!(solve_instance, m)?)?;
    m.add_function(wrap_pyfunction!(initial_cost, m)?)?;

    Ok(())
}

//! Python bindings for the model
//!
//! Rate functions are Python callables with the signature `func(t, stocks, pars) -> float`
//! where `stocks` is a dict of the current stock values and `pars` is the object passed to
//! `add_pars` (`None` by default).

use crate::errors::StofloError;
use crate::flow::StockLink;
use crate::model::Model;
use crate::registry::Named;
use crate::state::StockState;
use crate::time_grid::{FloatValue, Time};
use numpy::{PyArray1, ToPyArray};
use pyo3::exceptions::{PyIndexError, PyKeyError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

impl From<StofloError> for PyErr {
    fn from(err: StofloError) -> Self {
        match err {
            StofloError::RateFunctionFailure { source, .. } => match source.downcast::<PyErr>() {
                // Exceptions raised by Python rate functions are passed through unchanged
                Ok(py_err) => *py_err,
                Err(source) => PyValueError::new_err(source.to_string()),
            },
            StofloError::UnknownStockReference { .. } | StofloError::UnknownStock(_) => {
                PyKeyError::new_err(err.to_string())
            }
            StofloError::DimensionMismatch { .. } => PyIndexError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

fn call_rate_function(
    func: &PyObject,
    t: Time,
    stocks: &StockState,
    pars: &PyObject,
) -> PyResult<FloatValue> {
    Python::with_gil(|py| {
        let state = PyDict::new_bound(py);
        for (name, value) in stocks.iter() {
            state.set_item(name, value)?;
        }
        func.call1(py, (t, state, pars.clone_ref(py)))?
            .extract::<FloatValue>(py)
    })
}

/// Build a link from keyword arguments, treating an empty name as no stock
fn stock_link(into: Option<String>, outfrom: Option<String>) -> StockLink {
    let non_empty = |name: Option<String>| name.filter(|name| !name.is_empty());
    StockLink::new(non_empty(into), non_empty(outfrom))
}

/// A stock and flow model
///
/// Example:
///     model = Model()
///     model.add_time(dt=1.0, t_max=20.0)
///     model.add_stock("A", 10.0)
///     model.add_flow("decay", lambda t, s, p: 0.1 * s["A"], outfrom="A")
///     model.run_euler()
///     model.stocks["A"]
#[pyclass]
#[pyo3(name = "Model")]
pub struct PyModel(pub Model<PyObject>);

#[pymethods]
impl PyModel {
    #[new]
    fn new(py: Python<'_>) -> Self {
        Self(Model::with_parameters(py.None()))
    }

    /// Regenerate the time grid
    ///
    /// Stocks that were added before calling this need to be added again.
    #[pyo3(signature = (dt, t_max, t_start=0.0, niter=1))]
    fn add_time(&mut self, dt: Time, t_max: Time, t_start: Time, niter: usize) -> PyResult<()> {
        Ok(self.0.configure_time(dt, t_max, t_start, niter)?)
    }

    fn add_pars(&mut self, pars: PyObject) {
        self.0.set_parameters(pars)
    }

    fn add_stock(&mut self, name: String, initial: FloatValue) {
        self.0.add_stock(name, initial)
    }

    #[pyo3(signature = (name, func, into=None, outfrom=None))]
    fn add_flow(
        &mut self,
        name: String,
        func: PyObject,
        into: Option<String>,
        outfrom: Option<String>,
    ) {
        self.0.add_flow(
            name,
            move |t, stocks: &StockState, pars: &PyObject| {
                call_rate_function(&func, t, stocks, pars)
            },
            stock_link(into, outfrom),
        )
    }

    #[pyo3(signature = (name, ts, into=None, outfrom=None))]
    fn add_driver(
        &mut self,
        name: String,
        ts: Vec<FloatValue>,
        into: Option<String>,
        outfrom: Option<String>,
    ) {
        self.0.add_driver(name, ts, stock_link(into, outfrom))
    }

    fn run_euler(&mut self) -> PyResult<()> {
        Ok(self.0.run_euler()?)
    }

    fn validate(&self) -> PyResult<()> {
        Ok(self.0.validate()?)
    }

    fn as_dot(&self) -> String {
        self.0.as_dot()
    }

    #[getter]
    fn t<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<Time>> {
        self.0.time_grid().values().to_pyarray_bound(py)
    }

    #[getter]
    fn nt(&self) -> usize {
        self.0.time_grid().len()
    }

    #[getter]
    fn dt(&self) -> Time {
        self.0.time_grid().step()
    }

    #[getter]
    fn niter(&self) -> usize {
        self.0.time_grid().sub_steps()
    }

    #[getter]
    fn t_max(&self) -> Time {
        self.0.time_grid().stop()
    }

    #[getter]
    fn t_start(&self) -> Time {
        self.0.time_grid().start()
    }

    #[getter]
    fn pars(&self, py: Python<'_>) -> PyObject {
        self.0.parameters().clone_ref(py)
    }

    /// Trajectory of each stock
    #[getter]
    fn stocks<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let stocks = PyDict::new_bound(py);
        for stock in self.0.stocks() {
            stocks.set_item(stock.name(), stock.values().to_pyarray_bound(py))?;
        }
        Ok(stocks)
    }

    /// Reconstructed rate of each flow
    #[getter]
    fn flow_output<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let flows = PyDict::new_bound(py);
        for (name, values) in self.0.flow_outputs() {
            flows.set_item(name, values.to_pyarray_bound(py))?;
        }
        Ok(flows)
    }
}

#[pymodule]
pub fn core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyModel>()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_names_are_unlinked() {
        assert_eq!(stock_link(Some(String::new()), None), StockLink::unlinked());
        assert_eq!(
            stock_link(Some("A".to_string()), Some(String::new())),
            StockLink::inflow_to("A")
        );
        assert_eq!(
            stock_link(Some("B".to_string()), Some("A".to_string())),
            StockLink::transfer("A", "B")
        );
    }
}

use num_complex::Complex64;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pythonize::{depythonize, pythonize};

use ::mulens_model::{
    magnification_curve as rs_magnification_curve, BinaryLens, BinaryLensWithShear,
    MagnificationModel, MulensError, ParallaxInput, ParallaxVector, PointLens, ReferenceFrame,
    SolverConfig, Trajectory,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn value_error(err: MulensError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn parse_solver(solver: Option<&Bound<'_, PyAny>>) -> PyResult<SolverConfig> {
    match solver {
        None => Ok(SolverConfig::default()),
        Some(obj) => {
            let config = depythonize::<SolverConfig>(obj)
                .map_err(|e| PyValueError::new_err(format!("Invalid solver settings: {e}")))?;
            config.validate().map_err(value_error)?;
            Ok(config)
        }
    }
}

// ---------------------------------------------------------------------------
// Parallax
// ---------------------------------------------------------------------------

/// Microlensing parallax vector.
///
/// Give either ``pi_E_1`` and ``pi_E_2`` or a two-element ``pi_E``, not both.
/// ``ref`` names the frame (``"NorthEast"``, ``"ParPerp"`` or
/// ``"Unspecified"``) and defaults to ``"NorthEast"``.
#[pyclass(name = "ParallaxVector")]
#[derive(Clone)]
pub struct PyParallaxVector {
    inner: ParallaxVector,
}

#[pymethods]
impl PyParallaxVector {
    #[new]
    #[pyo3(signature = (pi_E_1=None, pi_E_2=None, pi_E=None, r#ref=None))]
    #[allow(non_snake_case)]
    fn new(
        pi_E_1: Option<f64>,
        pi_E_2: Option<f64>,
        pi_E: Option<Vec<f64>>,
        r#ref: Option<&str>,
    ) -> PyResult<Self> {
        let input = ParallaxInput::from_keywords(pi_E_1, pi_E_2, pi_E).map_err(value_error)?;
        let frame = r#ref
            .map(str::parse::<ReferenceFrame>)
            .transpose()
            .map_err(value_error)?;
        let inner = ParallaxVector::new(input, frame).map_err(value_error)?;
        Ok(Self { inner })
    }

    #[getter]
    fn components(&self) -> (f64, f64) {
        let [a, b] = self.inner.components();
        (a, b)
    }

    #[getter]
    fn reference_frame(&self) -> String {
        self.inner.reference_frame().to_string()
    }

    fn __repr__(&self) -> String {
        self.inner.to_string()
    }
}

// ---------------------------------------------------------------------------
// Lens models
// ---------------------------------------------------------------------------

/// Two point masses; ``magnification`` averages over a uniform source disk.
#[pyclass(name = "BinaryLens")]
#[derive(Clone)]
pub struct PyBinaryLens {
    inner: BinaryLens,
}

#[pymethods]
impl PyBinaryLens {
    #[new]
    #[pyo3(signature = (mass_1, mass_2, separation, solver=None))]
    fn new(
        mass_1: f64,
        mass_2: f64,
        separation: f64,
        solver: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<Self> {
        let solver = parse_solver(solver)?;
        let inner = BinaryLens::new(mass_1, mass_2, separation)
            .map_err(value_error)?
            .with_solver(solver);
        Ok(Self { inner })
    }

    #[pyo3(signature = (source_x, source_y, rho=0.0))]
    fn magnification(
        &self,
        py: Python<'_>,
        source_x: f64,
        source_y: f64,
        rho: f64,
    ) -> PyResult<f64> {
        let lens = self.inner;
        py.allow_threads(|| lens.magnification(source_x, source_y, rho))
            .map_err(value_error)
    }

    fn point_source_magnification(&self, source_x: f64, source_y: f64) -> PyResult<f64> {
        self.inner
            .point_source_magnification(source_x, source_y)
            .map_err(value_error)
    }

    /// List of dicts with ``position``, ``magnification`` and ``parity``.
    fn images(&self, py: Python<'_>, source_x: f64, source_y: f64) -> PyResult<PyObject> {
        let images = self.inner.images(source_x, source_y).map_err(value_error)?;
        Ok(pythonize(py, &images)?.unbind())
    }

    fn __repr__(&self) -> String {
        format!(
            "BinaryLens(mass_1={}, mass_2={}, separation={})",
            self.inner.mass_1(),
            self.inner.mass_2(),
            self.inner.separation()
        )
    }
}

/// Binary lens perturbed by external convergence ``K`` and complex shear ``G``.
///
/// The source is always treated as a point; ``rho`` is validated and ignored.
#[pyclass(name = "BinaryLensWithShear")]
#[derive(Clone)]
pub struct PyBinaryLensWithShear {
    inner: BinaryLensWithShear,
}

#[pymethods]
impl PyBinaryLensWithShear {
    #[new]
    #[pyo3(signature = (mass_1, mass_2, separation, convergence_K=0.0, shear_G=Complex64::new(0.0, 0.0), solver=None))]
    #[allow(non_snake_case)]
    fn new(
        mass_1: f64,
        mass_2: f64,
        separation: f64,
        convergence_K: f64,
        shear_G: Complex64,
        solver: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<Self> {
        let solver = parse_solver(solver)?;
        let inner = BinaryLensWithShear::new(mass_1, mass_2, separation, convergence_K, shear_G)
            .map_err(value_error)?
            .with_solver(solver);
        Ok(Self { inner })
    }

    #[pyo3(signature = (source_x, source_y, rho=0.0))]
    fn magnification(&self, source_x: f64, source_y: f64, rho: f64) -> PyResult<f64> {
        self.inner
            .magnification(source_x, source_y, rho)
            .map_err(value_error)
    }

    /// Same as ``magnification``; kept for callers of the older method name.
    #[pyo3(signature = (source_x, source_y, rho=0.0))]
    fn vbbl_magnification(&self, source_x: f64, source_y: f64, rho: f64) -> PyResult<f64> {
        self.magnification(source_x, source_y, rho)
    }

    fn point_source_magnification(&self, source_x: f64, source_y: f64) -> PyResult<f64> {
        self.inner
            .point_source_magnification(source_x, source_y)
            .map_err(value_error)
    }

    fn images(&self, py: Python<'_>, source_x: f64, source_y: f64) -> PyResult<PyObject> {
        let images = self.inner.images(source_x, source_y).map_err(value_error)?;
        Ok(pythonize(py, &images)?.unbind())
    }

    fn __repr__(&self) -> String {
        format!(
            "BinaryLensWithShear(mass_1={}, mass_2={}, separation={}, convergence_K={}, shear_G={})",
            self.inner.mass_1(),
            self.inner.mass_2(),
            self.inner.separation(),
            self.inner.convergence_k(),
            self.inner.shear_g()
        )
    }
}

/// Single point-mass lens at the origin.
#[pyclass(name = "PointLens")]
#[derive(Clone)]
pub struct PyPointLens {
    inner: PointLens,
}

#[pymethods]
impl PyPointLens {
    #[new]
    #[pyo3(signature = (solver=None))]
    fn new(solver: Option<&Bound<'_, PyAny>>) -> PyResult<Self> {
        let inner = PointLens::new().with_solver(parse_solver(solver)?);
        Ok(Self { inner })
    }

    #[pyo3(signature = (source_x, source_y, rho=0.0))]
    fn magnification(&self, source_x: f64, source_y: f64, rho: f64) -> PyResult<f64> {
        self.inner
            .magnification(source_x, source_y, rho)
            .map_err(value_error)
    }

    fn point_source_magnification(&self, source_x: f64, source_y: f64) -> PyResult<f64> {
        self.inner
            .point_source_magnification(source_x, source_y)
            .map_err(value_error)
    }
}

// ---------------------------------------------------------------------------
// Light curves
// ---------------------------------------------------------------------------

#[derive(FromPyObject)]
enum AnyLens {
    Binary(PyBinaryLens),
    Shear(PyBinaryLensWithShear),
    Point(PyPointLens),
}

impl AnyLens {
    fn model(&self) -> &dyn MagnificationModel {
        match self {
            AnyLens::Binary(lens) => &lens.inner,
            AnyLens::Shear(lens) => &lens.inner,
            AnyLens::Point(lens) => &lens.inner,
        }
    }
}

/// Magnification along a rectilinear trajectory (parallel over epochs).
///
/// Args:
///     lens: A ``BinaryLens``, ``BinaryLensWithShear`` or ``PointLens``.
///     t_0, u_0, t_E: Epoch of closest approach, impact parameter, timescale.
///     alpha: Trajectory angle to the binary axis in degrees.
///     times: Epochs at which to evaluate.
///     rho: Source radius in Einstein radii.
///
/// Returns a list of magnifications, one per epoch.
#[pyfunction]
#[pyo3(signature = (lens, t_0, u_0, t_E, alpha, times, rho=0.0))]
#[allow(non_snake_case)]
fn magnification_curve(
    py: Python<'_>,
    lens: AnyLens,
    t_0: f64,
    u_0: f64,
    t_E: f64,
    alpha: f64,
    times: Vec<f64>,
    rho: f64,
) -> PyResult<Vec<f64>> {
    let trajectory = Trajectory::new(t_0, u_0, t_E, alpha).map_err(value_error)?;
    py.allow_threads(|| rs_magnification_curve(lens.model(), &trajectory, &times, rho))
        .map_err(value_error)
}

// ---------------------------------------------------------------------------
// Module
// ---------------------------------------------------------------------------

#[pymodule]
fn mulens_model(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyParallaxVector>()?;
    m.add_class::<PyBinaryLens>()?;
    m.add_class::<PyBinaryLensWithShear>()?;
    m.add_class::<PyPointLens>()?;
    m.add_function(wrap_pyfunction!(magnification_curve, m)?)?;
    Ok(())
}

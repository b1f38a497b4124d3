use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Feature matrix and target vector held in memory.
///
/// Shape invariants are checked on construction: one target per row and at
/// least one row.
#[derive(Clone, Debug)]
pub struct InMemoryDataset {
    x: Array2<f64>,
    y: Array1<f64>,
}

impl InMemoryDataset {
    pub fn new(x: Array2<f64>, y: Array1<f64>) -> Result<Self, String> {
        if x.nrows() != y.len() {
            return Err("x and y must have same length".into());
        }
        if x.nrows() == 0 {
            return Err("Dataset is empty".into());
        }
        Ok(Self { x, y })
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.x.view()
    }

    pub fn targets(&self) -> ArrayView1<'_, f64> {
        self.y.view()
    }
}

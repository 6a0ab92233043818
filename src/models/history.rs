use serde::Serialize;

/// Best score and stagnation counter recorded once per epoch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct History {
    costs: Vec<f64>,
    stagnation: Vec<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends this epoch's best score and returns the updated stagnation counter.
    ///
    /// The counter is 0 on the first epoch and whenever the best score differs from
    /// the previous epoch's, and grows by one for every epoch it stays the same.
    pub(crate) fn record(&mut self, best: f64) -> usize {
        let stagnation = match (self.costs.last(), self.stagnation.last()) {
            (Some(&previous), Some(&count)) if previous == best => count + 1,
            _ => 0,
        };

        self.costs.push(best);
        self.stagnation.push(stagnation);
        stagnation
    }

    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    pub fn stagnation(&self) -> &[usize] {
        &self.stagnation
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

use serde::{Deserialize, Serialize};

/// Grouping granularity: modules on a link may only be installed in whole multiples of `k`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Modularity(f64);

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("modularity must be a finite value >= 1.0, got {0}")]
pub struct ModularityOutOfRange(f64);

impl Modularity {
    pub fn new(k: f64) -> Result<Self, ModularityOutOfRange> {
        if !(k.is_finite() && k >= 1.0) {
            return Err(ModularityOutOfRange(k));
        }

        Ok(Self(k))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Modules installed beyond `modules` to reach the next multiple of `k`.
    ///
    /// `modules` is expected to be a whole module count, which makes the waste
    /// exactly zero for `k = 1`.
    pub fn waste(&self, modules: f64) -> f64 {
        (modules / self.0).ceil() * self.0 - modules
    }
}

impl TryFrom<f64> for Modularity {
    type Error = ModularityOutOfRange;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Modularity> for f64 {
    fn from(modularity: Modularity) -> Self {
        modularity.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_validates_range() {
        assert!(Modularity::new(0.5).is_err());
        assert!(Modularity::new(-1.0).is_err());
        assert!(Modularity::new(f64::NAN).is_err());
        assert!(Modularity::new(f64::INFINITY).is_err());
        assert!(Modularity::new(1.0).is_ok());
        assert!(Modularity::new(2.5).is_ok());
    }

    #[test]
    fn it_has_no_waste_for_unit_modularity() {
        let k = Modularity::new(1.0).unwrap();
        for modules in 0..50 {
            assert_eq!(k.waste(modules as f64), 0.0);
        }
    }

    #[test]
    fn it_rounds_up_to_next_group() {
        let k = Modularity::new(4.0).unwrap();
        assert_eq!(k.waste(0.0), 0.0);
        assert_eq!(k.waste(1.0), 3.0);
        assert_eq!(k.waste(4.0), 0.0);
        assert_eq!(k.waste(5.0), 3.0);

        let k = Modularity::new(2.5).unwrap();
        assert_eq!(k.waste(3.0), 2.0);
    }

    #[test]
    fn it_deserializes_through_validation() {
        let k: Modularity = serde_json::from_str("3.0").unwrap();
        assert_eq!(k.value(), 3.0);

        assert!(serde_json::from_str::<Modularity>("0.25").is_err());
    }
}

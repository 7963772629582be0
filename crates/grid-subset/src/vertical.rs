//! Vertical transforms.
//!
//! A vertical transform describes how the index-space vertical axis maps to
//! a physical coordinate (pressure or height). Subsetting only re-indexes
//! the per-level coefficients; units and parameters are carried unchanged.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SubsetError};
use crate::range::Range;

/// The closed set of supported vertical coordinate formulas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VerticalTransformKind {
    /// `p = ptop + sigma(k) * (ps - ptop)`
    AtmosphereSigma { ptop: f64, sigma: Vec<f64> },
    /// `p = a(k) * p0 + b(k) * ps`
    HybridSigmaPressure { a: Vec<f64>, b: Vec<f64>, p0: f64 },
    /// `z = eta + (eta + depth) * sigma(k)`
    OceanSigma { sigma: Vec<f64> },
    /// Levels given by a 3-D field in the dataset. `levels` are the indices
    /// of that field's vertical dimension still selected, `None` for all.
    Existing3D {
        variable: String,
        levels: Option<Range>,
    },
}

/// Surface values a transform is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    /// Surface pressure, in the transform's units
    Pressure(f64),
    /// Sea surface height and bathymetry depth
    Ocean { eta: f64, depth: f64 },
}

/// A named, unit-bearing vertical transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalTransform {
    name: String,
    units: String,
    kind: VerticalTransformKind,
}

impl VerticalTransform {
    pub fn new(name: impl Into<String>, units: impl Into<String>, kind: VerticalTransformKind) -> Self {
        Self {
            name: name.into(),
            units: units.into(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn kind(&self) -> &VerticalTransformKind {
        &self.kind
    }

    /// Number of levels described, when the transform carries coefficients.
    pub fn num_levels(&self) -> Option<usize> {
        match &self.kind {
            VerticalTransformKind::AtmosphereSigma { sigma, .. } => Some(sigma.len()),
            VerticalTransformKind::HybridSigmaPressure { a, .. } => Some(a.len()),
            VerticalTransformKind::OceanSigma { sigma } => Some(sigma.len()),
            VerticalTransformKind::Existing3D { levels, .. } => levels.map(|r| r.len()),
        }
    }

    /// Check the transform against a vertical axis of `n` levels.
    pub fn validate_levels(&self, n: usize) -> Result<()> {
        if let VerticalTransformKind::HybridSigmaPressure { a, b, .. } = &self.kind {
            if a.len() != b.len() {
                return Err(SubsetError::invalid_coord_system(format!(
                    "vertical transform '{}' has {} a and {} b coefficients",
                    self.name,
                    a.len(),
                    b.len()
                )));
            }
        }
        match self.num_levels() {
            Some(levels) if levels != n => Err(SubsetError::invalid_coord_system(format!(
                "vertical transform '{}' describes {} levels but the axis has {}",
                self.name, levels, n
            ))),
            _ => Ok(()),
        }
    }

    /// Transform re-indexed to the levels selected by `range`.
    pub fn section(&self, range: &Range) -> Result<VerticalTransform> {
        let pick = |v: &[f64]| -> Result<Vec<f64>> {
            range.check_within(&self.name, v.len())?;
            Ok(range.iter().map(|k| v[k]).collect())
        };

        let kind = match &self.kind {
            VerticalTransformKind::AtmosphereSigma { ptop, sigma } => {
                VerticalTransformKind::AtmosphereSigma {
                    ptop: *ptop,
                    sigma: pick(sigma)?,
                }
            }
            VerticalTransformKind::HybridSigmaPressure { a, b, p0 } => {
                VerticalTransformKind::HybridSigmaPressure {
                    a: pick(a)?,
                    b: pick(b)?,
                    p0: *p0,
                }
            }
            VerticalTransformKind::OceanSigma { sigma } => VerticalTransformKind::OceanSigma {
                sigma: pick(sigma)?,
            },
            VerticalTransformKind::Existing3D { variable, levels } => {
                let levels = match levels {
                    Some(outer) => outer.compose(range).ok_or_else(|| {
                        SubsetError::out_of_bounds(&self.name, range, outer.len())
                    })?,
                    None => *range,
                };
                VerticalTransformKind::Existing3D {
                    variable: variable.clone(),
                    levels: Some(levels),
                }
            }
        };

        Ok(Self {
            name: self.name.clone(),
            units: self.units.clone(),
            kind,
        })
    }

    /// Physical coordinate of level `k` over the given surface.
    ///
    /// `None` when `k` is out of range, the surface kind does not match the
    /// formula, or the levels live in a separate 3-D field.
    pub fn level_value(&self, k: usize, surface: Surface) -> Option<f64> {
        match (&self.kind, surface) {
            (VerticalTransformKind::AtmosphereSigma { ptop, sigma }, Surface::Pressure(ps)) => {
                sigma.get(k).map(|s| ptop + s * (ps - ptop))
            }
            (VerticalTransformKind::HybridSigmaPressure { a, b, p0 }, Surface::Pressure(ps)) => {
                Some(a.get(k)? * p0 + b.get(k)? * ps)
            }
            (VerticalTransformKind::OceanSigma { sigma }, Surface::Ocean { eta, depth }) => {
                sigma.get(k).map(|s| eta + (eta + depth) * s)
            }
            _ => None,
        }
    }
}

use std::ops::Index;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, RobustError};

/// Number of discrete alternatives available in every state.
pub const NUM_ALTERNATIVES: usize = 4;

/// Discrete alternatives of the occupational choice model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alternative {
    /// Working in the first occupation.
    OccupationA,
    /// Working in the second occupation.
    OccupationB,
    /// Attending school for one more year.
    Education,
    /// Staying at home.
    Home,
}

impl Alternative {
    /// All alternatives in canonical index order.
    pub const ALL: [Alternative; NUM_ALTERNATIVES] = [
        Alternative::OccupationA,
        Alternative::OccupationB,
        Alternative::Education,
        Alternative::Home,
    ];

    /// Returns the position of the alternative in reward and shock vectors.
    pub fn index(self) -> usize {
        match self {
            Alternative::OccupationA => 0,
            Alternative::OccupationB => 1,
            Alternative::Education => 2,
            Alternative::Home => 3,
        }
    }

    /// Whether the alternative pays a wage.
    pub fn is_occupation(self) -> bool {
        matches!(self, Alternative::OccupationA | Alternative::OccupationB)
    }
}

/// One realised shock per alternative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShockDraw(pub [f64; NUM_ALTERNATIVES]);

impl ShockDraw {
    /// Builds a draw from a raw row, rejecting rows of the wrong width.
    pub fn from_slice(values: &[f64]) -> Result<Self, RobustError> {
        let array: [f64; NUM_ALTERNATIVES] = values.try_into().map_err(|_| {
            RobustError::InvalidInput(
                ErrorInfo::new("draw_dimension", "shock draw has the wrong dimension")
                    .with_context("expected", NUM_ALTERNATIVES)
                    .with_context("actual", values.len()),
            )
        })?;
        Ok(Self(array))
    }

    /// Returns the raw shock values.
    pub fn values(&self) -> &[f64; NUM_ALTERNATIVES] {
        &self.0
    }
}

impl Index<Alternative> for ShockDraw {
    type Output = f64;

    fn index(&self, alternative: Alternative) -> &f64 {
        &self.0[alternative.index()]
    }
}

/// Ordered, read-only collection of shock draws used for Monte Carlo integration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DrawSet {
    draws: Vec<ShockDraw>,
}

impl DrawSet {
    /// Wraps already validated draws.
    pub fn new(draws: Vec<ShockDraw>) -> Self {
        Self { draws }
    }

    /// Builds a draw set from raw rows, validating each row's dimension.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, RobustError> {
        let draws = rows
            .iter()
            .enumerate()
            .map(|(row, values)| {
                ShockDraw::from_slice(values.as_ref()).map_err(|err| match err {
                    RobustError::InvalidInput(info) => {
                        RobustError::InvalidInput(info.with_context("row", row))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { draws })
    }

    /// Number of draws in the set.
    pub fn len(&self) -> usize {
        self.draws.len()
    }

    /// Whether the set holds no draws.
    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Iterates over the draws in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ShockDraw> {
        self.draws.iter()
    }

    /// Returns the draws as a slice.
    pub fn as_slice(&self) -> &[ShockDraw] {
        &self.draws
    }
}

impl FromIterator<ShockDraw> for DrawSet {
    fn from_iter<I: IntoIterator<Item = ShockDraw>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Deterministic reward component of every alternative at one state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SystematicRewards(pub [f64; NUM_ALTERNATIVES]);

impl SystematicRewards {
    /// Returns the raw reward values.
    pub fn values(&self) -> &[f64; NUM_ALTERNATIVES] {
        &self.0
    }

    /// Adds `delta` to every component.
    pub fn shifted(&self, delta: f64) -> Self {
        Self(self.0.map(|value| value + delta))
    }
}

impl Index<Alternative> for SystematicRewards {
    type Output = f64;

    fn index(&self, alternative: Alternative) -> &f64 {
        &self.0[alternative.index()]
    }
}

/// Initial and maximum level of schooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEducationBounds")]
pub struct EducationBounds {
    edu_start: u32,
    edu_max: u32,
}

#[derive(Deserialize)]
struct RawEducationBounds {
    edu_start: u32,
    edu_max: u32,
}

impl TryFrom<RawEducationBounds> for EducationBounds {
    type Error = RobustError;

    fn try_from(raw: RawEducationBounds) -> Result<Self, Self::Error> {
        Self::new(raw.edu_start, raw.edu_max)
    }
}

impl EducationBounds {
    /// Creates bounds, rejecting `edu_max < edu_start`.
    pub fn new(edu_start: u32, edu_max: u32) -> Result<Self, RobustError> {
        if edu_max < edu_start {
            return Err(RobustError::InvalidInput(
                ErrorInfo::new("education_bounds", "edu_max is below edu_start")
                    .with_context("edu_start", edu_start)
                    .with_context("edu_max", edu_max),
            ));
        }
        Ok(Self { edu_start, edu_max })
    }

    /// Years of schooling at the start of the model.
    pub fn edu_start(&self) -> u32 {
        self.edu_start
    }

    /// Maximum attainable years of schooling.
    pub fn edu_max(&self) -> u32 {
        self.edu_max
    }

    /// Whether one more year of schooling is possible from `edu` additional years.
    pub fn allows_increase(&self, edu: u32) -> bool {
        edu < self.edu_max.saturating_sub(self.edu_start)
    }
}

/// Multivariate normal distribution of shocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGaussian")]
pub struct GaussianDistribution {
    mean: DVector<f64>,
    covariance: DMatrix<f64>,
}

#[derive(Deserialize)]
struct RawGaussian {
    mean: DVector<f64>,
    covariance: DMatrix<f64>,
}

impl TryFrom<RawGaussian> for GaussianDistribution {
    type Error = RobustError;

    fn try_from(raw: RawGaussian) -> Result<Self, Self::Error> {
        Self::new(raw.mean, raw.covariance)
    }
}

impl GaussianDistribution {
    /// Creates a distribution after checking the shapes of its parameters.
    ///
    /// Positive definiteness is not checked here; consumers that invert the
    /// covariance report [`RobustError::Numerical`] instead.
    pub fn new(mean: DVector<f64>, covariance: DMatrix<f64>) -> Result<Self, RobustError> {
        let (rows, cols) = covariance.shape();
        if rows != cols || mean.len() != rows {
            return Err(RobustError::InvalidInput(
                ErrorInfo::new(
                    "gaussian_shape",
                    "mean length and covariance shape disagree",
                )
                .with_context("mean_len", mean.len())
                .with_context("cov_rows", rows)
                .with_context("cov_cols", cols),
            ));
        }
        if mean.iter().chain(covariance.iter()).any(|value| !value.is_finite()) {
            return Err(RobustError::invalid_input(
                "gaussian_non_finite",
                "distribution parameters must be finite",
            ));
        }
        Ok(Self { mean, covariance })
    }

    /// Builds a distribution from a mean slice and a row-major covariance slice.
    pub fn from_row_slices(mean: &[f64], covariance: &[f64]) -> Result<Self, RobustError> {
        let n = mean.len();
        if covariance.len() != n * n {
            return Err(RobustError::InvalidInput(
                ErrorInfo::new("gaussian_shape", "covariance entries do not form an n x n matrix")
                    .with_context("mean_len", n)
                    .with_context("cov_len", covariance.len()),
            ));
        }
        Self::new(
            DVector::from_column_slice(mean),
            DMatrix::from_row_slice(n, n, covariance),
        )
    }

    /// Zero-mean distribution with identity covariance.
    pub fn standard(dimension: usize) -> Self {
        Self {
            mean: DVector::zeros(dimension),
            covariance: DMatrix::identity(dimension, dimension),
        }
    }

    /// Dimension of the distribution.
    pub fn dimension(&self) -> usize {
        self.mean.len()
    }

    /// Mean vector.
    pub fn mean(&self) -> &DVector<f64> {
        &self.mean
    }

    /// Covariance matrix.
    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.covariance
    }

    /// Diagonal of the covariance matrix.
    pub fn variances(&self) -> Vec<f64> {
        self.covariance.diagonal().iter().copied().collect()
    }
}

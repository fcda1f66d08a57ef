//! Lookup tables owned by the backward-induction host.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, RobustError};

/// Discrete characteristics identifying a state within a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateCharacteristics {
    /// Years of experience in occupation A.
    pub exp_a: u32,
    /// Years of experience in occupation B.
    pub exp_b: u32,
    /// Years of schooling beyond `edu_start`.
    pub edu: u32,
    /// Whether the agent attended school in the previous period.
    pub edu_lagged: bool,
}

impl StateCharacteristics {
    /// Creates a characteristics tuple.
    pub fn new(exp_a: u32, exp_b: u32, edu: u32, edu_lagged: bool) -> Self {
        Self {
            exp_a,
            exp_b,
            edu,
            edu_lagged,
        }
    }
}

/// Dense indexing of states, period by period.
///
/// Equivalent to the pair `states_all` / `mapping_state_idx`: forward lookups
/// resolve characteristics to a state index and reverse lookups return the
/// characteristics stored at an index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "RawStateSpaceIndex")]
pub struct StateSpaceIndex {
    states: Vec<Vec<StateCharacteristics>>,
    #[serde(skip)]
    mapping: HashMap<(usize, StateCharacteristics), usize>,
}

#[derive(Deserialize)]
struct RawStateSpaceIndex {
    states: Vec<Vec<StateCharacteristics>>,
}

impl From<RawStateSpaceIndex> for StateSpaceIndex {
    fn from(raw: RawStateSpaceIndex) -> Self {
        let mapping = forward_mapping(&raw.states);
        Self {
            states: raw.states,
            mapping,
        }
    }
}

impl PartialEq for StateSpaceIndex {
    fn eq(&self, other: &Self) -> bool {
        self.states == other.states
    }
}

fn forward_mapping(
    states: &[Vec<StateCharacteristics>],
) -> HashMap<(usize, StateCharacteristics), usize> {
    states
        .iter()
        .enumerate()
        .flat_map(|(period, states)| {
            states
                .iter()
                .enumerate()
                .map(move |(index, chars)| ((period, *chars), index))
        })
        .collect()
}

impl StateSpaceIndex {
    /// Creates an empty index spanning `num_periods` periods.
    pub fn new(num_periods: usize) -> Self {
        Self {
            states: vec![Vec::new(); num_periods],
            mapping: HashMap::new(),
        }
    }

    /// Number of periods covered by the index.
    pub fn num_periods(&self) -> usize {
        self.states.len()
    }

    /// Number of states registered for `period`.
    pub fn num_states(&self, period: usize) -> usize {
        self.states.get(period).map_or(0, Vec::len)
    }

    /// Registers a state and returns its dense index. Re-inserting an existing
    /// state returns the index it already has.
    pub fn insert(
        &mut self,
        period: usize,
        chars: StateCharacteristics,
    ) -> Result<usize, RobustError> {
        let states = self.states.get_mut(period).ok_or_else(|| {
            RobustError::InvalidInput(
                ErrorInfo::new("period_out_of_range", "period exceeds the index horizon")
                    .with_context("period", period),
            )
        })?;
        if let Some(&index) = self.mapping.get(&(period, chars)) {
            return Ok(index);
        }
        let index = states.len();
        states.push(chars);
        self.mapping.insert((period, chars), index);
        Ok(index)
    }

    /// Resolves characteristics to a state index.
    pub fn lookup(&self, period: usize, chars: &StateCharacteristics) -> Result<usize, RobustError> {
        self.mapping.get(&(period, *chars)).copied().ok_or_else(|| {
            RobustError::Lookup(
                ErrorInfo::new("state_not_indexed", "state is not part of the state space")
                    .with_context("period", period)
                    .with_context("exp_a", chars.exp_a)
                    .with_context("exp_b", chars.exp_b)
                    .with_context("edu", chars.edu)
                    .with_context("edu_lagged", chars.edu_lagged),
            )
        })
    }

    /// Returns the characteristics stored at `(period, state_index)`.
    pub fn characteristics(
        &self,
        period: usize,
        state_index: usize,
    ) -> Result<StateCharacteristics, RobustError> {
        self.states
            .get(period)
            .and_then(|states| states.get(state_index))
            .copied()
            .ok_or_else(|| {
                RobustError::Lookup(
                    ErrorInfo::new("state_index_out_of_range", "no state at this index")
                        .with_context("period", period)
                        .with_context("state_index", state_index)
                        .with_context("num_states", self.num_states(period)),
                )
            })
    }
}

/// Read access to solved EMAX values of later periods.
pub trait ContinuationValues: Send + Sync {
    /// Number of periods in the model horizon.
    fn num_periods(&self) -> usize;

    /// EMAX of `state_index` in `period`.
    fn emax(&self, period: usize, state_index: usize) -> Result<f64, RobustError>;
}

/// Table of EMAX values indexed by `(period, state_index)`.
///
/// The host writes each period after solving it; the estimators only read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuationValueTable {
    periods: Vec<Vec<Option<f64>>>,
}

impl ContinuationValueTable {
    /// Creates an empty table for `num_periods` periods.
    pub fn new(num_periods: usize) -> Self {
        Self {
            periods: vec![Vec::new(); num_periods],
        }
    }

    /// Records the EMAX of one state.
    pub fn record(
        &mut self,
        period: usize,
        state_index: usize,
        value: f64,
    ) -> Result<(), RobustError> {
        let horizon = self.periods.len();
        let row = self.periods.get_mut(period).ok_or_else(|| {
            RobustError::InvalidInput(
                ErrorInfo::new("period_out_of_range", "period exceeds the table horizon")
                    .with_context("period", period)
                    .with_context("num_periods", horizon),
            )
        })?;
        if !value.is_finite() {
            return Err(RobustError::InvalidInput(
                ErrorInfo::new("emax_non_finite", "continuation values must be finite")
                    .with_context("period", period)
                    .with_context("state_index", state_index),
            ));
        }
        if row.len() <= state_index {
            row.resize(state_index + 1, None);
        }
        row[state_index] = Some(value);
        Ok(())
    }

}

impl ContinuationValues for ContinuationValueTable {
    fn num_periods(&self) -> usize {
        self.periods.len()
    }

    fn emax(&self, period: usize, state_index: usize) -> Result<f64, RobustError> {
        self.periods
            .get(period)
            .and_then(|row| row.get(state_index))
            .copied()
            .flatten()
            .ok_or_else(|| {
                RobustError::Lookup(
                    ErrorInfo::new("emax_missing", "continuation value has not been recorded")
                        .with_context("period", period)
                        .with_context("state_index", state_index)
                        .with_hint("solve later periods before earlier ones"),
                )
            })
    }
}

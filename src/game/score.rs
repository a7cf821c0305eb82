//! Per-team score

use std::collections::BTreeMap;

use serde::Serialize;

use super::body::Team;

/// Team → points, only ever changed through [`Score::increment`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Score(BTreeMap<Team, u32>);

impl Score {
    /// Every team at zero
    pub fn new() -> Self {
        Self(Team::ALL.iter().map(|team| (*team, 0)).collect())
    }

    pub fn increment(&mut self, team: Team) {
        *self.0.entry(team).or_insert(0) += 1;
    }

    pub fn get(&self, team: Team) -> u32 {
        self.0.get(&team).copied().unwrap_or(0)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Team, u32)> + '_ {
        self.0.iter().map(|(team, points)| (*team, *points))
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

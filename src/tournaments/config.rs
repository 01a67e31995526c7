use serde::{Deserialize, Serialize};

/// Tournament-wide settings which affect how rounds are drawn.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct TournamentConfig {
    pub prelim_rounds: u32,
    pub elim_rounds: u32,
    /// The number of judges we try to place on each panel. This should
    /// usually be odd so that panels can reach a majority decision.
    pub judges_per_debate: u32,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            prelim_rounds: 5,
            elim_rounds: 0,
            judges_per_debate: 3,
        }
    }
}

impl TournamentConfig {
    pub fn total_rounds(&self) -> u32 {
        self.prelim_rounds + self.elim_rounds
    }

    /// The panel size to use when `eligible` judges are available for a
    /// debate.
    ///
    /// We never exceed the target. When fewer judges are available an even
    /// panel is cut down by one, unless that even number is the configured
    /// target itself.
    pub fn panel_size(&self, eligible: usize) -> usize {
        let target = self.judges_per_debate as usize;
        let size = target.min(eligible);
        if size > 1 && size % 2 == 0 && size != target {
            size - 1
        } else {
            size
        }
    }
}

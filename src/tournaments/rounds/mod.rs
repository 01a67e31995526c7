use serde::{Deserialize, Serialize};

pub mod draws;
pub mod side_names;

/// The last round which is drawn using the fold method. Later rounds are
/// Swiss-paired.
///
/// todo: this does not consider how many preliminary rounds the tournament
/// actually has (should this be `TournamentConfig::prelim_rounds`?)
pub const LAST_FOLD_ROUND: u32 = 5;

#[derive(Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum RoundMethod {
    /// The first round: nobody has a record yet, so teams are split at
    /// random.
    RandomFold,
    Fold,
    Swiss,
}

impl RoundMethod {
    pub fn for_round(round_number: u32) -> Self {
        match round_number {
            0 | 1 => RoundMethod::RandomFold,
            n if n <= LAST_FOLD_ROUND => RoundMethod::Fold,
            _ => RoundMethod::Swiss,
        }
    }
}

impl std::fmt::Display for RoundMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RoundMethod::RandomFold => "random fold",
            RoundMethod::Fold => "fold",
            RoundMethod::Swiss => "swiss",
        })
    }
}

#[cfg(test)]
#[test]
fn test_method_thresholds() {
    assert_eq!(RoundMethod::for_round(0), RoundMethod::RandomFold);
    assert_eq!(RoundMethod::for_round(1), RoundMethod::RandomFold);
    assert_eq!(RoundMethod::for_round(2), RoundMethod::Fold);
    assert_eq!(RoundMethod::for_round(5), RoundMethod::Fold);
    assert_eq!(RoundMethod::for_round(6), RoundMethod::Swiss);
    assert_eq!(RoundMethod::for_round(11), RoundMethod::Swiss);
}

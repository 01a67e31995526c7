use std::fmt;

use itertools::Itertools;

use crate::tournaments::{
    rounds::{
        draws::{DrawSummary, PairingResult},
        side_names::name_of_side,
    },
    teams::Side,
};

pub mod drawalgs;
pub mod judges;
pub mod validate;

/// Renders a drawn round as a plain-text table.
pub struct DrawTable<'a> {
    pub pairings: &'a [PairingResult],
    /// Used to report dropped teams in the footer.
    pub available_teams: usize,
}

impl fmt::Display for DrawTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<20} {:<16} {:<16} {:>7}  {}",
            "Room",
            name_of_side(Side::Proposition, false),
            name_of_side(Side::Opposition, false),
            "Quality",
            "Judges"
        )?;

        for pairing in self.pairings {
            let judges = pairing
                .judges
                .iter()
                .map(|judge| {
                    if pairing.head_judge_id.as_ref() == Some(judge) {
                        format!("{judge} (c)")
                    } else {
                        judge.clone()
                    }
                })
                .join(", ");

            writeln!(
                f,
                "{:<20} {:<16} {:<16} {:>7.1}  {}",
                pairing.room,
                pairing.proposition_team_id.as_deref().unwrap_or("-"),
                pairing.opposition_team_id.as_deref().unwrap_or("-"),
                pairing.quality_score,
                judges
            )?;

            for conflict in &pairing.conflicts {
                writeln!(
                    f,
                    "    [{:?}] {}: {}",
                    conflict.severity, conflict.kind, conflict.description
                )?;
            }
        }

        let summary = DrawSummary::of(self.pairings, self.available_teams);
        write!(
            f,
            "{} debate(s), {} bye(s), {} dropped, {} error(s), {} warning(s), mean quality {:.1}",
            summary.debates,
            summary.byes,
            summary.dropped_teams,
            summary.errors,
            summary.warnings,
            summary.mean_quality
        )
    }
}

#[cfg(test)]
#[test]
fn test_draw_table_marks_chair() {
    let mut debate = PairingResult::debate("a", "b");
    debate.room = "Room 1".to_string();
    debate.judges = ["j1".to_string(), "j2".to_string()].into_iter().collect();
    debate.head_judge_id = Some("j2".to_string());
    let rendered = DrawTable {
        pairings: &[debate],
        available_teams: 2,
    }
    .to_string();

    assert!(rendered.contains("j1, j2 (c)"));
    assert!(rendered.contains("1 debate(s), 0 bye(s), 0 dropped"));
}

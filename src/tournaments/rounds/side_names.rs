use crate::tournaments::teams::Side;

pub fn name_of_side(side: Side, short: bool) -> &'static str {
    match (side, short) {
        (Side::Proposition, true) => "Prop",
        (Side::Proposition, false) => "Proposition",
        (Side::Opposition, true) => "Opp",
        (Side::Opposition, false) => "Opposition",
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(name_of_side(*self, false))
    }
}

#[cfg(test)]
#[test]
fn test_side_names() {
    assert_eq!(name_of_side(Side::Proposition, true), "Prop");
    assert_eq!(Side::Opposition.to_string(), "Opposition");
}

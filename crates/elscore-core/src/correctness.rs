//! Pairwise correctness predicates.
//!
//! B² is the classic B-Cubed notion: two mentions are a correct pair when
//! they are clustered together on both sides. B³ additionally requires the
//! pair to carry the same link on both sides, with every NIL placeholder
//! treated as one and the same identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::linking::IdentityMap;
use crate::mention::Mention;

/// True when both mentions map to the same raw kb-id.
pub fn in_same_set(a: &Mention, b: &Mention, index: &IdentityMap) -> bool {
    match (index.get(a), index.get(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// True when `system(a)`, `system(b)`, `gold(a)` and `gold(b)` are all equal
/// after NIL normalisation.
pub fn same_linking(a: &Mention, b: &Mention, system: &IdentityMap, gold: &IdentityMap) -> bool {
    let (Some(sys_a), Some(sys_b), Some(gold_a), Some(gold_b)) =
        (system.get(a), system.get(b), gold.get(a), gold.get(b))
    else {
        return false;
    };

    let link = sys_a.normalized();
    link == sys_b.normalized() && link == gold_a.normalized() && link == gold_b.normalized()
}

/// The correctness predicate plugged into the aggregator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Co-clustering on both sides (classic B-Cubed).
    B2,
    /// Co-clustering on both sides and the same link.
    #[default]
    B3,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::B2, Metric::B3];

    pub fn is_correct(
        self,
        a: &Mention,
        b: &Mention,
        system: &IdentityMap,
        gold: &IdentityMap,
    ) -> bool {
        let co_clustered = in_same_set(a, b, system) && in_same_set(a, b, gold);
        match self {
            Self::B2 => co_clustered,
            Self::B3 => co_clustered && same_linking(a, b, system, gold),
        }
    }

    /// Column label used in ranking tables.
    pub fn label(self) -> &'static str {
        match self {
            Self::B2 => "B^2",
            Self::B3 => "B^3",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "b2" | "b^2" => Ok(Self::B2),
            "b3" | "b^3" => Ok(Self::B3),
            _ => Err(format!("invalid metric: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linking::Clustering;

    fn index(pairs: &[(&str, &str)]) -> IdentityMap {
        let clustering: Clustering = pairs.iter().copied().collect();
        IdentityMap::from_clustering("test", &clustering).unwrap()
    }

    fn m(id: &str) -> Mention {
        Mention::new(id)
    }

    #[test]
    fn test_in_same_set_is_reflexive() {
        let map = index(&[("D1", "KB1"), ("D2", "KB2")]);
        assert!(in_same_set(&m("D1"), &m("D1"), &map));
        assert!(!in_same_set(&m("D1"), &m("D2"), &map));
    }

    #[test]
    fn test_in_same_set_uses_raw_ids() {
        let map = index(&[("D1", "NIL001"), ("D2", "NIL002")]);
        assert!(!in_same_set(&m("D1"), &m("D2"), &map));
    }

    #[test]
    fn test_in_same_set_unknown_mention() {
        let map = index(&[("D1", "KB1")]);
        assert!(!in_same_set(&m("D1"), &m("D9"), &map));
        assert!(!in_same_set(&m("D9"), &m("D9"), &map));
    }

    #[test]
    fn test_same_linking_nil_suffixes_ignored() {
        let system = index(&[("D1", "NIL002"), ("D2", "NIL017")]);
        let gold = index(&[("D1", "NIL001"), ("D2", "NIL001")]);
        assert!(same_linking(&m("D1"), &m("D2"), &system, &gold));
        assert!(same_linking(&m("D2"), &m("D1"), &system, &gold));
    }

    #[test]
    fn test_same_linking_reflexive_can_fail() {
        let system = index(&[("D1", "KB1")]);
        let gold = index(&[("D1", "KB2")]);
        assert!(!same_linking(&m("D1"), &m("D1"), &system, &gold));

        let gold = index(&[("D1", "KB1")]);
        assert!(same_linking(&m("D1"), &m("D1"), &system, &gold));
    }

    #[test]
    fn test_same_linking_nil_vs_real() {
        let system = index(&[("D1", "NIL001")]);
        let gold = index(&[("D1", "KB1")]);
        assert!(!same_linking(&m("D1"), &m("D1"), &system, &gold));
    }

    #[test]
    fn test_b3_implies_b2_but_not_conversely() {
        // Clustered together on both sides, but under different real entities.
        let system = index(&[("D1", "KB1"), ("D2", "KB1")]);
        let gold = index(&[("D1", "KB2"), ("D2", "KB2")]);

        assert!(Metric::B2.is_correct(&m("D1"), &m("D2"), &system, &gold));
        assert!(!Metric::B3.is_correct(&m("D1"), &m("D2"), &system, &gold));

        let gold = index(&[("D1", "KB1"), ("D2", "KB1")]);
        assert!(Metric::B3.is_correct(&m("D1"), &m("D2"), &system, &gold));
        assert!(Metric::B2.is_correct(&m("D1"), &m("D2"), &system, &gold));
    }

    #[test]
    fn test_b2_requires_gold_co_clustering() {
        let system = index(&[("D2", "NIL002"), ("D3", "NIL002")]);
        let gold = index(&[("D2", "KB007"), ("D3", "NIL001")]);
        assert!(!Metric::B2.is_correct(&m("D2"), &m("D3"), &system, &gold));
        assert!(!Metric::B3.is_correct(&m("D2"), &m("D3"), &system, &gold));
    }

    #[test]
    fn test_metric_parse_and_display() {
        assert_eq!("b3".parse::<Metric>().unwrap(), Metric::B3);
        assert_eq!("B^2".parse::<Metric>().unwrap(), Metric::B2);
        assert!("ceaf".parse::<Metric>().is_err());
        assert_eq!(Metric::B3.to_string(), "B^3");
        assert_eq!(Metric::default(), Metric::B3);
    }
}

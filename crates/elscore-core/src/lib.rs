pub mod correctness;
pub mod coverage;
pub mod error;
pub mod linking;
pub mod mention;
pub mod ranking;
pub mod score;
pub mod source;

pub use correctness::{in_same_set, same_linking, Metric};
pub use coverage::{check_coverage, check_focus, Coverage, CoverageMismatch};
pub use error::{ScoreError, ScoreResult};
pub use linking::{parse_clustering, Clustering, IdentityMap, Linking, ParseOptions};
pub use mention::{KbId, Mention, NIL_PREFIX};
pub use ranking::{evaluate_system, rank_systems, RankingRow, RankingSummary};
pub use score::{
    accuracy, element_precisions, focused_precision, focused_recall, focused_score, micro_f1,
    precision, recall, score, Evaluation, Scores,
};
pub use source::SystemSource;

use std::path::PathBuf;

use thiserror::Error;

use crate::mention::{KbId, Mention};

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("{origin}:{line}: expected `<mention> <kb-id>`, found {content:?}")]
    MalformedLine {
        origin: String,
        line: usize,
        content: String,
    },

    #[error("{origin}: mention {mention} is linked to both {first} and {second}")]
    AmbiguousMention {
        origin: String,
        mention: Mention,
        first: KbId,
        second: KbId,
    },

    #[error("{origin}: no mentions to score, precision and recall are undefined")]
    EmptyCorpus { origin: String },

    #[error("{origin}: focus mentions missing from the gold standard ({})", join_mentions(missing))]
    FocusOutsideGold {
        origin: String,
        missing: Vec<Mention>,
    },

    #[error("mention {0} is not in the identity map")]
    UnknownMention(Mention),

    #[error("unknown system output: {0}")]
    UnknownSystem(String),

    #[error("{}: not valid UTF-8 after byte {valid_up_to}", path.display())]
    InvalidEncoding { path: PathBuf, valid_up_to: usize },

    #[error("cannot read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn join_mentions(mentions: &[Mention]) -> String {
    mentions
        .iter()
        .map(Mention::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type ScoreResult<T> = Result<T, ScoreError>;

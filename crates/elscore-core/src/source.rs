use crate::error::ScoreResult;
use crate::linking::Linking;

/// A collection of system outputs to rank against one gold standard.
pub trait SystemSource {
    /// Names of the available system outputs, in enumeration order.
    fn system_names(&self) -> ScoreResult<Vec<String>>;

    /// Parse one system output. The returned linking is named `name`.
    fn load_system(&self, name: &str) -> ScoreResult<Linking>;
}

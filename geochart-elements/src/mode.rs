use serde::Deserialize;
use strum::{Display, EnumString};

/// Why an update pass runs
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Display, EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum UpdateMode {
    #[default]
    Default,
    /// Elements return to their initial state, e.g. zero radius markers
    Reset,
    /// Only the chart size changed
    Resize,
    /// Hover state changed
    Active,
}

impl UpdateMode {
    /// Modes after which cached pixel geometry can no longer be trusted
    pub fn invalidates_geometry(&self) -> bool {
        matches!(self, UpdateMode::Reset | UpdateMode::Resize)
    }
}

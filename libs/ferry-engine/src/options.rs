use std::fmt;
use std::str::FromStr;

use ferry_api::config::{ConfigParam, ConfigValues, ParamType};
use ferry_api::ConvertError;

/// What to do when several union branches match a value equally well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnionResolution {
    /// Fail with `AmbiguousUnionBranch`.
    #[default]
    Strict,
    /// Take the first matching branch in declaration order.
    FirstMatch,
}

impl FromStr for UnionResolution {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(UnionResolution::Strict),
            "first-match" => Ok(UnionResolution::FirstMatch),
            other => Err(ConvertError::Config(format!(
                "{UNION_RESOLUTION}: expected 'strict' or 'first-match', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for UnionResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnionResolution::Strict => f.write_str("strict"),
            UnionResolution::FirstMatch => f.write_str("first-match"),
        }
    }
}

/// Setting key for [`UnionResolution`].
pub const UNION_RESOLUTION: &str = "union.resolution";

static PARAMS: &[ConfigParam] = &[ConfigParam {
    name: UNION_RESOLUTION,
    param_type: ParamType::Str,
    required: false,
    default: Some("strict"),
    description: "tie-break between equally matching union branches: strict | first-match",
}];

/// Dispatcher behaviour knobs. The default is what every converter uses
/// when constructed without settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    pub union_resolution: UnionResolution,
}

impl Options {
    pub fn params() -> &'static [ConfigParam] {
        PARAMS
    }

    pub fn from_config(config: Option<&ConfigValues>) -> Result<Self, ConvertError> {
        let Some(config) = config else {
            return Ok(Self::default());
        };
        config.validate(PARAMS)?;
        let union_resolution = match config.get_str(UNION_RESOLUTION) {
            Some(raw) => raw.parse()?,
            None => UnionResolution::default(),
        };
        Ok(Self { union_resolution })
    }
}

use core::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ParseNameError;

/// How fast a host should call [step](crate::SearchEngine::step). The engine itself never waits;
/// this only tells the scheduler how long a tick is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SearchSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

const SLOW_TICK_MS: u64 = 250;
const NORMAL_TICK_MS: u64 = 80;
const FAST_TICK_MS: u64 = 15;

impl SearchSpeed {
    pub const ALL: [SearchSpeed; 3] = [SearchSpeed::Slow, SearchSpeed::Normal, SearchSpeed::Fast];

    pub fn tick_interval(self) -> Duration {
        Duration::from_millis(match self {
            SearchSpeed::Slow => SLOW_TICK_MS,
            SearchSpeed::Normal => NORMAL_TICK_MS,
            SearchSpeed::Fast => FAST_TICK_MS,
        })
    }
}

impl fmt::Display for SearchSpeed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            SearchSpeed::Slow => "slow",
            SearchSpeed::Normal => "normal",
            SearchSpeed::Fast => "fast",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SearchSpeed {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchSpeed::ALL
            .into_iter()
            .find(|speed| speed.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseNameError::UnknownSpeed(s.to_owned()))
    }
}

use std::fmt;
use std::str::FromStr;

/// Supported target games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Game {
    Echoes,
}

impl Game {
    /// Directory-friendly name, used for the generated output path.
    pub fn slug(self) -> &'static str {
        match self {
            Game::Echoes => "echoes",
        }
    }
}

impl FromStr for Game {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "echoes" => Ok(Game::Echoes),
            other => Err(format!("unsupported game {other:?} (valid: \"echoes\")")),
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

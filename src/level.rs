use crate::error::Error;
use std::str::FromStr;

/// An immutable difficulty preset: board shape plus mine count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GameLevel {
    pub(crate) name: &'static str,
    pub(crate) rows: usize,
    pub(crate) columns: usize,
    pub(crate) mines: usize,
}

impl GameLevel {
    pub(crate) const fn easy() -> Self {
        Self {
            name: "Easy",
            rows: 9,
            columns: 16,
            mines: 16,
        }
    }

    pub(crate) const fn normal() -> Self {
        Self {
            name: "Normal",
            rows: 9,
            columns: 16,
            mines: 22,
        }
    }

    pub(crate) const fn hard() -> Self {
        Self {
            name: "Hard",
            rows: 9,
            columns: 16,
            mines: 28,
        }
    }

    /// A user-supplied board shape. The presets satisfy the mine-count
    /// invariant by construction; anything else is validated here, before a
    /// board ever exists.
    pub(crate) fn custom(rows: usize, columns: usize, mines: usize) -> Result<Self, Error> {
        if rows == 0 || columns == 0 {
            return Err(Error::EmptyBoard { rows, columns });
        }
        if mines == 0 || mines >= rows * columns {
            return Err(Error::TooManyMines {
                rows,
                columns,
                mines,
            });
        }
        Ok(Self {
            name: "Custom",
            rows,
            columns,
            mines,
        })
    }
}

impl Default for GameLevel {
    fn default() -> Self {
        Self::normal()
    }
}

impl FromStr for GameLevel {
    type Err = std::convert::Infallible;

    // Unrecognized names fall back to Normal rather than being rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "easy" => Self::easy(),
            "hard" => Self::hard(),
            _ => Self::normal(),
        })
    }
}

use crate::sweep::Coordinate;

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("no cell at coordinate {0:?}")]
    GetCell(Coordinate),
    #[error("board dimensions must be positive, got {rows}x{columns}")]
    EmptyBoard { rows: usize, columns: usize },
    #[error("{mines} mines do not fit on a {rows}x{columns} board")]
    TooManyMines {
        rows: usize,
        columns: usize,
        mines: usize,
    },
    #[error("unable to convert {0} to a terminal dimension")]
    Cast(usize),
}

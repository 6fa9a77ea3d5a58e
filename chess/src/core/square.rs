use super::types::Colour;
use thiserror::Error;

/******************************************\
|==========================================|
|                 Squares                  |
|==========================================|
\******************************************/

/// # Square representation
///
/// - Represents the squares of a chess board, A1 = 0 up to H8 = 63

#[rustfmt::skip]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// Number of elements in the Square enum
    pub const NUM: usize = 64;
}

crate::impl_from_to_primitive!(Square);
crate::impl_enum_iter!(Square);

/******************************************\
|==========================================|
|                  Ranks                   |
|==========================================|
\******************************************/

/// # Ranks representation
///
/// - Represents the ranks of a chess board

#[rustfmt::skip]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord)]
pub enum Rank {
    Rank1, Rank2, Rank3, Rank4, Rank5, Rank6, Rank7, Rank8,
}

impl Rank {
    /// Number of elements in the Rank enum
    pub const NUM: usize = 8;
}

crate::impl_from_to_primitive!(Rank);
crate::impl_enum_iter!(Rank);

/******************************************\
|==========================================|
|                  Files                   |
|==========================================|
\******************************************/

/// # Files representation
///
/// - Represents the files of a chess board

#[rustfmt::skip]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord)]
pub enum File {
    FileA, FileB, FileC, FileD, FileE, FileF, FileG, FileH,
}

impl File {
    /// Number of elements in the File enum
    pub const NUM: usize = 8;
}

crate::impl_from_to_primitive!(File);
crate::impl_enum_iter!(File);

/******************************************\
|==========================================|
|              Implementation              |
|==========================================|
\******************************************/

impl Square {
    /// Returns the rank of a square
    ///
    /// ## Examples
    ///
    /// ```
    /// use chess::core::{Square, Rank};
    ///
    /// assert_eq!(Square::A1.rank(), Rank::Rank1);
    /// assert_eq!(Square::E4.rank(), Rank::Rank4);
    /// assert_eq!(Square::H8.rank(), Rank::Rank8);
    /// ```
    pub const fn rank(&self) -> Rank {
        Rank::from_unchecked((*self as u8) >> 3)
    }

    /// Returns the file of a square
    ///
    /// ## Examples
    ///
    /// ```
    /// use chess::core::{Square, File};
    ///
    /// assert_eq!(Square::A1.file(), File::FileA);
    /// assert_eq!(Square::E4.file(), File::FileE);
    /// assert_eq!(Square::H8.file(), File::FileH);
    /// ```
    pub const fn file(&self) -> File {
        File::from_unchecked((*self as u8) & 0b111)
    }

    /// Flips the rank of a square along the middle of the board
    pub const fn flip_rank(&self) -> Self {
        Self::from_unchecked((*self as u8) ^ Square::A8 as u8)
    }

    /// Returns the square from the perspective of `col`
    ///
    /// For White the square is unchanged, for Black the rank is flipped.
    ///
    /// ## Examples
    ///
    /// ```
    /// use chess::core::{Square, Colour};
    ///
    /// assert_eq!(Square::E2.relative(Colour::White), Square::E2);
    /// assert_eq!(Square::E2.relative(Colour::Black), Square::E7);
    /// ```
    pub const fn relative(&self, col: Colour) -> Self {
        match col {
            Colour::White => *self,
            Colour::Black => self.flip_rank(),
        }
    }

    /// Returns the absolute rank distance between two squares
    pub const fn rank_dist(sq1: Square, sq2: Square) -> u8 {
        (sq1.rank() as u8).abs_diff(sq2.rank() as u8)
    }

    /// Returns the absolute file distance between two squares
    pub const fn file_dist(sq1: Square, sq2: Square) -> u8 {
        (sq1.file() as u8).abs_diff(sq2.file() as u8)
    }

    /// Combines a file and rank pair into a square
    ///
    /// ## Examples
    ///
    /// ```
    /// use chess::core::{Square, File, Rank};
    ///
    /// assert_eq!(Square::from_parts(File::FileA, Rank::Rank1), Square::A1);
    /// assert_eq!(Square::from_parts(File::FileH, Rank::Rank8), Square::H8);
    /// ```
    pub const fn from_parts(file: File, rank: Rank) -> Self {
        Self::from_unchecked(((rank as u8) << 3) + (file as u8))
    }
}

impl Rank {
    /// Flips the rank along the middle of the board
    pub const fn flip(&self) -> Self {
        Self::from_unchecked(7 - (*self as u8))
    }

    /// Returns the rank from the perspective of `col`
    pub const fn relative(&self, col: Colour) -> Self {
        match col {
            Colour::White => *self,
            Colour::Black => self.flip(),
        }
    }
}

/******************************************\
|==========================================|
|                 Display                  |
|==========================================|
\******************************************/

impl std::fmt::Display for File {
    /// Displays the file in its board representation (FileA => 'a')
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", (b'a' + (*self as u8)) as char)
    }
}

impl std::fmt::Display for Rank {
    /// Displays the rank in its board representation (Rank1 => '1')
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", (b'1' + (*self as u8)) as char)
    }
}

impl std::fmt::Display for Square {
    /// Displays the square in its board representation (Square::A1 => "a1")
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/******************************************\
|==========================================|
|              Parsing Strings             |
|==========================================|
\******************************************/

impl std::str::FromStr for File {
    type Err = ParseFileError;

    /// Parses a file string into a file, with error checking
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 1 {
            return Err(ParseFileError::InvalidLength(s.len()));
        }

        let file_char = s.chars().next().unwrap();
        match file_char {
            'a'..='h' => Ok(File::from_unchecked(file_char as u8 - b'a')),
            _ => Err(ParseFileError::InvalidChar(file_char)),
        }
    }
}

impl std::str::FromStr for Rank {
    type Err = ParseRankError;

    /// Parses a rank string into a rank, with error checking
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 1 {
            return Err(ParseRankError::InvalidLength(s.len()));
        }

        let rank_char = s.chars().next().unwrap();
        match rank_char {
            '1'..='8' => Ok(Rank::from_unchecked(rank_char as u8 - b'1')),
            _ => Err(ParseRankError::InvalidChar(rank_char)),
        }
    }
}

impl std::str::FromStr for Square {
    type Err = ParseSquareError;

    /// Parses a square string into a square, with error checking
    ///
    /// ## Examples
    ///
    /// ```
    /// use chess::core::{Square, ParseSquareError};
    /// use std::str::FromStr;
    ///
    /// assert_eq!(Square::from_str("a1").unwrap(), Square::A1);
    /// assert_eq!("h8".parse::<Square>().unwrap(), Square::H8);
    /// assert!(matches!("e9".parse::<Square>(), Err(ParseSquareError::InvalidRankChar('9'))));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 2 {
            return Err(ParseSquareError::InvalidLength(s.len()));
        }

        let mut chars = s.chars();
        let file_char = chars.next().unwrap();
        let rank_char = chars.next().unwrap();

        let file = file_char
            .to_string()
            .parse::<File>()
            .map_err(|_| ParseSquareError::InvalidFileChar(file_char))?;
        let rank = rank_char
            .to_string()
            .parse::<Rank>()
            .map_err(|_| ParseSquareError::InvalidRankChar(rank_char))?;

        Ok(Square::from_parts(file, rank))
    }
}

/******************************************\
|==========================================|
|            Square Parse Errors           |
|==========================================|
\******************************************/

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFileError {
    #[error("Invalid length for file string: {0}, expected 1")]
    InvalidLength(usize),
    #[error("Invalid character for file string: '{0}', expected 'a'-'h'")]
    InvalidChar(char),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseRankError {
    #[error("Invalid length for rank string: {0}, expected 1")]
    InvalidLength(usize),
    #[error("Invalid character for rank string: '{0}', expected '1'-'8'")]
    InvalidChar(char),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseSquareError {
    #[error("Invalid length for square string: {0}, expected 2")]
    InvalidLength(usize),
    #[error("Invalid character for file string: '{0}', expected 'a'-'h'")]
    InvalidFileChar(char),
    #[error("Invalid character for rank string: '{0}', expected '1'-'8'")]
    InvalidRankChar(char),
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/

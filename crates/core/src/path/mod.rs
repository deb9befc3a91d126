//! A compact, morphable representation of SVG path data.
//!
//! [`PathData`] keeps the commands exactly as they were written (relative
//! commands stay relative, arcs stay arcs) so that two paths drawn with the
//! same command structure can be interpolated parameter by parameter. Use
//! [`PathData::flatten`] to get absolute geometry out of it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

pub mod flatten;
pub mod measure;
mod parser;

pub use flatten::{build_path, flatten, to_lyon_path, Segment};
pub use measure::PathMeasure;
pub use parser::parse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    MoveAbs,
    MoveRel,
    LineAbs,
    LineRel,
    HLineAbs,
    HLineRel,
    VLineAbs,
    VLineRel,
    CubicAbs,
    CubicRel,
    SmoothCubicAbs,
    SmoothCubicRel,
    QuadAbs,
    QuadRel,
    SmoothQuadAbs,
    SmoothQuadRel,
    ArcAbs,
    ArcRel,
    Close,
}

impl CommandKind {
    /// Maps an SVG command letter to its kind. Both `z` and `Z` close the
    /// current sub-path.
    pub fn from_letter(letter: char) -> Option<CommandKind> {
        use CommandKind::*;
        let kind = match letter {
            'M' => MoveAbs,
            'm' => MoveRel,
            'L' => LineAbs,
            'l' => LineRel,
            'H' => HLineAbs,
            'h' => HLineRel,
            'V' => VLineAbs,
            'v' => VLineRel,
            'C' => CubicAbs,
            'c' => CubicRel,
            'S' => SmoothCubicAbs,
            's' => SmoothCubicRel,
            'Q' => QuadAbs,
            'q' => QuadRel,
            'T' => SmoothQuadAbs,
            't' => SmoothQuadRel,
            'A' => ArcAbs,
            'a' => ArcRel,
            'Z' | 'z' => Close,
            _ => return None,
        };
        Some(kind)
    }

    pub fn letter(self) -> char {
        use CommandKind::*;
        match self {
            MoveAbs => 'M',
            MoveRel => 'm',
            LineAbs => 'L',
            LineRel => 'l',
            HLineAbs => 'H',
            HLineRel => 'h',
            VLineAbs => 'V',
            VLineRel => 'v',
            CubicAbs => 'C',
            CubicRel => 'c',
            SmoothCubicAbs => 'S',
            SmoothCubicRel => 's',
            QuadAbs => 'Q',
            QuadRel => 'q',
            SmoothQuadAbs => 'T',
            SmoothQuadRel => 't',
            ArcAbs => 'A',
            ArcRel => 'a',
            Close => 'Z',
        }
    }

    /// Number of parameters a single command of this kind carries.
    pub fn arity(self) -> usize {
        use CommandKind::*;
        match self {
            Close => 0,
            HLineAbs | HLineRel | VLineAbs | VLineRel => 1,
            MoveAbs | MoveRel | LineAbs | LineRel | SmoothQuadAbs | SmoothQuadRel => 2,
            QuadAbs | QuadRel | SmoothCubicAbs | SmoothCubicRel => 4,
            CubicAbs | CubicRel => 6,
            ArcAbs | ArcRel => 7,
        }
    }

    pub fn is_relative(self) -> bool {
        self != CommandKind::Close && self.letter().is_ascii_lowercase()
    }

    pub(crate) fn is_cubic(self) -> bool {
        use CommandKind::*;
        matches!(self, CubicAbs | CubicRel | SmoothCubicAbs | SmoothCubicRel)
    }

    pub(crate) fn is_quad(self) -> bool {
        use CommandKind::*;
        matches!(self, QuadAbs | QuadRel | SmoothQuadAbs | SmoothQuadRel)
    }
}

/// One command of a path: a kind and exactly `kind.arity()` parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCommand {
    kind: CommandKind,
    params: Vec<f32>,
}

impl PathCommand {
    pub fn new(kind: CommandKind, params: Vec<f32>) -> Result<Self, Error> {
        if params.len() != kind.arity() {
            return Err(Error::ShapeMismatch(format!(
                "'{}' takes {} parameters, got {}",
                kind.letter(),
                kind.arity(),
                params.len()
            )));
        }
        Ok(PathCommand { kind, params })
    }

    pub fn close() -> Self {
        PathCommand {
            kind: CommandKind::Close,
            params: vec![],
        }
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn params(&self) -> &[f32] {
        &self.params
    }

    fn can_morph_with(&self, other: &PathCommand) -> bool {
        self.kind == other.kind && self.params.len() == other.params.len()
    }
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.letter())?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", p)?;
        }
        Ok(())
    }
}

/// An ordered sequence of [`PathCommand`]s.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PathData {
    commands: Vec<PathCommand>,
}

impl PathData {
    pub fn new(commands: Vec<PathCommand>) -> Self {
        PathData { commands }
    }

    pub fn parse(text: &str) -> Result<Self, Error> {
        parser::parse(text)
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Two paths can be morphed into each other iff they have the same
    /// number of commands and each pair of commands agrees on kind and
    /// parameter count.
    pub fn can_morph_with(&self, other: &PathData) -> bool {
        self.commands.len() == other.commands.len()
            && self
                .commands
                .iter()
                .zip(other.commands.iter())
                .all(|(a, b)| a.can_morph_with(b))
    }

    /// Overwrites every parameter of `self` with
    /// `from * (1 - fraction) + to * fraction`. Both operands must be
    /// morph-compatible with `self`; nothing is written otherwise.
    pub fn interpolate(&mut self, from: &PathData, to: &PathData, fraction: f32) -> Result<(), Error> {
        if !self.can_morph_with(from) || !self.can_morph_with(to) {
            return Err(Error::ShapeMismatch(
                "can't interpolate between two incompatible paths".to_string(),
            ));
        }
        for ((out, from), to) in self
            .commands
            .iter_mut()
            .zip(from.commands.iter())
            .zip(to.commands.iter())
        {
            for ((p, a), b) in out
                .params
                .iter_mut()
                .zip(from.params.iter())
                .zip(to.params.iter())
            {
                *p = a * (1.0 - fraction) + b * fraction;
            }
        }
        Ok(())
    }

    /// Absolute move/line/cubic/close segments for this path.
    pub fn flatten(&self) -> Vec<Segment> {
        flatten::flatten(self)
    }
}

impl FromStr for PathData {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse(s)
    }
}

impl TryFrom<String> for PathData {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parser::parse(&value)
    }
}

impl From<PathData> for String {
    fn from(path: PathData) -> Self {
        path.to_string()
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", command)?;
        }
        Ok(())
    }
}

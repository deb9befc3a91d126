use log::debug;

use super::{CommandKind, PathCommand, PathData};
use crate::Error;

/// Parses an SVG path-data string.
///
/// A command letter may be followed by any number of parameter groups;
/// each extra group becomes another command of the same kind, except that
/// extra groups after a moveto become linetos. Numbers may be separated by
/// whitespace, commas, or simply by the start of the next number
/// (`"1-2"`, `"1.2.3"`).
pub fn parse(text: &str) -> Result<PathData, Error> {
    let bytes = text.as_bytes();
    let mut commands = vec![];

    let mut start = match next_command(bytes, 0) {
        Some(start) => start,
        None if text.trim().is_empty() => return Ok(PathData::default()),
        None => return Err(Error::malformed(text, "missing command letter")),
    };
    if !text[..start].trim().is_empty() {
        return Err(Error::malformed(text, "parameters before the first command"));
    }

    while start < bytes.len() {
        let end = next_command(bytes, start + 1).unwrap_or(bytes.len());
        let letter = bytes[start] as char;
        let kind = CommandKind::from_letter(letter)
            .ok_or_else(|| Error::malformed(text, format!("unknown command '{}'", letter)))?;
        let params = numbers(text, &text[start + 1..end])?;
        push_commands(text, &mut commands, kind, params)?;
        start = end;
    }

    Ok(PathData::new(commands))
}

/// Finds the next command letter. `e` and `E` belong to exponents and are
/// never commands.
fn next_command(bytes: &[u8], from: usize) -> Option<usize> {
    bytes
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, b)| b.is_ascii_alphabetic() && **b != b'e' && **b != b'E')
        .map(|(i, _)| i)
}

fn push_commands(
    text: &str,
    commands: &mut Vec<PathCommand>,
    kind: CommandKind,
    params: Vec<f32>,
) -> Result<(), Error> {
    let arity = kind.arity();
    if arity == 0 {
        if !params.is_empty() {
            return Err(Error::malformed(text, "close takes no parameters"));
        }
        commands.push(PathCommand::close());
        return Ok(());
    }
    if params.is_empty() {
        debug!("dropping '{}' with no parameters", kind.letter());
        return Ok(());
    }
    if params.len() % arity != 0 {
        return Err(Error::malformed(
            text,
            format!(
                "'{}' expects groups of {} parameters, got {}",
                kind.letter(),
                arity,
                params.len()
            ),
        ));
    }
    for (i, group) in params.chunks(arity).enumerate() {
        let kind = match (kind, i) {
            (CommandKind::MoveAbs, i) if i > 0 => CommandKind::LineAbs,
            (CommandKind::MoveRel, i) if i > 0 => CommandKind::LineRel,
            (kind, _) => kind,
        };
        commands.push(PathCommand::new(kind, group.to_vec())?);
    }
    Ok(())
}

fn numbers(text: &str, chunk: &str) -> Result<Vec<f32>, Error> {
    let bytes = chunk.as_bytes();
    let mut result = vec![];
    let mut start = 0;
    while start < bytes.len() {
        let (end, keeps_separator) = extract(bytes, start);
        if start < end {
            let token = &chunk[start..end];
            let value = token
                .parse::<f32>()
                .map_err(|_| Error::malformed(text, format!("invalid number {:?}", token)))?;
            result.push(value);
        }
        // A sign or a second dot starts the next number, so it is not skipped.
        start = if keeps_separator { end } else { end + 1 };
    }
    Ok(result)
}

/// Returns the end of the number starting at `start` and whether the
/// character at that end belongs to the following number.
fn extract(bytes: &[u8], start: usize) -> (usize, bool) {
    let mut index = start;
    let mut seen_dot = false;
    let mut prev_exponent = false;
    while index < bytes.len() {
        let c = bytes[index];
        let after_exponent = prev_exponent;
        prev_exponent = false;
        match c {
            b',' => return (index, false),
            c if c.is_ascii_whitespace() => return (index, false),
            b'-' | b'+' if index != start && !after_exponent => return (index, true),
            b'.' if seen_dot => return (index, true),
            b'.' => seen_dot = true,
            b'e' | b'E' => prev_exponent = true,
            _ => {}
        }
        index += 1;
    }
    (index, false)
}

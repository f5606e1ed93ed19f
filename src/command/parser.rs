//! nom building blocks for information text `serde_at` can't express:
//! vendor tags (`^`, `%`), range lists, groups and multi-line listings.

use atat::nom::{
    branch::alt,
    bytes::complete::{tag, take_till},
    character::complete::{char, space0, u32 as uint},
    combinator::{map, opt},
    error::{Error as NomError, ErrorKind},
    sequence::{delimited, preceded, separated_pair, terminated, tuple},
    Err as NomErr, IResult,
};
use heapless::Vec;

fn too_large<T>(i: &[u8]) -> IResult<&[u8], T> {
    Err(NomErr::Error(NomError::new(i, ErrorKind::TooLarge)))
}

/// `tag` followed by optional spaces, e.g. `^SPIC: `.
pub fn tagged<'a>(name: &'static str) -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], &'a [u8]> {
    move |i| preceded(space0, terminated(tag(name), space0))(i)
}

pub fn comma(i: &[u8]) -> IResult<&[u8], char> {
    delimited(space0, char(','), space0)(i)
}

/// Unsigned integer, quoted or not.
pub fn number(i: &[u8]) -> IResult<&[u8], u32> {
    preceded(space0, alt((delimited(char('"'), uint, char('"')), uint)))(i)
}

/// One comma separated field with its quotes removed. Bare fields run
/// until the next comma or line end.
pub fn field(i: &[u8]) -> IResult<&[u8], &[u8]> {
    preceded(
        space0,
        alt((
            delimited(char('"'), take_till(|c| c == b'"'), char('"')),
            take_till(|c| c == b',' || c == b'\r' || c == b'\n'),
        )),
    )(i)
}

/// Every field up to the end of the line.
pub fn fields<const N: usize>(mut i: &[u8]) -> IResult<&[u8], Vec<&[u8], N>> {
    let mut out = Vec::new();
    loop {
        let (rest, value) = field(i)?;
        if out.push(value).is_err() {
            return too_large(i);
        }
        match comma(rest) {
            Ok((rest, _)) => i = rest,
            Err(_) => return Ok((rest, out)),
        }
    }
}

fn bare_range(i: &[u8]) -> IResult<&[u8], (u32, u32)> {
    alt((
        separated_pair(uint, char('-'), uint),
        map(uint, |v| (v, v)),
    ))(i)
}

/// `a-b` or `a`, optionally quoted.
pub fn range(i: &[u8]) -> IResult<&[u8], (u32, u32)> {
    preceded(
        space0,
        alt((delimited(char('"'), bare_range, char('"')), bare_range)),
    )(i)
}

/// Members of a list like `0,1,2`, `0-3` or `"0,2-4"`.
pub fn range_list<const N: usize>(mut i: &[u8]) -> IResult<&[u8], Vec<u32, N>> {
    let mut out = Vec::new();
    loop {
        let (rest, (from, to)) = range(i)?;
        if from > to {
            return Err(NomErr::Error(NomError::new(i, ErrorKind::Verify)));
        }
        for v in from..=to {
            if out.push(v).is_err() {
                return too_large(i);
            }
        }
        match comma(rest) {
            Ok((rest, _)) => i = rest,
            Err(_) => return Ok((rest, out)),
        }
    }
}

/// Contents of one `( ... )` group.
pub fn group(i: &[u8]) -> IResult<&[u8], &[u8]> {
    preceded(
        space0,
        delimited(char('('), take_till(|c| c == b')'), char(')')),
    )(i)
}

/// `(a),(b,c),(d)` into the contents of each group.
pub fn groups<const N: usize>(mut i: &[u8]) -> IResult<&[u8], Vec<&[u8], N>> {
    let mut out = Vec::new();
    loop {
        let (rest, inner) = group(i)?;
        if out.push(inner).is_err() {
            return too_large(i);
        }
        match opt(comma)(rest)? {
            (rest, Some(_)) => i = rest,
            (rest, None) => return Ok((rest, out)),
        }
    }
}

/// `"NAME": value` lines of a listing.
pub fn named_value(i: &[u8]) -> IResult<&[u8], (&[u8], u32)> {
    tuple((
        preceded(
            space0,
            delimited(char('"'), take_till(|c| c == b'"'), char('"')),
        ),
        preceded(tuple((space0, char(':'))), number),
    ))(i)
}

/// Non-empty lines of an information text.
pub fn lines(resp: &[u8]) -> impl Iterator<Item = &[u8]> {
    resp.split(|c| *c == b'\r' || *c == b'\n')
        .filter(|line| line.iter().any(|c| !c.is_ascii_whitespace()))
}

/// Text of a field, for heapless strings and comparisons.
pub fn text(field: &[u8]) -> Result<&str, atat::Error> {
    core::str::from_utf8(field)
        .map(str::trim)
        .map_err(|_| atat::Error::Parse)
}

/// Value of a complete parse, any leftover input is ignored.
pub fn finish<T>(result: IResult<&[u8], T>) -> Result<T, atat::Error> {
    result.map(|(_, value)| value).map_err(|_| atat::Error::Parse)
}

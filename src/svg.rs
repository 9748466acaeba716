// Copyright 2026 the Motionpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG path data, parsed into and written out of [`RawPath`].

use core::fmt;

use crate::rawpath::RawPathBuilder;
use crate::{Point, RawPath, SvgArc, Vec2};

/// An error which can be returned when parsing SVG path data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SvgParseError {
    /// The input ended in the middle of a command's arguments.
    #[error("path data ended in the middle of a command")]
    UnexpectedEof,
    /// A number was expected but could not be read.
    #[error("invalid number at byte {offset}")]
    InvalidNumber {
        /// Byte offset of the offending input.
        offset: usize,
    },
    /// An arc flag was something other than `0` or `1`.
    #[error("invalid arc flag at byte {offset}")]
    InvalidFlag {
        /// Byte offset of the offending input.
        offset: usize,
    },
    /// A character that is neither a command nor the start of a number.
    #[error("unexpected character {ch:?} at byte {offset}")]
    UnexpectedChar {
        /// The character found.
        ch: char,
        /// Byte offset of the offending input.
        offset: usize,
    },
}

impl RawPath {
    /// Parse SVG path data.
    ///
    /// All commands of the SVG path grammar are accepted, in absolute and
    /// relative form, including implicit repetition (a `M` followed by more
    /// pairs continues as `L`). Lines, quadratics and arcs are raised to
    /// cubics. Data that does not begin with a moveto starts at the origin.
    /// Empty data yields a zero-length path at the origin.
    ///
    /// The result is measured at [`DEFAULT_RESOLUTION`](crate::DEFAULT_RESOLUTION).
    ///
    /// # Errors
    ///
    /// Returns an [`SvgParseError`] describing the first malformed token.
    pub fn from_svg(data: &str) -> Result<RawPath, SvgParseError> {
        let mut lexer = SvgLexer::new(data);
        let mut path = RawPathBuilder::new();
        let mut last_cmd = 0;
        // The reflected control point for `S` and `T`, if the previous
        // command left one.
        let mut last_ctrl: Option<Point> = None;
        while let Some(c) = lexer.get_cmd(last_cmd)? {
            let pen = path.pen();
            let ctrl = match c {
                b'M' | b'm' => {
                    let pt = lexer.get_maybe_relative(c, pen)?;
                    path.move_to(pt);
                    last_cmd = c - (b'M' - b'L');
                    None
                }
                b'L' | b'l' => {
                    let pt = lexer.get_maybe_relative(c, pen)?;
                    path.line_to(pt);
                    last_cmd = c;
                    None
                }
                b'H' | b'h' => {
                    let mut x = lexer.get_number()?;
                    lexer.opt_comma();
                    if c == b'h' {
                        x += pen.x;
                    }
                    path.line_to(Point::new(x, pen.y));
                    last_cmd = c;
                    None
                }
                b'V' | b'v' => {
                    let mut y = lexer.get_number()?;
                    lexer.opt_comma();
                    if c == b'v' {
                        y += pen.y;
                    }
                    path.line_to(Point::new(pen.x, y));
                    last_cmd = c;
                    None
                }
                b'C' | b'c' => {
                    let p1 = lexer.get_maybe_relative(c, pen)?;
                    let p2 = lexer.get_maybe_relative(c, pen)?;
                    let p3 = lexer.get_maybe_relative(c, pen)?;
                    path.curve_to(p1, p2, p3);
                    last_cmd = c;
                    Some(p2)
                }
                b'S' | b's' => {
                    let p1 = match (last_cmd.to_ascii_uppercase(), last_ctrl) {
                        (b'C' | b'S', Some(ctrl)) => pen + (pen - ctrl),
                        _ => pen,
                    };
                    let p2 = lexer.get_maybe_relative(c, pen)?;
                    let p3 = lexer.get_maybe_relative(c, pen)?;
                    path.curve_to(p1, p2, p3);
                    last_cmd = c;
                    Some(p2)
                }
                b'Q' | b'q' => {
                    let p1 = lexer.get_maybe_relative(c, pen)?;
                    let p2 = lexer.get_maybe_relative(c, pen)?;
                    path.quad_to(p1, p2);
                    last_cmd = c;
                    Some(p1)
                }
                b'T' | b't' => {
                    let p1 = match (last_cmd.to_ascii_uppercase(), last_ctrl) {
                        (b'Q' | b'T', Some(ctrl)) => pen + (pen - ctrl),
                        _ => pen,
                    };
                    let p2 = lexer.get_maybe_relative(c, pen)?;
                    path.quad_to(p1, p2);
                    last_cmd = c;
                    Some(p1)
                }
                b'A' | b'a' => {
                    let rx = lexer.get_number()?;
                    lexer.opt_comma();
                    let ry = lexer.get_number()?;
                    lexer.opt_comma();
                    let x_rotation = lexer.get_number()?.to_radians();
                    lexer.opt_comma();
                    let large_arc = lexer.get_flag()?;
                    let sweep = lexer.get_flag()?;
                    let to = lexer.get_maybe_relative(c, pen)?;
                    let arc = SvgArc {
                        from: pen,
                        to,
                        radii: Vec2::new(rx, ry),
                        x_rotation,
                        large_arc,
                        sweep,
                    };
                    for cubic in arc.to_cubics() {
                        path.push(cubic);
                    }
                    last_cmd = c;
                    None
                }
                b'Z' | b'z' => {
                    path.close();
                    // Numbers straight after a close have no command to repeat.
                    last_cmd = 0;
                    None
                }
                _ => {
                    return Err(SvgParseError::UnexpectedChar {
                        ch: char::from(c),
                        offset: lexer.ix - 1,
                    })
                }
            };
            last_ctrl = ctrl;
        }
        Ok(path.finish())
    }

    /// Convert the path to an SVG path string.
    ///
    /// Every segment is written as an absolute `C` command. A new `M` starts
    /// whenever a segment does not begin where the previous one ended, and
    /// after every closed subpath.
    pub fn to_svg(&self) -> String {
        self.to_string()
    }
}

/// The coordinates of the leading moveto of path data, if it has one.
pub(crate) fn first_point(data: &str) -> Option<Point> {
    let mut lexer = SvgLexer::new(data);
    match lexer.get_cmd(0) {
        Ok(Some(b'M' | b'm')) => lexer.get_number_pair().ok().map(Vec2::to_point),
        _ => None,
    }
}

impl fmt::Display for RawPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pen: Option<Point> = None;
        for (i, segment) in self.segments().iter().enumerate() {
            let c = segment.bez();
            if pen != Some(c.p0) {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "M{},{}", c.p0.x, c.p0.y)?;
            }
            write!(
                f,
                " C{},{} {},{} {},{}",
                c.p1.x, c.p1.y, c.p2.x, c.p2.y, c.p3.x, c.p3.y
            )?;
            if segment.closes_subpath() {
                f.write_str(" Z")?;
                pen = None;
            } else {
                pen = Some(c.p3);
            }
        }
        Ok(())
    }
}

struct SvgLexer<'a> {
    data: &'a [u8],
    ix: usize,
}

impl<'a> SvgLexer<'a> {
    fn new(data: &'a str) -> Self {
        SvgLexer {
            data: data.as_bytes(),
            ix: 0,
        }
    }

    fn skip_ws(&mut self) {
        while let Some(&c) = self.data.get(self.ix) {
            if !(c == b' ' || c == 9 || c == 10 || c == 12 || c == 13) {
                break;
            }
            self.ix += 1;
        }
    }

    /// The next command letter, or `last_cmd` again if a number follows.
    fn get_cmd(&mut self, last_cmd: u8) -> Result<Option<u8>, SvgParseError> {
        self.skip_ws();
        let Some(c) = self.get_byte() else {
            return Ok(None);
        };
        if c.is_ascii_alphabetic() {
            return Ok(Some(c));
        }
        if last_cmd != 0 && (matches!(c, b'-' | b'+' | b'.') || c.is_ascii_digit()) {
            self.unget();
            return Ok(Some(last_cmd));
        }
        Err(SvgParseError::UnexpectedChar {
            ch: self.char_at(self.ix - 1),
            offset: self.ix - 1,
        })
    }

    fn get_byte(&mut self) -> Option<u8> {
        self.data.get(self.ix).map(|&c| {
            self.ix += 1;
            c
        })
    }

    fn unget(&mut self) {
        self.ix -= 1;
    }

    fn char_at(&self, ix: usize) -> char {
        // Recover the full character for multi-byte input.
        let tail = &self.data[ix..];
        let len = tail.len().min(4);
        (1..=len)
            .find_map(|n| core::str::from_utf8(&tail[..n]).ok())
            .and_then(|s| s.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    fn skip_digits(&mut self) -> usize {
        let start = self.ix;
        while self.data.get(self.ix).is_some_and(u8::is_ascii_digit) {
            self.ix += 1;
        }
        self.ix - start
    }

    fn get_number(&mut self) -> Result<f64, SvgParseError> {
        self.skip_ws();
        let start = self.ix;
        match self.data.get(self.ix) {
            None => return Err(SvgParseError::UnexpectedEof),
            Some(b'-' | b'+') => self.ix += 1,
            Some(_) => (),
        }
        let mut digits = self.skip_digits();
        if self.data.get(self.ix) == Some(&b'.') {
            self.ix += 1;
            digits += self.skip_digits();
        }
        if digits == 0 {
            self.ix = start;
            return Err(SvgParseError::InvalidNumber { offset: start });
        }
        if matches!(self.data.get(self.ix), Some(b'e' | b'E')) {
            let mark = self.ix;
            self.ix += 1;
            if matches!(self.data.get(self.ix), Some(b'-' | b'+')) {
                self.ix += 1;
            }
            if self.skip_digits() == 0 {
                // Not an exponent after all, leave the `e` for the next token.
                self.ix = mark;
            }
        }
        core::str::from_utf8(&self.data[start..self.ix])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or(SvgParseError::InvalidNumber { offset: start })
    }

    fn get_flag(&mut self) -> Result<bool, SvgParseError> {
        self.skip_ws();
        let offset = self.ix;
        let flag = match self.get_byte() {
            None => return Err(SvgParseError::UnexpectedEof),
            Some(b'0') => false,
            Some(b'1') => true,
            Some(_) => return Err(SvgParseError::InvalidFlag { offset }),
        };
        self.opt_comma();
        Ok(flag)
    }

    fn get_number_pair(&mut self) -> Result<Vec2, SvgParseError> {
        let x = self.get_number()?;
        self.opt_comma();
        let y = self.get_number()?;
        self.opt_comma();
        Ok(Vec2::new(x, y))
    }

    fn get_maybe_relative(&mut self, cmd: u8, pen: Point) -> Result<Point, SvgParseError> {
        let pt = self.get_number_pair()?;
        if cmd.is_ascii_lowercase() {
            Ok(pen + pt)
        } else {
            Ok(pt.to_point())
        }
    }

    fn opt_comma(&mut self) {
        self.skip_ws();
        if let Some(c) = self.get_byte() {
            if c != b',' {
                self.unget();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Point, RawPath, SvgParseError};

    #[test]
    fn parse_relative_with_implicit_lineto() {
        let path = RawPath::from_svg("m10 10 100 0 0 100 -100 0z").unwrap();
        // Three explicit lines plus the closing segment.
        assert_eq!(path.len(), 4);
        assert!(path.is_closed());
        assert_eq!(path.segments()[1].bez().p3, Point::new(110.0, 110.0));
        assert!((path.total_length() - 400.0).abs() < 1e-9);
    }

    #[test]
    fn round_trip() {
        let path = RawPath::from_svg("M0,0 L10,0 L10,10 Z").unwrap();
        assert_eq!(path.len(), 3);
        let svg = path.to_svg();
        assert!(svg.starts_with("M0,0 C"), "{svg}");
        assert!(svg.ends_with(" Z"), "{svg}");
        let again = RawPath::from_svg(&svg).unwrap();
        assert_eq!(again.len(), path.len());
        for (a, b) in again.cubics().zip(path.cubics()) {
            for (x, y) in a.to_coeffs().iter().zip(b.to_coeffs()) {
                assert!((x - y).abs() < 1e-9);
            }
        }
        assert!(again.is_closed());
        assert!((again.total_length() - path.total_length()).abs() < 1e-9);
    }

    #[test]
    fn every_command_survives_serialization() {
        let cases = [
            "M10,10 Q50,0 90,10 T170,10",
            "M0,0 C10,20 30,20 40,0 S70,-20 80,0",
            "M0,0 A20,10 30 0 1 50,25",
            "m5,5 l10,0 c5,5 10,5 15,0 q5,-5 10,0 z",
            "M0,0 H30 V20 h-10 v-5 Z",
            "M0,0 L10,0 L10,10 Z M20,20 L30,20 L30,30 Z",
        ];
        for data in cases {
            let path = RawPath::from_svg(data).unwrap();
            let svg = path.to_svg();
            let again = RawPath::from_svg(&svg).unwrap();
            assert_eq!(again.len(), path.len(), "{data} -> {svg}");
            assert_eq!(again.is_closed(), path.is_closed(), "{data} -> {svg}");
            assert!((again.total_length() - path.total_length()).abs() < 1e-9);
            for t in [0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0] {
                let a = path.position_at(t, false).point;
                let b = again.position_at(t, false).point;
                assert!((a - b).hypot() < 1e-9, "{data} at {t}: {a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn compact_numbers() {
        let path = RawPath::from_svg("M.5.5L10-5l1e1,0").unwrap();
        assert_eq!(path.start(), Point::new(0.5, 0.5));
        assert_eq!(path.segments()[0].bez().p3, Point::new(10.0, -5.0));
        assert_eq!(path.end(), Point::new(20.0, -5.0));
    }

    #[test]
    fn horizontal_and_vertical() {
        let path = RawPath::from_svg("M1 2 H11 v5 h-1 V0").unwrap();
        let ends: Vec<Point> = path.cubics().map(|c| c.p3).collect();
        assert_eq!(
            ends,
            [
                Point::new(11.0, 2.0),
                Point::new(11.0, 7.0),
                Point::new(10.0, 7.0),
                Point::new(10.0, 0.0)
            ]
        );
    }

    #[test]
    fn smooth_curves_reflect() {
        let path = RawPath::from_svg("M0 0 C0 10 10 10 10 0 S20 -10 20 0").unwrap();
        let second = path.segments()[1].bez();
        assert_eq!(second.p1, Point::new(10.0, -10.0));

        let path = RawPath::from_svg("M0 0 Q5 10 10 0 T20 0").unwrap();
        // The reflected quadratic control point is (15, -10).
        let second = path.segments()[1].bez();
        assert!((second.eval(0.5) - Point::new(15.0, -5.0)).hypot() < 1e-9);

        // Without a preceding curve the control point is the pen.
        let path = RawPath::from_svg("M0 0 L5 0 S10 5 10 10").unwrap();
        assert_eq!(path.segments()[1].bez().p1, Point::new(5.0, 0.0));
    }

    #[test]
    fn arcs() {
        let path = RawPath::from_svg("M0 0 A10 10 0 0 1 20 0").unwrap();
        assert_eq!(path.len(), 2);
        let expected = core::f64::consts::PI * 10.0;
        assert!((path.total_length() - expected).abs() < 0.1);

        // Compact flags.
        let compact = RawPath::from_svg("M0 0a10 10 0 0120 0").unwrap();
        assert_eq!(compact.end(), Point::new(20.0, 0.0));
        assert_eq!(compact.len(), 2);
    }

    #[test]
    fn missing_moveto_starts_at_origin() {
        let path = RawPath::from_svg("L10 0").unwrap();
        assert_eq!(path.start(), Point::ORIGIN);
        assert!((path.total_length() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn subpaths_serialize_with_moveto() {
        let path = RawPath::from_svg("M0 0 L1 0 M5 5 L6 5").unwrap();
        let svg = path.to_svg();
        assert_eq!(svg.matches('M').count(), 2, "{svg}");
        assert!((path.total_length() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn empty_input_is_degenerate() {
        for data in ["", "   ", "M5 5"] {
            let path = RawPath::from_svg(data).unwrap();
            assert_eq!(path.len(), 1);
            assert_eq!(path.total_length(), 0.0);
            assert_eq!(path.start(), Point::ORIGIN);
        }
    }

    #[test]
    fn leading_moveto() {
        assert_eq!(super::first_point(" M3,4 L5 5"), Some(Point::new(3.0, 4.0)));
        assert_eq!(super::first_point("m-1.5.5"), Some(Point::new(-1.5, 0.5)));
        assert_eq!(super::first_point("L1 1"), None);
        assert_eq!(super::first_point(""), None);
    }

    #[test]
    fn errors() {
        assert_eq!(
            RawPath::from_svg("M0 0 L10").unwrap_err(),
            SvgParseError::UnexpectedEof
        );
        assert_eq!(
            RawPath::from_svg("M0 0 L10 x").unwrap_err(),
            SvgParseError::InvalidNumber { offset: 9 }
        );
        assert_eq!(
            RawPath::from_svg("M0 0 A1 1 0 2 0 5 5").unwrap_err(),
            SvgParseError::InvalidFlag { offset: 12 }
        );
        assert_eq!(
            RawPath::from_svg("M0 0 #").unwrap_err(),
            SvgParseError::UnexpectedChar { ch: '#', offset: 5 }
        );
        assert_eq!(
            RawPath::from_svg("M0 0 X1 1").unwrap_err(),
            SvgParseError::UnexpectedChar { ch: 'X', offset: 5 }
        );
        assert_eq!(
            RawPath::from_svg("10 10").unwrap_err(),
            SvgParseError::UnexpectedChar { ch: '1', offset: 0 }
        );
    }
}

//! Cell types storable in a [`crate::Matrix`].
//!
//! Elements are plain-old-data so matrices can be dumped to files and placed in
//! shared segments byte for byte.

use core::fmt;

use bytemuck::Pod;
use eidolon_core::{Color, IndexVal, Real, Vec3};

/// A value type held in matrix cells.
///
/// Implemented for reals (`f64`), indices (`u32`), 3-vectors and colors.
pub trait Element: Pod + PartialEq + fmt::Debug + Send + Sync {
    /// Type tag used when no explicit tag is given.
    const TYPE_NAME: &'static str;

    /// Size in bytes of each scalar word, the unit of byte swapping.
    const WORD: usize;

    /// The zero value new cells are filled with.
    fn zero() -> Self {
        Self::zeroed()
    }

    /// Reverse the byte order of every scalar word.
    fn swap_endian(self) -> Self {
        let mut v = self;
        for word in bytemuck::bytes_of_mut(&mut v).chunks_exact_mut(Self::WORD) {
            word.reverse();
        }
        v
    }

    /// Parse one value from whitespace-separated text tokens.
    ///
    /// Returns `Ok(None)` once the tokens are exhausted.
    fn parse_text<'a, I: Iterator<Item = &'a str>>(
        tokens: &mut I,
    ) -> std::result::Result<Option<Self>, String>;
}

fn parse_real(tok: &str) -> std::result::Result<Real, String> {
    tok.parse::<Real>()
        .map_err(|_| format!("bad number '{}'", tok))
}

impl Element for Real {
    const TYPE_NAME: &'static str = "real";
    const WORD: usize = 8;

    fn parse_text<'a, I: Iterator<Item = &'a str>>(
        tokens: &mut I,
    ) -> std::result::Result<Option<Self>, String> {
        tokens.next().map(parse_real).transpose()
    }
}

impl Element for IndexVal {
    const TYPE_NAME: &'static str = "index";
    const WORD: usize = 4;

    fn parse_text<'a, I: Iterator<Item = &'a str>>(
        tokens: &mut I,
    ) -> std::result::Result<Option<Self>, String> {
        tokens
            .next()
            .map(|tok| {
                tok.parse::<IndexVal>()
                    .map_err(|_| format!("bad index '{}'", tok))
            })
            .transpose()
    }
}

impl Element for Vec3 {
    const TYPE_NAME: &'static str = "vec3";
    const WORD: usize = 8;

    /// Up to three tokens; missing trailing components are zero.
    fn parse_text<'a, I: Iterator<Item = &'a str>>(
        tokens: &mut I,
    ) -> std::result::Result<Option<Self>, String> {
        let Some(x) = tokens.next() else {
            return Ok(None);
        };
        let x = parse_real(x)?;
        let y = tokens.next().map(parse_real).transpose()?.unwrap_or(0.0);
        let z = tokens.next().map(parse_real).transpose()?.unwrap_or(0.0);
        Ok(Some(Vec3::new(x, y, z)))
    }
}

impl Element for Color {
    const TYPE_NAME: &'static str = "color";
    const WORD: usize = 4;

    /// Up to four tokens; missing color channels are zero and a missing alpha is one.
    fn parse_text<'a, I: Iterator<Item = &'a str>>(
        tokens: &mut I,
    ) -> std::result::Result<Option<Self>, String> {
        let Some(r) = tokens.next() else {
            return Ok(None);
        };
        let mut next = |default: f32| -> std::result::Result<f32, String> {
            Ok(tokens
                .next()
                .map(parse_real)
                .transpose()?
                .map_or(default, |v| v as f32))
        };
        let r = parse_real(r)? as f32;
        let g = next(0.0)?;
        let b = next(0.0)?;
        let a = next(1.0)?;
        Ok(Some(Color::new(r, g, b, a)))
    }
}

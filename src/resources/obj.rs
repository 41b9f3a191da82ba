//! Wavefront OBJ reader.
//!
//! Produces flat, non-indexed triangle lists grouped by material. Every call
//! to [`parse_obj`] works on its own [`ObjParser`] state, so indices from one
//! file can never leak into the next.

use crate::{
    data_structures::model::DEFAULT_MATERIAL,
    error::{Channel, ParseError},
};

/// One contiguous, single-material group of triangles.
///
/// Each sequence holds one tuple per emitted vertex: 3 floats for positions
/// and normals, 2 for texture coordinates. A channel the faces never
/// referenced stays empty; a channel only some vertices referenced is
/// zero-filled for the others, so every non-empty channel stays aligned with
/// `positions`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub material: String,
    pub positions: Vec<f32>,
    pub texcoords: Vec<f32>,
    pub normals: Vec<f32>,
}

impl Geometry {
    fn new(material: &str) -> Self {
        Self {
            material: material.to_string(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.texcoords.is_empty() && self.normals.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Result of parsing an OBJ file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjData {
    /// `mtllib` entries in file order.
    pub material_libs: Vec<String>,
    pub geometries: Vec<Geometry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjKeyword {
    Position,
    Normal,
    TexCoord,
    Face,
    UseMtl,
    MtlLib,
    Object,
    Smoothing,
}

impl ObjKeyword {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "v" => Some(Self::Position),
            "vn" => Some(Self::Normal),
            "vt" => Some(Self::TexCoord),
            "f" => Some(Self::Face),
            "usemtl" => Some(Self::UseMtl),
            "mtllib" => Some(Self::MtlLib),
            "o" => Some(Self::Object),
            "s" => Some(Self::Smoothing),
            _ => None,
        }
    }
}

/// Declared attributes. Slot 0 of each list is a sentinel so that 1-based
/// OBJ indices address the lists directly.
struct VertexAttributes {
    positions: Vec<[f32; 3]>,
    texcoords: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,
}

impl VertexAttributes {
    fn new() -> Self {
        Self {
            positions: vec![[0.0; 3]],
            texcoords: vec![[0.0; 2]],
            normals: vec![[0.0; 3]],
        }
    }
}

/// Turns a raw OBJ index into a slot of a list of `len` entries (sentinel
/// included). Negative indices count back from the end.
pub fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let resolved = if index >= 0 {
        index
    } else {
        index + len as i64
    };
    (resolved > 0 && (resolved as usize) < len).then_some(resolved as usize)
}

struct ObjParser {
    attributes: VertexAttributes,
    geometries: Vec<Geometry>,
    current: Option<Geometry>,
    material: String,
    material_libs: Vec<String>,
}

impl ObjParser {
    fn new() -> Self {
        Self {
            attributes: VertexAttributes::new(),
            geometries: Vec::new(),
            current: None,
            material: DEFAULT_MATERIAL.to_string(),
            material_libs: Vec::new(),
        }
    }

    fn line(&mut self, line_no: usize, keyword: ObjKeyword, args: &str) -> Result<(), ParseError> {
        let parts: Vec<&str> = args.split_whitespace().collect();
        match keyword {
            ObjKeyword::Position => {
                let [x, y, z] = floats::<3>(line_no, "v", &parts)?;
                self.attributes.positions.push([x, y, z]);
            }
            ObjKeyword::Normal => {
                let [x, y, z] = floats::<3>(line_no, "vn", &parts)?;
                self.attributes.normals.push([x, y, z]);
            }
            ObjKeyword::TexCoord => {
                let [u, v] = floats::<2>(line_no, "vt", &parts)?;
                self.attributes.texcoords.push([u, v]);
            }
            ObjKeyword::Face => self.face(line_no, &parts)?,
            ObjKeyword::UseMtl => self.use_material(args),
            ObjKeyword::MtlLib => self.material_libs.push(args.to_string()),
            ObjKeyword::Object | ObjKeyword::Smoothing => (),
        }
        Ok(())
    }

    fn face(&mut self, line_no: usize, refs: &[&str]) -> Result<(), ParseError> {
        if refs.len() < 3 {
            log::warn!(
                "line {}: face with {} vertices skipped, at least 3 are required",
                line_no,
                refs.len()
            );
            return Ok(());
        }
        let channels = channel_mask(refs[0]);
        if refs.iter().any(|r| channel_mask(r) != channels) {
            log::warn!(
                "line {}: face mixes vertices with and without texcoords or normals, zero-filling",
                line_no
            );
        }
        let mut geometry = match self.current.take() {
            Some(geometry) => geometry,
            None => Geometry::new(&self.material),
        };
        // Fan around the first vertex
        let result: Result<(), ParseError> = (1..refs.len() - 1).try_for_each(|i| {
            for vertex in [refs[0], refs[i], refs[i + 1]] {
                self.vertex(line_no, vertex, &mut geometry)?;
            }
            Ok(())
        });
        self.current = Some(geometry);
        result
    }

    fn vertex(&self, line_no: usize, vertex: &str, out: &mut Geometry) -> Result<(), ParseError> {
        let mut refs = [None; 3];
        for (slot, index) in vertex.split('/').take(3).enumerate() {
            if index.is_empty() {
                continue;
            }
            refs[slot] = Some(index.parse::<i64>().map_err(|_| ParseError::InvalidNumber {
                line: line_no,
                token: index.to_string(),
            })?);
        }
        let Some(position) = refs[0] else {
            return Err(ParseError::InvalidNumber {
                line: line_no,
                token: vertex.to_string(),
            });
        };

        let attrs = &self.attributes;
        let p = lookup(line_no, Channel::Position, position, attrs.positions.len())?;
        let t = refs[1]
            .map(|index| lookup(line_no, Channel::TexCoord, index, attrs.texcoords.len()))
            .transpose()?;
        let n = refs[2]
            .map(|index| lookup(line_no, Channel::Normal, index, attrs.normals.len()))
            .transpose()?;

        let emitted = out.vertex_count();
        out.positions.extend_from_slice(&attrs.positions[p]);
        push_channel(&mut out.texcoords, t.map(|i| &attrs.texcoords[i][..]), emitted, 2);
        push_channel(&mut out.normals, n.map(|i| &attrs.normals[i][..]), emitted, 3);
        Ok(())
    }

    fn use_material(&mut self, name: &str) {
        self.material = name.to_string();
        match self.current.take() {
            Some(geometry) if !geometry.is_empty() => self.geometries.push(geometry),
            // Nothing emitted yet, so the open group simply changes material
            Some(mut geometry) => {
                geometry.material = self.material.clone();
                self.current = Some(geometry);
            }
            None => (),
        }
    }

    fn finish(mut self) -> ObjData {
        if let Some(geometry) = self.current.take() {
            if !geometry.is_empty() {
                self.geometries.push(geometry);
            }
        }
        ObjData {
            material_libs: self.material_libs,
            geometries: self.geometries,
        }
    }
}

/// Which of the optional channels (texcoord, normal) a face vertex references.
fn channel_mask(vertex: &str) -> (bool, bool) {
    let mut slots = vertex.split('/').skip(1);
    let mut used = || slots.next().is_some_and(|s| !s.is_empty());
    (used(), used())
}

/**
 * Appends `value` for vertex number `emitted` while keeping `channel` at one
 * `arity`-tuple per emitted vertex. Once a group has used a channel, vertices
 * without it get zeros, and vertices emitted before its first use are
 * back-filled with zeros.
 */
fn push_channel(channel: &mut Vec<f32>, value: Option<&[f32]>, emitted: usize, arity: usize) {
    match value {
        Some(value) => {
            channel.resize(emitted * arity, 0.0);
            channel.extend_from_slice(value);
        }
        None if !channel.is_empty() => channel.resize((emitted + 1) * arity, 0.0),
        None => (),
    }
}

fn lookup(line: usize, channel: Channel, index: i64, len: usize) -> Result<usize, ParseError> {
    resolve_index(index, len).ok_or(ParseError::IndexOutOfRange {
        line,
        channel,
        index,
        // the sentinel is not a declared entry
        available: len - 1,
    })
}

/// Reads the first `N` values of `parts`; extra values (like `w`) are ignored.
pub(crate) fn floats<const N: usize>(
    line: usize,
    keyword: &'static str,
    parts: &[&str],
) -> Result<[f32; N], ParseError> {
    if parts.len() < N {
        return Err(ParseError::MissingComponent {
            line,
            keyword,
            expected: N,
        });
    }
    let mut out = [0.0; N];
    for (slot, token) in out.iter_mut().zip(parts) {
        *slot = token.parse().map_err(|_| ParseError::InvalidNumber {
            line,
            token: token.to_string(),
        })?;
    }
    Ok(out)
}

/// Splits a trimmed line into its keyword and the (trimmed) remainder.
pub(crate) fn split_keyword(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    }
}

/// Parse OBJ text into material-grouped triangle lists.
///
/// Faces are fan-triangulated from their first vertex, which is only correct
/// for convex polygons. Faces before any `usemtl` use [`DEFAULT_MATERIAL`].
/// Unknown keywords are logged and skipped.
pub fn parse_obj(text: &str) -> Result<ObjData, ParseError> {
    let mut parser = ObjParser::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_no = idx + 1;
        let (keyword, args) = split_keyword(line);
        match ObjKeyword::from_token(keyword) {
            Some(keyword) => parser.line(line_no, keyword, args)?,
            None => log::warn!("unhandled OBJ keyword '{}' at line {}", keyword, line_no),
        }
    }

    Ok(parser.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_absolute_and_relative_indices() {
        // four declared entries plus the sentinel
        let len = 5;
        for i in 1..=4 {
            assert_eq!(resolve_index(i, len), Some(i as usize));
            assert_eq!(resolve_index(i - 5, len), Some(i as usize));
        }
        assert_eq!(resolve_index(0, len), None);
        assert_eq!(resolve_index(5, len), None);
        assert_eq!(resolve_index(-5, len), None);
    }

    #[test]
    fn keyword_is_split_from_arguments() {
        assert_eq!(split_keyword("usemtl  Wood Dark "), ("usemtl", "Wood Dark"));
        assert_eq!(split_keyword("s"), ("s", ""));
    }

    #[test]
    fn extra_components_are_ignored() {
        assert_eq!(floats::<3>(1, "v", &["1", "2", "3", "1"]), Ok([1.0, 2.0, 3.0]));
        assert!(matches!(
            floats::<3>(1, "v", &["1", "2"]),
            Err(ParseError::MissingComponent { expected: 3, .. })
        ));
    }
}

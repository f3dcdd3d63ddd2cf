/// Wavefront OBJ parser for the `v`, `f`, `vt` and `vn` directives
use std::str::SplitWhitespace;

use nalgebra::{Vector2, Vector3};
use nom::{
    character::complete::i64 as integer, combinator::all_consuming, number::complete::float,
    IResult,
};

use crate::error::{Error, Result};
use crate::geometry::{extract_triangles, vertex, Normal, Triangle, Vertex};

/// Everything the parser keeps from an OBJ file
///
/// Faces are stored already fan-triangulated with 0-based indices.
/// `textures` and `normals` are what the file declares; neither is used
/// to build meshes.
#[derive(Debug, Clone, Default)]
pub struct ParsedModel {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Triangle>,
    pub textures: Vec<Vector2<f32>>,
    pub normals: Vec<Normal>,
}

impl ParsedModel {
    /// Three points per face triangle, in face order
    pub fn flat_geometry(&self) -> Result<Vec<Vertex>> {
        extract_triangles(&self.vertices, &self.faces)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Directive {
    Vertex,
    Face,
    TexCoord,
    Normal,
}

impl Directive {
    fn classify(tag: &str) -> Option<Self> {
        match tag {
            "v" | "V" => Some(Directive::Vertex),
            "f" | "F" => Some(Directive::Face),
            "vt" => Some(Directive::TexCoord),
            "vn" => Some(Directive::Normal),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Directive::Vertex => "v",
            Directive::Face => "f",
            Directive::TexCoord => "vt",
            Directive::Normal => "vn",
        }
    }
}

/// Parse the full text of an OBJ file
pub fn parse(text: &str) -> Result<ParsedModel> {
    let mut model = ParsedModel::default();
    let mut face = Vec::new();

    for (line_idx, line) in text.lines().enumerate() {
        let mut tokens = line.trim().split_whitespace();
        let Some(directive) = tokens.next().and_then(Directive::classify) else {
            continue;
        };
        let mut fields = Fields {
            line: line_idx + 1,
            directive,
            tokens,
        };

        match directive {
            Directive::Vertex => {
                let x = fields.float("x")?;
                let y = fields.float("y")?;
                let z = fields.float("z")?;
                model.vertices.push(vertex(x, y, z));
            }
            Directive::Face => {
                face.clear();
                while let Some(index) = fields.face_index(model.vertices.len())? {
                    face.push(index);
                }
                model.faces.extend(Triangle::fan(&face));
            }
            Directive::TexCoord => {
                let u = fields.float("u")?;
                let v = fields.float("v")?;
                model.textures.push(Vector2::new(u, v));
            }
            Directive::Normal => {
                let x = fields.float("x")?;
                let y = fields.float("y")?;
                let z = fields.float("z")?;
                model.normals.push(Vector3::new(x, y, z));
            }
        }
    }

    log::debug!(
        "parsed OBJ: {} vertices, {} triangles, {} texture coords, {} normals",
        model.vertices.len(),
        model.faces.len(),
        model.textures.len(),
        model.normals.len()
    );
    Ok(model)
}

/// The remaining whitespace-separated fields of one recognized line
struct Fields<'a> {
    line: usize,
    directive: Directive,
    tokens: SplitWhitespace<'a>,
}

impl Fields<'_> {
    fn malformed(&self, field: &'static str, value: &str) -> Error {
        Error::MalformedInput {
            line: self.line,
            directive: self.directive.name(),
            field,
            value: value.to_string(),
        }
    }

    fn float(&mut self, field: &'static str) -> Result<f32> {
        let token = self.tokens.next().ok_or_else(|| self.malformed(field, ""))?;
        match parse_number(token) {
            Ok((_, value)) if value.is_finite() => Ok(value),
            _ => Err(self.malformed(field, token)),
        }
    }

    /// Next position index as a 0-based value, ignoring `/vt/vn` sub-fields.
    ///
    /// Negative indices count back from the last vertex declared so far.
    fn face_index(&mut self, declared: usize) -> Result<Option<usize>> {
        let Some(token) = self.tokens.next() else {
            return Ok(None);
        };
        let position = token.split('/').next().unwrap_or_default();
        let index = match parse_index(position) {
            Ok((_, index)) => index,
            Err(_) => return Err(self.malformed("vertex index", token)),
        };

        let resolved = if index < 0 {
            declared as i64 + index
        } else {
            index - 1
        };
        if resolved < 0 {
            return Err(Error::IndexOutOfRange {
                index: resolved,
                len: declared,
            });
        }
        Ok(Some(resolved as usize))
    }
}

fn parse_number(input: &str) -> IResult<&str, f32> {
    all_consuming(float)(input)
}

fn parse_index(input: &str) -> IResult<&str, i64> {
    all_consuming(integer)(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# a unit square
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/2/1 4/1/1
";

    #[test]
    fn test_parse_quad() {
        let model = parse(QUAD).unwrap();
        assert_eq!(model.vertices.len(), 4);
        assert_eq!(model.vertices[2], vertex(1.0, 1.0, 0.0));
        assert_eq!(model.faces, vec![Triangle::new(0, 1, 2), Triangle::new(0, 2, 3)]);
        assert_eq!(model.textures, vec![Vector2::new(0.0, 0.0), Vector2::new(1.0, 1.0)]);
        assert_eq!(model.normals, vec![Vector3::new(0.0, 0.0, 1.0)]);
    }

    #[test]
    fn test_triangle_count_per_face() {
        let text = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 2 0
v 1 2 0
f 1 2 3
f 1 2 3 4
f 1 2 3 4 5 6
f 1 2
";
        let model = parse(text).unwrap();
        assert_eq!(model.faces.len(), 1 + 2 + 4);
    }

    #[test]
    fn test_whitespace_and_case() {
        let text = "  V 1 2 3  \r\n\tv\t4 5 6\nF 1 2 1\nVT 0 0\nVN 0 0 1\n";
        let model = parse(text).unwrap();
        assert_eq!(model.vertices.len(), 2);
        assert_eq!(model.vertices[1], vertex(4.0, 5.0, 6.0));
        assert_eq!(model.faces.len(), 1);
        assert!(model.textures.is_empty());
        assert!(model.normals.is_empty());
    }

    #[test]
    fn test_unsupported_directives_ignored() {
        let text = "mtllib cup.mtl\no Cup\ng body\ns 1\nusemtl glaze\nvp 0.1\nv 1 1 1\n";
        let model = parse(text).unwrap();
        assert_eq!(model.vertices.len(), 1);
        assert!(model.faces.is_empty());
    }

    #[test]
    fn test_w_is_always_one() {
        let model = parse("v 1 2 3 0.5").unwrap();
        assert_eq!(model.vertices[0], vertex(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_malformed_vertex() {
        let result = parse("v 0 0 0\nv 1.0 foo 2.0\n");
        match result {
            Err(Error::MalformedInput {
                line,
                directive,
                field,
                value,
            }) => {
                assert_eq!(line, 2);
                assert_eq!(directive, "v");
                assert_eq!(field, "y");
                assert_eq!(value, "foo");
            }
            other => panic!("expected malformed input, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_vertex_rejected() {
        for token in ["nan", "inf", "-infinity"] {
            let result = parse(&format!("v 0 0 0\nv {} 0 0\n", token));
            match result {
                Err(Error::MalformedInput {
                    line: 2,
                    directive: "v",
                    field: "x",
                    value,
                }) => assert_eq!(value, token),
                other => panic!("expected malformed input for {}, got {:?}", token, other),
            }
        }
        assert!(matches!(
            parse("vn 0 NaN 1"),
            Err(Error::MalformedInput { field: "y", .. })
        ));
    }

    #[test]
    fn test_missing_field() {
        assert!(matches!(
            parse("vt 0.5"),
            Err(Error::MalformedInput { field: "v", .. })
        ));
        assert!(matches!(
            parse("vn 0 1"),
            Err(Error::MalformedInput { field: "z", .. })
        ));
    }

    #[test]
    fn test_malformed_face_index() {
        let result = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 two 3\n");
        assert!(matches!(
            result,
            Err(Error::MalformedInput { line: 4, directive: "f", .. })
        ));
    }

    #[test]
    fn test_relative_indices() {
        let model = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        assert_eq!(model.faces, vec![Triangle::new(0, 1, 2)]);
    }

    #[test]
    fn test_zero_index_rejected() {
        let result = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n");
        assert!(matches!(
            result,
            Err(Error::IndexOutOfRange { index: -1, len: 3 })
        ));
    }

    #[test]
    fn test_forward_reference_fails_on_extraction() {
        let model = parse("v 0 0 0\nv 1 0 0\nf 1 2 3\n").unwrap();
        assert!(matches!(
            model.flat_geometry(),
            Err(Error::IndexOutOfRange { index: 2, len: 2 })
        ));
    }
}

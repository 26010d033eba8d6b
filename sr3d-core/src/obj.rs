//! Wavefront OBJ parser (geometry subset)
//!
//! Reads `v` positions, `vt` texture coordinates and `f` faces. Face corners
//! may be `i`, `i/t`, `i//n` or `i/t/n`; indices are 1-based, negative ones
//! count back from the latest element. Polygons are fan-triangulated. Every
//! other statement (normals, groups, materials, smoothing) is skipped.
use std::path::Path;

use log::{debug, info};
use nom::{
    bytes::complete::tag,
    character::complete::{char, i64 as index, space0, space1},
    combinator::{all_consuming, opt},
    multi::many1,
    number::complete::float,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::error::{Error, Result};
use crate::geometry::{Mesh, TexCoord, Triangle};
use crate::math::{vec3, Vec4};

/// One face corner: position index and optional texture index, both as written
type Corner = (i64, Option<i64>);

/// Parse OBJ text into a mesh
pub fn parse_obj(input: &str) -> Result<Mesh> {
    let mut positions: Vec<Vec4> = Vec::new();
    let mut tex_coords: Vec<TexCoord> = Vec::new();
    let mut mesh = Mesh::default();
    let mut skipped = 0usize;

    for (i, raw) in input.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        let Some(keyword) = line.split_whitespace().next() else {
            continue;
        };

        match keyword {
            "v" => {
                let (x, y, z) = run(parse_vertex, line, line_no)?;
                positions.push(vec3(x, y, z));
            }
            "vt" => {
                let (u, v) = run(parse_tex_coord, line, line_no)?;
                // OBJ puts v = 0 at the bottom of the image
                tex_coords.push(TexCoord::new(u, 1.0 - v));
            }
            "f" => {
                let corners = run(parse_face, line, line_no)?;
                if corners.len() < 3 {
                    return Err(Error::Parse {
                        line: line_no,
                        message: format!("face needs 3 corners, found {}", corners.len()),
                    });
                }
                let resolved = corners
                    .iter()
                    .map(|&(vi, ti)| -> Result<(Vec4, TexCoord)> {
                        let p = positions[resolve(vi, positions.len(), line_no)?];
                        let t = match ti {
                            Some(ti) => tex_coords[resolve(ti, tex_coords.len(), line_no)?],
                            None => TexCoord::default(),
                        };
                        Ok((p, t))
                    })
                    .collect::<Result<Vec<_>>>()?;

                let (p0, t0) = resolved[0];
                for pair in resolved[1..].windows(2) {
                    let (p1, t1) = pair[0];
                    let (p2, t2) = pair[1];
                    mesh.add_triangle(Triangle::new(p0, p1, p2).with_tex(t0, t1, t2));
                }
            }
            _ => skipped += 1,
        }
    }

    debug!(
        "OBJ: {} positions, {} texture coordinates, {} triangles, {} statements skipped",
        positions.len(),
        tex_coords.len(),
        mesh.len(),
        skipped
    );
    Ok(mesh)
}

/// Read and parse an OBJ file
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let mesh = parse_obj(&text)?;
    info!("Loaded {} ({} triangles)", path.display(), mesh.len());
    Ok(mesh)
}

fn run<'a, T>(
    parser: impl FnMut(&'a str) -> IResult<&'a str, T>,
    line: &'a str,
    line_no: usize,
) -> Result<T> {
    match all_consuming(parser)(line) {
        Ok((_, value)) => Ok(value),
        Err(e) => Err(Error::Parse {
            line: line_no,
            message: format!("{:?}", e),
        }),
    }
}

/// Turn a 1-based or negative OBJ index into a slice index
fn resolve(index: i64, count: usize, line: usize) -> Result<usize> {
    let resolved = if index > 0 {
        index - 1
    } else {
        count as i64 + index
    };
    if index == 0 || resolved < 0 || resolved >= count as i64 {
        return Err(Error::InvalidIndex { line, index, count });
    }
    Ok(resolved as usize)
}

fn parse_vertex(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, _) = tag("v")(input)?;
    let (input, (x, y, z)) = tuple((
        preceded(space1, float),
        preceded(space1, float),
        preceded(space1, float),
    ))(input)?;
    // Optional homogeneous weight, unused
    let (input, _) = opt(preceded(space1, float))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, (x, y, z)))
}

fn parse_tex_coord(input: &str) -> IResult<&str, (f32, f32)> {
    let (input, _) = tag("vt")(input)?;
    let (input, u) = preceded(space1, float)(input)?;
    let (input, v) = opt(preceded(space1, float))(input)?;
    // Optional depth component, unused
    let (input, _) = opt(preceded(space1, float))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, (u, v.unwrap_or(0.0))))
}

fn parse_face(input: &str) -> IResult<&str, Vec<Corner>> {
    let (input, _) = tag("f")(input)?;
    terminated(many1(preceded(space1, parse_corner)), space0)(input)
}

fn parse_corner(input: &str) -> IResult<&str, Corner> {
    let (input, vi) = index(input)?;
    let (input, ti) = opt(preceded(char('/'), opt(index)))(input)?;
    // Normal index, unused
    let (input, _) = opt(preceded(char('/'), opt(index)))(input)?;
    Ok((input, (vi, ti.flatten())))
}

use serde::Serialize;

use crate::types::error::{Result, YxdbError};

/*
 * Spatial object layout (all little-endian)
 *
 *   0    i32  object type: 8 = points, 3 = lines, 5 = polygons
 *   36   i32  points: total points    | lines/polygons: total parts
 *   40   points: first [lng f64, lat f64] pair, pairs follow to the end
 *        lines/polygons: i64 total points
 *   48   lines/polygons: (parts - 1) x i32 ending point index of each part
 *        but the last, then all [lng, lat] pairs
 */

const MIN_SPATIAL_LEN: usize = 20;
const BYTES_PER_POINT: usize = 16;
const PART_COUNT_OFFSET: usize = 36;
const FIRST_POINT_OFFSET: usize = 40;
const POINT_COUNT_OFFSET: usize = 40;
const PART_INDEX_OFFSET: usize = 48;

const SHAPE_POINTS: i32 = 8;
const SHAPE_LINES: i32 = 3;
const SHAPE_POLYGONS: i32 = 5;

type Coord = [f64; 2];

#[derive(Serialize)]
struct GeoJson<'a, C: Serialize> {
    #[serde(rename = "yxdbType")]
    yxdb_type: &'a str,
    coordinates: C,
}

/// Converts the payload of a SpatialObj field into GeoJSON text.
///
/// Payloads shorter than 20 bytes carry no geometry: all-zero ones yield an
/// empty string, anything else is rejected.
pub fn to_geojson(bytes: &[u8]) -> Result<String> {
    if bytes.len() < MIN_SPATIAL_LEN {
        if bytes.iter().all(|&b| b == 0) {
            return Ok(String::new());
        }
        return Err(YxdbError::InvalidSpatialObject);
    }

    match i32_at(bytes, 0)? {
        SHAPE_POINTS => parse_points(bytes),
        SHAPE_LINES => parse_lines(bytes),
        SHAPE_POLYGONS => parse_polygons(bytes),
        _ => Err(YxdbError::InvalidSpatialObject),
    }
}

fn parse_points(bytes: &[u8]) -> Result<String> {
    if i32_at(bytes, PART_COUNT_OFFSET)? == 1 {
        return geojson("Point", coord_at(bytes, FIRST_POINT_OFFSET)?);
    }

    let mut points = Vec::new();
    let mut at = FIRST_POINT_OFFSET;
    while at < bytes.len() {
        points.push(coord_at(bytes, at)?);
        at += BYTES_PER_POINT;
    }
    geojson("MultiPoint", points)
}

fn parse_lines(bytes: &[u8]) -> Result<String> {
    let mut lines = parse_parts(bytes)?;
    if lines.len() == 1 {
        return geojson("LineString", lines.swap_remove(0));
    }
    geojson("MultiLineString", lines)
}

// All parts are emitted as rings of one polygon, even for MultiPolygon.
fn parse_polygons(bytes: &[u8]) -> Result<String> {
    let rings = parse_parts(bytes)?;
    if rings.len() == 1 {
        return geojson("Polygon", rings);
    }
    geojson("MultiPolygon", vec![rings])
}

fn parse_parts(bytes: &[u8]) -> Result<Vec<Vec<Coord>>> {
    let ending_offsets = part_ending_offsets(bytes)?;

    let mut at = points_start(ending_offsets.len());
    let mut parts = Vec::with_capacity(ending_offsets.len());
    for end in ending_offsets {
        let mut part = Vec::new();
        while at < end {
            part.push(coord_at(bytes, at)?);
            at += BYTES_PER_POINT;
        }
        parts.push(part);
    }
    Ok(parts)
}

/// Byte offset, within `bytes`, at which each part's coordinates end.
fn part_ending_offsets(bytes: &[u8]) -> Result<Vec<usize>> {
    let total_parts = count(i32_at(bytes, PART_COUNT_OFFSET)?)?;
    // Narrowed to 32 bits, as written.
    let total_points = count(i64_at(bytes, POINT_COUNT_OFFSET)? as i32)?;
    if total_parts == 0 || points_start(total_parts) > bytes.len() {
        return Err(YxdbError::InvalidSpatialObject);
    }

    let start_at = points_start(total_parts);
    let mut offsets = Vec::with_capacity(total_parts);
    for j in 1..total_parts {
        let ending_point = count(i32_at(bytes, PART_INDEX_OFFSET + (j - 1) * 4)?)?;
        offsets.push(point_offset(start_at, ending_point)?);
    }
    offsets.push(point_offset(start_at, total_points)?);
    Ok(offsets)
}

fn points_start(total_parts: usize) -> usize {
    PART_INDEX_OFFSET + (total_parts - 1) * 4
}

fn point_offset(start_at: usize, point_index: usize) -> Result<usize> {
    point_index
        .checked_mul(BYTES_PER_POINT)
        .and_then(|delta| delta.checked_add(start_at))
        .ok_or(YxdbError::InvalidSpatialObject)
}

fn count(value: i32) -> Result<usize> {
    usize::try_from(value).map_err(|_| YxdbError::InvalidSpatialObject)
}

fn coord_at(bytes: &[u8], at: usize) -> Result<Coord> {
    Ok([f64_at(bytes, at)?, f64_at(bytes, at + 8)?])
}

fn field_at<const N: usize>(bytes: &[u8], at: usize) -> Result<[u8; N]> {
    at.checked_add(N)
        .and_then(|end| bytes.get(at..end))
        .and_then(|slice| slice.try_into().ok())
        .ok_or(YxdbError::InvalidSpatialObject)
}

fn i32_at(bytes: &[u8], at: usize) -> Result<i32> {
    Ok(i32::from_le_bytes(field_at(bytes, at)?))
}

fn i64_at(bytes: &[u8], at: usize) -> Result<i64> {
    Ok(i64::from_le_bytes(field_at(bytes, at)?))
}

fn f64_at(bytes: &[u8], at: usize) -> Result<f64> {
    Ok(f64::from_le_bytes(field_at(bytes, at)?))
}

fn geojson<C: Serialize>(yxdb_type: &str, coordinates: C) -> Result<String> {
    serde_json::to_string(&GeoJson {
        yxdb_type,
        coordinates,
    })
    .map_err(|_| YxdbError::InvalidSpatialObject)
}

//! Greedy quad merger over per-layer visibility masks.
//!
//! Each of the six directions sweeps its layers, builds a 2D mask of
//! cells whose outward neighbor is air, then merges same-block runs into
//! maximal rectangles. Boundary layers consult the snapshotted neighbor
//! planes; a missing side/bottom neighbor suppresses that boundary layer
//! so no hidden seam geometry is emitted, while a missing top neighbor
//! counts as open sky.

use loam_blocks::{AIR, BlockId, BlockRegistry};
use loam_chunk::ChunkBuf;
use loam_geom::Vec3;

use crate::boundary::BoundarySlices;
use crate::face::{ALL_FACES, Face};
use crate::mesh_build::MeshBuild;

/// Merges a visibility mask into maximal same-block rectangles.
///
/// The mask is indexed `u + nu * v`. Runs extend along `v` first, then
/// widen along `u`; consumed cells are zeroed so each cell lands in
/// exactly one rectangle.
fn greedy_rects(
    mask: &mut [BlockId],
    nu: usize,
    nv: usize,
    mut emit: impl FnMut(usize, usize, usize, usize, BlockId),
) {
    for u in 0..nu {
        for v in 0..nv {
            let id = mask[u + nu * v];
            if id == AIR {
                continue;
            }
            let mut dv = 1;
            while v + dv < nv && mask[u + nu * (v + dv)] == id {
                dv += 1;
            }
            let mut du = 1;
            'widen: while u + du < nu {
                for vv in v..v + dv {
                    if mask[(u + du) + nu * vv] != id {
                        break 'widen;
                    }
                }
                du += 1;
            }
            for uu in u..u + du {
                for vv in v..v + dv {
                    mask[uu + nu * vv] = AIR;
                }
            }
            emit(u, v, du, dv, id);
        }
    }
}

fn mesh_pos_y(
    buf: &ChunkBuf,
    borders: &BoundarySlices,
    reg: &BlockRegistry,
    s: f32,
) -> MeshBuild {
    let (sx, sy, sz) = (buf.sx, buf.sy, buf.sz);
    let plane = borders.plane(Face::PosY);
    let mut out = MeshBuild::default();
    let mut mask = vec![AIR; sx * sz];
    for y in (0..sy).rev() {
        let mut any = false;
        for z in 0..sz {
            for x in 0..sx {
                let id = buf.get_local(x, y, z);
                // An absent chunk above is open sky.
                let open = if y + 1 < sy {
                    buf.get_local(x, y + 1, z) == AIR
                } else {
                    plane.is_none_or(|p| p[x + sx * z] == AIR)
                };
                mask[x + sx * z] = if id != AIR && open {
                    any = true;
                    id
                } else {
                    AIR
                };
            }
        }
        if !any {
            continue;
        }
        let yq = (y + 1) as f32 * s;
        greedy_rects(&mut mask, sx, sz, |x, z, w, h, id| {
            let (x0, x1) = (x as f32 * s, (x + w) as f32 * s);
            let (z0, z1) = (z as f32 * s, (z + h) as f32 * s);
            out.add_quad(
                Vec3::new(x0, yq, z0),
                Vec3::new(x0, yq, z1),
                Vec3::new(x1, yq, z1),
                Vec3::new(x1, yq, z0),
                reg.color_of(id),
            );
        });
    }
    out
}

fn mesh_neg_y(
    buf: &ChunkBuf,
    borders: &BoundarySlices,
    reg: &BlockRegistry,
    s: f32,
) -> MeshBuild {
    let (sx, sy, sz) = (buf.sx, buf.sy, buf.sz);
    let plane = borders.plane(Face::NegY);
    let mut out = MeshBuild::default();
    let mut mask = vec![AIR; sx * sz];
    for y in 0..sy {
        if y == 0 && plane.is_none() {
            continue;
        }
        let mut any = false;
        for z in 0..sz {
            for x in 0..sx {
                let id = buf.get_local(x, y, z);
                let open = if y > 0 {
                    buf.get_local(x, y - 1, z) == AIR
                } else {
                    plane.is_some_and(|p| p[x + sx * z] == AIR)
                };
                mask[x + sx * z] = if id != AIR && open {
                    any = true;
                    id
                } else {
                    AIR
                };
            }
        }
        if !any {
            continue;
        }
        let yq = y as f32 * s;
        greedy_rects(&mut mask, sx, sz, |x, z, w, h, id| {
            let (x0, x1) = (x as f32 * s, (x + w) as f32 * s);
            let (z0, z1) = (z as f32 * s, (z + h) as f32 * s);
            out.add_quad(
                Vec3::new(x0, yq, z1),
                Vec3::new(x0, yq, z0),
                Vec3::new(x1, yq, z0),
                Vec3::new(x1, yq, z1),
                reg.color_of(id),
            );
        });
    }
    out
}

fn mesh_pos_x(
    buf: &ChunkBuf,
    borders: &BoundarySlices,
    reg: &BlockRegistry,
    s: f32,
) -> MeshBuild {
    let (sx, sy, sz) = (buf.sx, buf.sy, buf.sz);
    let plane = borders.plane(Face::PosX);
    let mut out = MeshBuild::default();
    let mut mask = vec![AIR; sz * sy];
    for x in (0..sx).rev() {
        if x == sx - 1 && plane.is_none() {
            continue;
        }
        let mut any = false;
        for y in 0..sy {
            for z in 0..sz {
                let id = buf.get_local(x, y, z);
                let open = if x + 1 < sx {
                    buf.get_local(x + 1, y, z) == AIR
                } else {
                    plane.is_some_and(|p| p[z + sz * y] == AIR)
                };
                mask[z + sz * y] = if id != AIR && open {
                    any = true;
                    id
                } else {
                    AIR
                };
            }
        }
        if !any {
            continue;
        }
        let xq = (x + 1) as f32 * s;
        greedy_rects(&mut mask, sz, sy, |z, y, w, h, id| {
            let (z0, z1) = (z as f32 * s, (z + w) as f32 * s);
            let (y0, y1) = (y as f32 * s, (y + h) as f32 * s);
            out.add_quad(
                Vec3::new(xq, y0, z0),
                Vec3::new(xq, y1, z0),
                Vec3::new(xq, y1, z1),
                Vec3::new(xq, y0, z1),
                reg.color_of(id),
            );
        });
    }
    out
}

fn mesh_neg_x(
    buf: &ChunkBuf,
    borders: &BoundarySlices,
    reg: &BlockRegistry,
    s: f32,
) -> MeshBuild {
    let (sx, sy, sz) = (buf.sx, buf.sy, buf.sz);
    let plane = borders.plane(Face::NegX);
    let mut out = MeshBuild::default();
    let mut mask = vec![AIR; sz * sy];
    for x in 0..sx {
        if x == 0 && plane.is_none() {
            continue;
        }
        let mut any = false;
        for y in 0..sy {
            for z in 0..sz {
                let id = buf.get_local(x, y, z);
                let open = if x > 0 {
                    buf.get_local(x - 1, y, z) == AIR
                } else {
                    plane.is_some_and(|p| p[z + sz * y] == AIR)
                };
                mask[z + sz * y] = if id != AIR && open {
                    any = true;
                    id
                } else {
                    AIR
                };
            }
        }
        if !any {
            continue;
        }
        let xq = x as f32 * s;
        greedy_rects(&mut mask, sz, sy, |z, y, w, h, id| {
            let (z0, z1) = (z as f32 * s, (z + w) as f32 * s);
            let (y0, y1) = (y as f32 * s, (y + h) as f32 * s);
            out.add_quad(
                Vec3::new(xq, y0, z1),
                Vec3::new(xq, y1, z1),
                Vec3::new(xq, y1, z0),
                Vec3::new(xq, y0, z0),
                reg.color_of(id),
            );
        });
    }
    out
}

fn mesh_pos_z(
    buf: &ChunkBuf,
    borders: &BoundarySlices,
    reg: &BlockRegistry,
    s: f32,
) -> MeshBuild {
    let (sx, sy, sz) = (buf.sx, buf.sy, buf.sz);
    let plane = borders.plane(Face::PosZ);
    let mut out = MeshBuild::default();
    let mut mask = vec![AIR; sx * sy];
    for z in (0..sz).rev() {
        if z == sz - 1 && plane.is_none() {
            continue;
        }
        let mut any = false;
        for y in 0..sy {
            for x in 0..sx {
                let id = buf.get_local(x, y, z);
                let open = if z + 1 < sz {
                    buf.get_local(x, y, z + 1) == AIR
                } else {
                    plane.is_some_and(|p| p[x + sx * y] == AIR)
                };
                mask[x + sx * y] = if id != AIR && open {
                    any = true;
                    id
                } else {
                    AIR
                };
            }
        }
        if !any {
            continue;
        }
        let zq = (z + 1) as f32 * s;
        greedy_rects(&mut mask, sx, sy, |x, y, w, h, id| {
            let (x0, x1) = (x as f32 * s, (x + w) as f32 * s);
            let (y0, y1) = (y as f32 * s, (y + h) as f32 * s);
            out.add_quad(
                Vec3::new(x1, y0, zq),
                Vec3::new(x1, y1, zq),
                Vec3::new(x0, y1, zq),
                Vec3::new(x0, y0, zq),
                reg.color_of(id),
            );
        });
    }
    out
}

fn mesh_neg_z(
    buf: &ChunkBuf,
    borders: &BoundarySlices,
    reg: &BlockRegistry,
    s: f32,
) -> MeshBuild {
    let (sx, sy, sz) = (buf.sx, buf.sy, buf.sz);
    let plane = borders.plane(Face::NegZ);
    let mut out = MeshBuild::default();
    let mut mask = vec![AIR; sx * sy];
    for z in 0..sz {
        if z == 0 && plane.is_none() {
            continue;
        }
        let mut any = false;
        for y in 0..sy {
            for x in 0..sx {
                let id = buf.get_local(x, y, z);
                let open = if z > 0 {
                    buf.get_local(x, y, z - 1) == AIR
                } else {
                    plane.is_some_and(|p| p[x + sx * y] == AIR)
                };
                mask[x + sx * y] = if id != AIR && open {
                    any = true;
                    id
                } else {
                    AIR
                };
            }
        }
        if !any {
            continue;
        }
        let zq = z as f32 * s;
        greedy_rects(&mut mask, sx, sy, |x, y, w, h, id| {
            let (x0, x1) = (x as f32 * s, (x + w) as f32 * s);
            let (y0, y1) = (y as f32 * s, (y + h) as f32 * s);
            out.add_quad(
                Vec3::new(x0, y0, zq),
                Vec3::new(x0, y1, zq),
                Vec3::new(x1, y1, zq),
                Vec3::new(x1, y0, zq),
                reg.color_of(id),
            );
        });
    }
    out
}

/// Meshes the faces pointing in one direction. Output positions are
/// chunk-local, scaled by `block_size`.
pub fn mesh_direction(
    buf: &ChunkBuf,
    borders: &BoundarySlices,
    reg: &BlockRegistry,
    block_size: f32,
    face: Face,
) -> MeshBuild {
    match face {
        Face::PosY => mesh_pos_y(buf, borders, reg, block_size),
        Face::NegY => mesh_neg_y(buf, borders, reg, block_size),
        Face::PosX => mesh_pos_x(buf, borders, reg, block_size),
        Face::NegX => mesh_neg_x(buf, borders, reg, block_size),
        Face::PosZ => mesh_pos_z(buf, borders, reg, block_size),
        Face::NegZ => mesh_neg_z(buf, borders, reg, block_size),
    }
}

/// Meshes all six directions sequentially. Parallel callers fan the
/// directions out themselves via [`mesh_direction`].
pub fn mesh_chunk_directions(
    buf: &ChunkBuf,
    borders: &BoundarySlices,
    reg: &BlockRegistry,
    block_size: f32,
) -> [MeshBuild; 6] {
    ALL_FACES.map(|face| mesh_direction(buf, borders, reg, block_size, face))
}

/// Concatenates per-direction builds into one mesh.
pub fn combine_builds(parts: &[MeshBuild; 6]) -> MeshBuild {
    let quads = parts.iter().map(MeshBuild::quad_count).sum();
    let mut out = MeshBuild::default();
    out.reserve_quads(quads);
    for part in parts {
        out.append(part);
    }
    out
}

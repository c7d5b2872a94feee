use loam_blocks::AIR;
use loam_chunk::ChunkBuf;
use loam_world::ChunkCoord;
use proptest::prelude::*;

fn dim() -> impl Strategy<Value = usize> {
    1usize..=8
}

fn small_i32() -> impl Strategy<Value = i32> {
    -1_000_000i32..=1_000_000
}

proptest! {
    // idx maps each (x,y,z) within bounds to unique in-range indices
    #[test]
    fn idx_is_unique_and_in_range(cx in small_i32(), cy in small_i32(), cz in small_i32(), sx in dim(), sy in dim(), sz in dim()) {
        let expect = sx*sy*sz;
        let coord = ChunkCoord::new(cx, cy, cz);
        let buf = ChunkBuf::from_voxels_local(coord, sx, sy, sz, vec![AIR; expect]);

        let mut seen = vec![false; expect];
        for y in 0..sy { for z in 0..sz { for x in 0..sx {
            let i = buf.idx(x,y,z);
            prop_assert!(i < expect);
            prop_assert!(!seen[i]);
            seen[i] = true;
        }}}
        // All indices hit exactly once
        prop_assert!(seen.into_iter().all(|b| b));
    }

    // get_local reads from linearized storage at idx
    #[test]
    fn get_local_matches_linear(cx in small_i32(), cy in small_i32(), cz in small_i32(), sx in dim(), sy in dim(), sz in dim()) {
        let expect = sx*sy*sz;
        let voxels = (0..expect).map(|i| (i % 251) as u8).collect();
        let coord = ChunkCoord::new(cx, cy, cz);
        let buf = ChunkBuf::from_voxels_local(coord, sx, sy, sz, voxels);
        for y in 0..sy { for z in 0..sz { for x in 0..sx {
            let i = buf.idx(x,y,z);
            prop_assert_eq!(buf.get_local(x,y,z), buf.voxels[i]);
        }}}
    }

    // contains_world brackets the chunk on all three axes and agrees with get_world
    #[test]
    fn contains_world_and_get_world_agree(cx in -1000i32..=1000, cy in -1000i32..=1000, cz in -1000i32..=1000, sx in dim(), sy in dim(), sz in dim()) {
        let expect = sx*sy*sz;
        let voxels = (0..expect).map(|i| (i % 7) as u8).collect();
        let coord = ChunkCoord::new(cx, cy, cz);
        let buf = ChunkBuf::from_voxels_local(coord, sx, sy, sz, voxels);

        let x0 = cx * sx as i32;
        let y0 = cy * sy as i32;
        let z0 = cz * sz as i32;

        let candidates = vec![
            (x0,               y0,               z0),
            (x0 + sx as i32-1, y0 + sy as i32-1, z0 + sz as i32-1),
            (x0 - 1,           y0,               z0),
            (x0 + sx as i32,   y0,               z0),
            (x0,               y0 - 1,           z0),
            (x0,               y0 + sy as i32,   z0),
            (x0,               y0,               z0 - 1),
            (x0,               y0,               z0 + sz as i32),
        ];

        for (wx,wy,wz) in candidates {
            let inside = wx >= x0 && wx < x0 + sx as i32
                && wy >= y0 && wy < y0 + sy as i32
                && wz >= z0 && wz < z0 + sz as i32;
            prop_assert_eq!(buf.contains_world(wx,wy,wz), inside);
            match buf.get_world(wx,wy,wz) {
                None => prop_assert!(!inside),
                Some(b) => {
                    prop_assert!(inside);
                    let lx = (wx - x0) as usize; let ly = (wy - y0) as usize; let lz = (wz - z0) as usize;
                    prop_assert_eq!(b, buf.get_local(lx, ly, lz));
                }
            }
        }
    }

    // from_voxels_local resizes or preserves to exact length
    #[test]
    fn from_voxels_local_resizes(sx in dim(), sy in dim(), sz in dim()) {
        let expect = sx*sy*sz;
        let coord = ChunkCoord::new(0, 0, 0);
        let buf_ok = ChunkBuf::from_voxels_local(coord, sx, sy, sz, vec![AIR; expect]);
        prop_assert_eq!(buf_ok.voxels.len(), expect);
        let wrong_len = expect.saturating_sub(1);
        let buf_resized = ChunkBuf::from_voxels_local(coord, sx, sy, sz, vec![AIR; wrong_len]);
        prop_assert_eq!(buf_resized.voxels.len(), expect);
    }
}

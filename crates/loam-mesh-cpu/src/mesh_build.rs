use loam_geom::Vec3;

/// One mesh vertex: chunk-local position plus the block's vertex color.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GreedyVertex {
    pub pos: Vec3,
    pub color: [u8; 4],
}

#[derive(Default, Clone, Debug)]
pub struct MeshBuild {
    pub vertices: Vec<GreedyVertex>,
    pub indices: Vec<u32>,
}

impl MeshBuild {
    /// Pre-reserve capacity for approximately `n_quads` quads worth of data.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.vertices.reserve(n_quads * 4);
        self.indices.reserve(n_quads * 6);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }

    /// Appends a quad as two triangles `(0,1,2)` and `(2,3,0)` over the
    /// corners `a..d`, which must be passed in counter-clockwise order as
    /// seen from outside the surface.
    pub fn add_quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3, rgba: [u8; 4]) {
        let base = self.vertices.len() as u32;
        for pos in [a, b, c, d] {
            self.vertices.push(GreedyVertex { pos, color: rgba });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    /// Appends all geometry from `other`, remapping its indices.
    pub fn append(&mut self, other: &MeshBuild) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }
}

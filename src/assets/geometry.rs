/// Interleaved vertex: homogeneous position and RGBA color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "wgpu", derive(bytemuck::Pod, bytemuck::Zeroable))]
pub struct Vertex {
    pub position: [f32; 4],
    pub color: [f32; 4],
}

impl Vertex {
    #[must_use]
    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self {
            position: [position[0], position[1], position[2], 1.0],
            color: [color[0], color[1], color[2], 1.0],
        }
    }
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    #[must_use]
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Unit cube spanning `[-1, 1]` on every axis, colored by corner position.
    #[must_use]
    pub fn cube() -> Self {
        let mut vertices = Vec::with_capacity(8);
        for corner in 0..8u32 {
            let x = (corner >> 2) & 1;
            let y = (corner >> 1) & 1;
            let z = corner & 1;
            let sign = |bit: u32| if bit == 1 { 1.0 } else { -1.0 };
            vertices.push(Vertex::new(
                [sign(x), sign(y), sign(z)],
                [x as f32, y as f32, z as f32],
            ));
        }

        #[rustfmt::skip]
        let indices = vec![
            0, 1, 2,    2, 1, 3,
            4, 0, 6,    6, 0, 2,
            5, 4, 7,    7, 4, 6,
            1, 5, 3,    3, 5, 7,
            6, 2, 7,    7, 2, 3,
            1, 0, 5,    5, 0, 4,
        ];

        Self { vertices, indices }
    }

    #[must_use]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Returns `true` when every index addresses an existing vertex.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let count = self.vertices.len();
        self.indices.iter().all(|&i| (i as usize) < count)
    }
}

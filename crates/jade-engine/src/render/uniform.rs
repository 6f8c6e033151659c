use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

/// Value for a typed uniform upload.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Mat4(Mat4),
    Mat3(Mat3),
    Vec4(Vec4),
    Vec3(Vec3),
    Vec2(Vec2),
    F32(f32),
    I32(i32),
}

impl UniformValue {
    /// Bytes in uniform-buffer layout (WGSL `var<uniform>` rules).
    ///
    /// `mat3x3<f32>` columns are padded to 16 bytes; everything else is tightly
    /// packed column-major.
    pub fn to_uniform_bytes(&self) -> Vec<u8> {
        match self {
            UniformValue::Mat4(m) => bytemuck::bytes_of(m).to_vec(),
            UniformValue::Mat3(m) => {
                let mut padded = [0.0f32; 12];
                for (i, col) in [m.x_axis, m.y_axis, m.z_axis].iter().enumerate() {
                    padded[i * 4..i * 4 + 3].copy_from_slice(&col.to_array());
                }
                bytemuck::cast_slice(&padded).to_vec()
            }
            UniformValue::Vec4(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::Vec3(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::Vec2(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::F32(f) => f.to_ne_bytes().to_vec(),
            UniformValue::I32(i) => i.to_ne_bytes().to_vec(),
        }
    }
}

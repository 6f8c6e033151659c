use std::num::NonZeroU32;

macro_rules! gpu_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Handle for slot `index` of a backend-side table.
            pub fn from_index(index: usize) -> Self {
                let raw = u32::try_from(index + 1).unwrap_or(u32::MAX);
                Self(NonZeroU32::new(raw).unwrap_or(NonZeroU32::MAX))
            }

            pub fn index(self) -> usize {
                (self.0.get() - 1) as usize
            }

            pub fn get(self) -> u32 {
                self.0.get()
            }
        }
    };
}

gpu_handle!(
    /// Compiled shader stage object.
    StageId
);
gpu_handle!(
    /// Program object (two linked stages).
    ProgramId
);
gpu_handle!(
    /// Vertex array object: attribute layout + element buffer binding.
    VertexArrayId
);
gpu_handle!(
    /// Vertex or index buffer object.
    BufferId
);

/// Resolved uniform location inside a linked program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation {
    pub program: ProgramId,
    pub slot: u32,
}

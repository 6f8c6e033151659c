use std::fmt;
use std::str::FromStr;

/// Programmable pipeline stage a source block belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Stage name as written after a `#type` marker.
    pub const fn as_str(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShaderStage {
    type Err = String;

    /// Names are matched exactly; `Vertex` is not a stage name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vertex" => Ok(ShaderStage::Vertex),
            "fragment" => Ok(ShaderStage::Fragment),
            other => Err(other.to_string()),
        }
    }
}

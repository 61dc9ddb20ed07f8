//! Box/voxel element schema, decompression into voxel buffers, and response parsing.
#![forbid(unsafe_code)]

pub mod decompress;
pub mod element;
pub mod response;

pub use decompress::decompress;
pub use element::Element;
pub use response::{DecodeError, GenerationResponse, parse_response, strip_fence};

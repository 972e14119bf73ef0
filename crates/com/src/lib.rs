pub mod error;
pub mod multipart;

pub use error::ComError;
pub use multipart::{
    MultipartEncoder, Part, boundary_from_content_type, read_part, write_part,
};

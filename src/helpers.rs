pub mod converters;
pub mod multipart;

//! Data models for the application

mod image;

pub use image::{
    CreateImageRequest, ImageRecord, ImageResponse, ImageUpdate, ModifyImageRequest, NewImage,
    ReplaceImageRequest,
};

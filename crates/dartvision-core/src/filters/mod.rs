pub mod levels;
pub mod sobel;

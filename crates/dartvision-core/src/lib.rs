pub mod color;
pub mod consts;
pub mod detection;
pub mod error;
pub mod feedback;
pub mod filters;
pub mod frame;
pub mod io;
pub mod oracle;
pub mod pipeline;
pub mod preprocess;
pub mod session;
pub mod stability;

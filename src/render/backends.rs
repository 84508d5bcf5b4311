/// CPU raster backend producing PNG output
pub mod pixmap;
/// Backend that records draw commands instead of rasterizing
pub mod recording;

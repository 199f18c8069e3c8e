pub mod calibration;
pub mod frame_sequencing;
pub mod host_port;
pub mod memtest;

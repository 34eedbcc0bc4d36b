//! Free-fly camera with Euler-angle orientation and a scripted orbit mode.

pub mod basis;
pub mod camera;
pub mod orbit;

pub use basis::{Basis, euler_front};
pub use camera::{
    Camera, CameraMode, CameraSnapshot, DEFAULT_PITCH, DEFAULT_SENSITIVITY, DEFAULT_SPEED,
    DEFAULT_YAW, DEFAULT_ZOOM, Movement, PITCH_LIMIT, ZOOM_MAX, ZOOM_MIN,
};
pub use orbit::OrbitRig;

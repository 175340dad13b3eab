mod disc;
mod light;
mod obstacle;
mod polygon;

pub use disc::{DEFAULT_DISC_RADIUS, Disc};

pub use light::{
    DEFAULT_LAMP_COLOR, DEFAULT_LIGHT_DIFFUSE, DEFAULT_LIGHT_DISTANCE, Lamp, LampOptions, Light,
    LightKind, LightOptions, Samples,
};

pub use obstacle::{DEFAULT_OBSTACLE_DIFFUSE, GeometryError, Obstacle, Occluder, Shape};

pub use polygon::{Polygon, PolygonForm};

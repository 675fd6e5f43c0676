//! One isolated parser per OSM tagging scheme that contributes lanes to a
//! side of the road.

mod bicycle;
pub use bicycle::bicycle;

mod bus;
pub use bus::bus;

mod foot_shoulder;
pub use foot_shoulder::foot_and_shoulder;

mod parking;
pub use parking::parking;

pub mod icmp;
pub mod payload;
pub mod socket;
pub mod transport;
pub mod udp;

pub use icmp::*;
pub use payload::*;
pub use socket::*;
pub use transport::*;
pub use udp::*;

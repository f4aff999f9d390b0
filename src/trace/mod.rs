pub mod engine;
pub mod jump;
pub mod observer;
pub mod prober;
pub mod resolve;

pub use engine::*;
pub use jump::*;
pub use observer::*;
pub use prober::*;
pub use resolve::*;

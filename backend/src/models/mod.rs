pub mod activity;
pub mod household;
pub mod meal;
pub mod shopping;

pub use activity::*;
pub use household::*;
pub use meal::*;
pub use shopping::*;

//! The host environment around the token ledger.
//!
//! [`NativeBank`] tracks the external value unit. A [`SinkFactory`] turns a
//! payment of that value into an equal token credit by routing it through a
//! single-use [`ValueSink`] that destroys it. [`World`] owns every deployed
//! component and serializes calls into them.

pub mod error;
pub mod event;
pub mod factory;
pub mod native;
pub mod sink;
pub mod world;

pub use error::UniverseError;
pub use event::SinkTriggered;
pub use factory::SinkFactory;
pub use native::NativeBank;
pub use sink::{SinkArena, SinkState, ValueSink};
pub use world::World;

use blackhole_types::{Address, NativeAmount};
use serde::{Deserialize, Serialize};

/// Emitted once per sink, when it destroys the value it received.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkTriggered {
    pub sink: Address,
    pub amount: NativeAmount,
}

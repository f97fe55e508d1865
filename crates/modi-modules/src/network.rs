//! Network module - root of the module chain

use crate::module::module_proxy;

module_proxy! {
    /// The network module; also stands in for hardware with an unknown uuid
    Network
}

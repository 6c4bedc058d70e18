//! Route selection: console primitive or raw byte passthrough

use rustc_hash::FxHashMap;

use super::handle::{StandardStream, StreamHandle};
use super::state::ConsoleState;

/// Which primitive serves a handle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamRoute {
    /// Native console API, with text conversion
    Console,
    /// OS byte read/write, no conversion
    RawPassthrough,
}

/// Handle → route mapping, fixed when the console state is captured
///
/// Only standard streams classified as consoles are registered; every other
/// handle, including console handles opened separately, is passthrough.
#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    routes: FxHashMap<StreamHandle, StreamRoute>,
}

impl RouteTable {
    pub fn from_state(state: &ConsoleState) -> Self {
        let mut routes = FxHashMap::default();
        for stream in StandardStream::ALL {
            let route = if state.is_console(stream) {
                StreamRoute::Console
            } else {
                StreamRoute::RawPassthrough
            };
            routes.insert(state.handle(stream), route);
        }
        Self { routes }
    }

    pub fn route_for(&self, handle: StreamHandle) -> StreamRoute {
        self.routes
            .get(&handle)
            .copied()
            .unwrap_or(StreamRoute::RawPassthrough)
    }
}

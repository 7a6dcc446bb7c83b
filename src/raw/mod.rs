mod arena;
mod handle;
mod node;

pub(crate) use arena::Arena;
pub(crate) use handle::Handle;
pub(crate) use node::{Header, Node, Side};

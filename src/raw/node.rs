use super::handle::Handle;

/// Which child link of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// The structural part of a node: its height and links.
///
/// The tree's sentinel is a bare `Header` with height 0. Every link that has nothing to point at
/// holds [`Handle::SENTINEL`]; parent links are back-references and never own anything.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Header {
    height: u32,
    left: Handle,
    right: Handle,
    parent: Handle,
}

impl Header {
    /// A detached sentinel: height 0, every link looping back to itself.
    pub(crate) const fn sentinel() -> Self {
        Self {
            height: 0,
            left: Handle::SENTINEL,
            right: Handle::SENTINEL,
            parent: Handle::SENTINEL,
        }
    }

    /// A fresh leaf hanging off `parent`.
    pub(crate) const fn leaf(parent: Handle) -> Self {
        Self {
            height: 1,
            left: Handle::SENTINEL,
            right: Handle::SENTINEL,
            parent,
        }
    }

    #[inline]
    pub(crate) const fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub(crate) fn set_height(&mut self, height: u32) {
        self.height = height;
    }

    #[inline]
    pub(crate) const fn left(&self) -> Handle {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Handle {
        self.right
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Handle {
        self.parent
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Handle {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Handle) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Handle) {
        self.parent = parent;
    }
}

pub(crate) struct Node<T> {
    header: Header,
    value: T,
}

impl<T> Node<T> {
    /// Creates a leaf holding `value` under `parent`.
    pub(crate) const fn new(value: T, parent: Handle) -> Self {
        Self {
            header: Header::leaf(parent),
            value,
        }
    }

    #[inline]
    pub(crate) const fn header(&self) -> &Header {
        &self.header
    }

    #[inline]
    pub(crate) fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    #[inline]
    pub(crate) const fn value(&self) -> &T {
        &self.value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub(crate) fn into_value(self) -> T {
        self.value
    }
}

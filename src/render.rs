pub(crate) mod buffer_cache;
pub(crate) mod compositor;
pub(crate) mod renderer;
pub(crate) mod surface;
pub(crate) mod view;

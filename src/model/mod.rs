//! Data structures representing parsed 3MF models

mod buffers;
mod core;
mod element;

pub use buffers::{INITIAL_TUPLE_CAPACITY, Triangles, TupleBuffer, Vertices};

pub use core::{
    Build, Item, Mesh, MetaData, Model, ModelResource, ObjectResource, ObjectType, Unit,
};

pub use element::{Element, ElementKind, ModelElement};

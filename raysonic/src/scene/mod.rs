//! Scene queries for environment sampling.
//!
//! The sampler only ever asks one question of the scene: "cast this ray, what
//! is the nearest hit?". [`RayTracer`] is that question; [`AabbScene`] is a
//! small box-based answer to it for tests and prototyping.

pub mod aabb;
pub mod ray_tracer;

pub use aabb::{Aabb, AabbScene};
pub use ray_tracer::{LayerMask, RayHit, RayTracer};

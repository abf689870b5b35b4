//! Numerical primitives for SCPN beam tracing.

pub mod interp;
pub mod linalg;
pub mod roots;
pub mod spline;
pub mod tridiag;

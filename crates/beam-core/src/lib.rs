//! Beam-tracing initial-value engine.
//!
//! - `codec`: packing of (q, K, Psi) into the 18-slot integrator state
//! - `evolution`: ray + Riccati right-hand side for an external ODE solver
//! - `entry`: where the vacuum ray first reaches the plasma boundary
//! - `launch`: antenna → plasma initial conditions

pub mod boundary;
pub mod codec;
pub mod dispersion;
pub mod entry;
pub mod evolution;
pub mod field;
pub mod geometry;
pub mod launch;
pub mod trajectory;
pub mod vacuum;

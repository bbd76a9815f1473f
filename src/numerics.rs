//! # Numerics Module
//!
//! ## Purpose
//! Shared numerical machinery for the characterisation methods: linear
//! regression, detection of linear regions in transformed curves, Brent
//! root finding and bounded minimisation, monotone cubic (PCHIP)
//! interpolation, least-squares B-spline smoothing, non-negative least
//! squares and simple quadrature.

pub mod bspline;
pub mod linear_region;
pub mod linreg;
pub mod nnls;
pub mod pchip;
pub mod quadrature;
pub mod solver;

pub use bspline::bspline_smooth;
pub use linear_region::find_linear_sections;
pub use linreg::{LinearFit, linear_fit};
pub use nnls::nnls;
pub use pchip::pchip_slopes;
pub use quadrature::{simpson, trapz};
pub use solver::{brent_minimize, brent_root};

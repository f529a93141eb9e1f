//! floraql syntax trees and output structures
//!
//! Two families of types live here:
//! - raw syntax trees as produced by the grammars ([`FilterNode`],
//!   [`RawSelect`]), which still carry source spans;
//! - the normalized output handed to API code ([`FilterExpression`],
//!   [`SelectTree`], [`OrderSpec`]), which serializes to the JSON shape
//!   request handlers expect.

mod filter;
mod literal;
mod operator;
mod order;
mod select;

pub use filter::*;
pub use literal::*;
pub use operator::*;
pub use order::*;
pub use select::*;

use smallvec::SmallVec;

/// A dotted attribute path split into segments (`type.id` → `["type", "id"]`)
pub type AttributePath = SmallVec<[String; 4]>;

/// Build an [`AttributePath`] from string slices
pub fn path(segments: &[&str]) -> AttributePath {
    segments.iter().map(|s| s.to_string()).collect()
}

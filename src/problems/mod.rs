//! Instrumented reference algorithms, one module per problem.

mod binary_search;
mod container;
mod histogram;
mod intervals;
mod islands;
mod kth_largest;
mod max_depth;
mod parentheses;
mod reverse_list;
mod rpn;
mod stairs;
mod stock;
mod subsets;
mod two_sum;
mod unique_substring;

pub use binary_search::*;
pub use container::*;
pub use histogram::*;
pub use intervals::*;
pub use islands::*;
pub use kth_largest::*;
pub use max_depth::*;
pub use parentheses::*;
pub use reverse_list::*;
pub use rpn::*;
pub use stairs::*;
pub use stock::*;
pub use subsets::*;
pub use two_sum::*;
pub use unique_substring::*;
